//! Descriptive statistics and Pearson correlation for two Bank of Canada
//! Valet series (USD/CAD and CORRA by default) over a user-chosen date range.

pub mod compute;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod stats;
pub mod valet;
pub mod validate;

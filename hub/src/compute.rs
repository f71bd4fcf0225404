use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::config::SeriesPair;
use crate::stats::{self, SeriesSummary, StatsError};
use crate::valet::{FetchError, ObservationSource};
use crate::validate::{DateIssues, validate_date_range};

pub const COMPUTE_ERROR_MESSAGE: &str = "A division by zero has occurred when computing the \
     Pearson Correlation Coefficient. Please ensure that you have selected a date range that is \
     wide enough.";

pub const TIMEOUT_MESSAGE: &str =
    "The observations service did not respond in time. Please try again later.";

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unidentified error has been caught. Please contact the \
     Quantitative Engineering team for more support";

/// Summary row for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub series: String,
    pub label: String,
    pub count: usize,
    #[serde(flatten)]
    pub summary: SeriesSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pearsonr: f64,
    pub stats: Vec<SeriesStats>,
    /// Dates returned by the endpoint that lacked a value for one of the series.
    pub dropped_dates: usize,
}

/// Terminal state of one `/compute_stats` request.
#[derive(Debug)]
pub enum StatsOutcome {
    Success(StatsReport),
    ValidationError(DateIssues),
    /// Correlation undefined for the selected range.
    ComputeError,
    Timeout,
    /// Anything unclassified. Details are logged, never returned.
    UnknownError,
}

#[derive(Debug, Error)]
enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Validate, fetch, and compute. Never fails; every path ends in an outcome.
pub async fn compute_stats(
    source: &dyn ObservationSource,
    series: &SeriesPair,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> StatsOutcome {
    let range = match validate_date_range(start, end, today) {
        Ok(range) => range,
        Err(issues) => {
            tracing::warn!(codes = ?issues.issues(), "rejected date range");
            return StatsOutcome::ValidationError(issues);
        }
    };

    match fetch_and_compute(source, series, range.start, range.end).await {
        Ok(report) => StatsOutcome::Success(report),
        Err(PipelineError::Stats(StatsError::ZeroVariance | StatsError::Empty)) => {
            StatsOutcome::ComputeError
        }
        Err(PipelineError::Fetch(FetchError::Timeout)) => {
            tracing::error!(
                start = %range.start,
                end = %range.end,
                "observations request timed out"
            );
            StatsOutcome::Timeout
        }
        Err(other) => {
            tracing::error!(
                error = %other,
                start = %range.start,
                end = %range.end,
                "compute_stats failed"
            );
            StatsOutcome::UnknownError
        }
    }
}

async fn fetch_and_compute(
    source: &dyn ObservationSource,
    series: &SeriesPair,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<StatsReport, PipelineError> {
    let table = source.fetch(&series.ids(), start, end).await?;
    let pair = table.aligned(&series.a, &series.b)?;
    if pair.dropped > 0 {
        tracing::warn!(
            dropped = pair.dropped,
            kept = pair.dates.len(),
            "dropped unaligned observation dates"
        );
    }

    let pearsonr = stats::pearson(&pair.a, &pair.b)?;
    let summaries = vec![
        SeriesStats {
            series: series.a.clone(),
            label: series.a_label.clone(),
            count: pair.a.len(),
            summary: stats::describe(&pair.a)?,
        },
        SeriesStats {
            series: series.b.clone(),
            label: series.b_label.clone(),
            count: pair.b.len(),
            summary: stats::describe(&pair.b)?,
        },
    ];

    Ok(StatsReport {
        start_date: start,
        end_date: end,
        pearsonr,
        stats: summaries,
        dropped_dates: pair.dropped,
    })
}

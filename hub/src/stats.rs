use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("series is empty")]
    Empty,
    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    /// One of the inputs is constant, so the coefficient is undefined.
    #[error("division by zero: zero variance in correlation input")]
    ZeroVariance,
}

/// High / low / mean of a single series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub high: f64,
    pub low: f64,
    pub mean: f64,
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// All values equal. Checked directly since the computed mean of a constant
/// series is not always exactly that constant.
fn is_constant(xs: &[f64]) -> bool {
    xs.split_first()
        .is_none_or(|(&first, rest)| rest.iter().all(|&x| x == first))
}

pub fn describe(series: &[f64]) -> Result<SeriesSummary, StatsError> {
    let (&first, rest) = series.split_first().ok_or(StatsError::Empty)?;
    let (high, low) = rest
        .iter()
        .fold((first, first), |(hi, lo), &x| (hi.max(x), lo.min(x)));

    Ok(SeriesSummary {
        high,
        low,
        mean: mean(series),
    })
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns `ZeroVariance` rather than NaN/inf when either series is constant
/// (this includes the single-point case).
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(StatsError::Empty);
    }
    if is_constant(a) || is_constant(b) {
        return Err(StatsError::ZeroVariance);
    }

    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return Err(StatsError::ZeroVariance);
    }
    Ok(cov / denom)
}

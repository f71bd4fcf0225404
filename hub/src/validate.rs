use chrono::NaiveDate;
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single problem with a requested date range.
///
/// Variant order is the order fragments appear in the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateIssue {
    StartDateInvalid,
    EndDateInvalid,
    StartAfterEnd,
    StartInFuture,
    EndInFuture,
}

impl DateIssue {
    fn leading(self) -> &'static str {
        match self {
            Self::StartDateInvalid => "Please input a start date.",
            Self::EndDateInvalid => "Please input an end date.",
            Self::StartAfterEnd => {
                "Please ensure that the start date is earlier than the end date."
            }
            Self::StartInFuture => "Please ensure that the start date is before today.",
            Self::EndInFuture => "Please ensure that the end date is before today.",
        }
    }

    fn follow_up(self) -> &'static str {
        match self {
            Self::StartDateInvalid => "Also input a start date.",
            Self::EndDateInvalid => "Also input an end date.",
            Self::StartAfterEnd => "Also ensure that the start date is earlier than the end date.",
            Self::StartInFuture => "Also ensure the start date is before today.",
            Self::EndInFuture => "Also ensure the end date is before today.",
        }
    }
}

/// Ordered, non-empty list of issues found in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateIssues(Vec<DateIssue>);

impl DateIssues {
    pub fn issues(&self) -> &[DateIssue] {
        &self.0
    }

    /// Join the fragments into the display string shown to the user.
    pub fn message(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(i, issue)| if i == 0 { issue.leading() } else { issue.follow_up() })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for DateIssues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// A validated `start <= end <= today` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Parse and check both dates, collecting every problem before returning.
///
/// Ordering and "not in the future" checks only run once both dates parse.
pub fn validate_date_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<DateRange, DateIssues> {
    let mut issues = Vec::new();

    let start = parse_date(start);
    let end = parse_date(end);
    if start.is_none() {
        issues.push(DateIssue::StartDateInvalid);
    }
    if end.is_none() {
        issues.push(DateIssue::EndDateInvalid);
    }
    let (Some(start), Some(end)) = (start, end) else {
        return Err(DateIssues(issues));
    };

    if start > end {
        issues.push(DateIssue::StartAfterEnd);
    }
    if start > today {
        issues.push(DateIssue::StartInFuture);
    }
    if end > today {
        issues.push(DateIssue::EndInFuture);
    }

    if issues.is_empty() {
        Ok(DateRange { start, end })
    } else {
        Err(DateIssues(issues))
    }
}

/// String form of [`validate_date_range`]: empty means valid.
pub fn validation_message(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> String {
    match validate_date_range(start, end, today) {
        Ok(_) => String::new(),
        Err(issues) => issues.message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn today() -> NaiveDate {
        d("2024-06-15")
    }

    #[test]
    fn valid_range_returns_dates() {
        let r = validate_date_range(Some("2023-01-01"), Some("2023-03-31"), today()).unwrap();
        assert_eq!(r.start, d("2023-01-01"));
        assert_eq!(r.end, d("2023-03-31"));
        assert_eq!(validation_message(Some("2023-01-01"), Some("2023-03-31"), today()), "");
    }

    #[test]
    fn same_day_and_today_are_valid() {
        assert!(validate_date_range(Some("2024-06-15"), Some("2024-06-15"), today()).is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(validate_date_range(Some(" 2023-01-01 "), Some("2023-01-02\n"), today()).is_ok());
    }

    #[test]
    fn missing_start_only() {
        let err = validate_date_range(None, Some("2023-01-02"), today()).unwrap_err();
        assert_eq!(err.issues(), &[DateIssue::StartDateInvalid]);
        assert_eq!(err.message(), "Please input a start date.");
    }

    #[test]
    fn missing_end_only() {
        let err = validate_date_range(Some("2023-01-01"), Some(""), today()).unwrap_err();
        assert_eq!(err.issues(), &[DateIssue::EndDateInvalid]);
        assert_eq!(err.message(), "Please input an end date.");
    }

    #[test]
    fn both_missing_reports_both() {
        let err = validate_date_range(None, None, today()).unwrap_err();
        assert_eq!(
            err.issues(),
            &[DateIssue::StartDateInvalid, DateIssue::EndDateInvalid]
        );
        let msg = err.message();
        assert!(msg.contains("start date"));
        assert!(msg.contains("end date"));
        assert_eq!(msg, "Please input a start date. Also input an end date.");
    }

    #[test]
    fn malformed_text_is_treated_as_missing() {
        for bad in ["2023/01/01", "01-02-2023", "2023-02-30", "yesterday", "2023-13-01"] {
            let err = validate_date_range(Some(bad), Some("2023-03-01"), today()).unwrap_err();
            assert_eq!(err.issues(), &[DateIssue::StartDateInvalid], "input {bad}");
        }
    }

    #[test]
    fn start_after_end() {
        let err = validate_date_range(Some("2023-02-01"), Some("2023-01-01"), today()).unwrap_err();
        assert_eq!(err.issues(), &[DateIssue::StartAfterEnd]);
        assert_eq!(
            err.message(),
            "Please ensure that the start date is earlier than the end date."
        );
    }

    #[test]
    fn future_end_only() {
        let err = validate_date_range(Some("2024-06-01"), Some("2024-07-01"), today()).unwrap_err();
        assert_eq!(err.issues(), &[DateIssue::EndInFuture]);
        assert_eq!(err.message(), "Please ensure that the end date is before today.");
    }

    #[test]
    fn multiple_range_violations_are_concatenated() {
        let err = validate_date_range(Some("2024-08-01"), Some("2024-07-01"), today()).unwrap_err();
        assert_eq!(
            err.issues(),
            &[
                DateIssue::StartAfterEnd,
                DateIssue::StartInFuture,
                DateIssue::EndInFuture
            ]
        );
        assert_eq!(
            err.message(),
            "Please ensure that the start date is earlier than the end date. \
             Also ensure the start date is before today. \
             Also ensure the end date is before today."
        );
    }

    #[test]
    fn issue_codes_serialize_snake_case() {
        let err = validate_date_range(None, Some("2023-01-01"), today()).unwrap_err();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!(["start_date_invalid"]));

        let err = validate_date_range(Some("2024-07-01"), Some("2024-06-01"), today()).unwrap_err();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["start_after_end", "start_in_future"])
        );
    }
}

use crate::{complexity::Complexity, week_day::WeekDay};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Criteria for narrowing down the course catalogue.
///
/// Every criterion that is set must hold for a course to match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseFilter {
    /// Free text matched against course names and descriptions
    pub query: Option<String>,
    pub complexity: Option<Complexity>,
    /// Only the calendar date (UTC) of this timestamp is compared
    pub start_datetime: Option<DateTime<Utc>>,
    /// Day of the week the course starts on
    pub day: Option<WeekDay>,
    /// Latest moment the course may end at
    pub end_datetime: Option<DateTime<Utc>>,
}

impl CourseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn start_datetime(mut self, start_datetime: DateTime<Utc>) -> Self {
        self.start_datetime = Some(start_datetime);
        self
    }

    pub fn day(mut self, day: WeekDay) -> Self {
        self.day = Some(day);
        self
    }

    pub fn end_datetime(mut self, end_datetime: DateTime<Utc>) -> Self {
        self.end_datetime = Some(end_datetime);
        self
    }

    /// The search text, ignoring blank queries
    pub fn search_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_datetime.map(|start| start.date_naive())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_blank_query_is_ignored() {
        let filter = CourseFilter::new().query("   ");
        assert_eq!(filter.search_text(), None);

        let filter = CourseFilter::new().query(" rust ");
        assert_eq!(filter.search_text(), Some("rust"));
    }

    #[test]
    fn test_start_date_uses_utc_calendar_date() {
        let start = Utc.with_ymd_and_hms(2023, 2, 14, 23, 30, 0).unwrap();
        let filter = CourseFilter::new().start_datetime(start);
        assert_eq!(
            filter.start_date(),
            Some(NaiveDate::from_ymd_opt(2023, 2, 14).unwrap())
        );
    }

    #[test]
    fn test_filter_deserializes_partial_json() {
        let filter: CourseFilter =
            serde_json::from_str(r#"{"complexity": "medium", "day": 2}"#).unwrap();
        assert_eq!(filter.complexity, Some(Complexity::Medium));
        assert_eq!(filter.day, Some(WeekDay::MONDAY));
        assert_eq!(filter.query, None);
    }
}

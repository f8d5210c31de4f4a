//! Filter criteria
//!
//! Immutable value objects rebuilt from user input on every request.

use crate::store::Value;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a secondary field is compared with the expected text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Display form equals the expected text exactly
    #[default]
    Exact,
    /// Display form contains the expected text, ignoring case
    Contains,
}

/// A constraint on one secondary column
///
/// An absent or empty expected value leaves the column unfiltered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub column: String,
    pub expected: Option<String>,
    pub mode: MatchMode,
}

impl FieldMatch {
    /// Exact-match constraint
    pub fn exact(column: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            expected: Some(expected.into()),
            mode: MatchMode::Exact,
        }
    }

    /// Constraint with an optional expected value and explicit mode
    pub fn new(column: impl Into<String>, expected: Option<String>, mode: MatchMode) -> Self {
        Self {
            column: column.into(),
            expected,
            mode,
        }
    }

    /// Whether this constraint filters anything
    pub fn is_active(&self) -> bool {
        self.expected.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Check a cell against this constraint
    ///
    /// Inactive constraints match everything; `Null` never matches an
    /// active one.
    pub fn matches(&self, value: &Value) -> bool {
        let expected = match self.expected.as_deref() {
            Some(e) if !e.is_empty() => e,
            _ => return true,
        };

        if value.is_null() {
            return false;
        }

        let actual = value.to_string();
        match self.mode {
            MatchMode::Exact => actual == expected,
            MatchMode::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
        }
    }
}

/// Date bounds plus secondary field constraints
///
/// Both bounds are inclusive and optional. Bounds with `from > to` are
/// accepted and simply match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    fields: Vec<FieldMatch>,
}

impl FilterCriteria {
    /// Criteria with no bounds and no field constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive lower bound
    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    /// Set the inclusive upper bound
    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Set both bounds from optional values
    pub fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Add an exact-match field constraint
    pub fn field(self, column: impl Into<String>, expected: impl Into<String>) -> Self {
        self.with_field(FieldMatch::exact(column, expected))
    }

    /// Add a field constraint
    pub fn with_field(mut self, field: FieldMatch) -> Self {
        self.fields.push(field);
        self
    }

    /// Inclusive lower bound
    pub fn from_bound(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Inclusive upper bound
    pub fn to_bound(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn fields(&self) -> &[FieldMatch] {
        &self.fields
    }

    /// Field constraints that actually filter
    pub fn active_fields(&self) -> impl Iterator<Item = &FieldMatch> {
        self.fields.iter().filter(|f| f.is_active())
    }

    /// True when both bounds are set and `from > to`
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(f), Some(t)) if f > t)
    }

    /// Check a normalized date against the bounds
    pub fn date_in_range(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date <= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inactive_field_matches_everything() {
        let none = FieldMatch::new("TIN", None, MatchMode::Exact);
        let empty = FieldMatch::new("TIN", Some(String::new()), MatchMode::Exact);

        for f in [none, empty] {
            assert!(!f.is_active());
            assert!(f.matches(&Value::Null));
            assert!(f.matches(&Value::from("anything")));
        }
    }

    #[test]
    fn test_exact_match_is_case_and_whitespace_sensitive() {
        let f = FieldMatch::exact("TIN", "B");
        assert!(f.matches(&Value::from("B")));
        assert!(!f.matches(&Value::from("b")));
        assert!(!f.matches(&Value::from(" B")));
        assert!(!f.matches(&Value::from("AB")));
        assert!(!f.matches(&Value::Null));
    }

    #[test]
    fn test_exact_match_on_numbers() {
        let f = FieldMatch::exact("Pages", "42");
        assert!(f.matches(&Value::Integer(42)));
        assert!(!f.matches(&Value::Integer(420)));

        let f = FieldMatch::exact("Score", "5.0");
        assert!(f.matches(&Value::Real(5.0)));
        assert!(!f.matches(&Value::Integer(5)));
    }

    #[test]
    fn test_whitespace_expected_is_active() {
        let f = FieldMatch::exact("TIN", " ");
        assert!(f.is_active());
        assert!(!f.matches(&Value::from("B")));
        assert!(f.matches(&Value::from(" ")));
    }

    #[test]
    fn test_contains_ignores_case() {
        let f = FieldMatch::new("TIN", Some("ab".into()), MatchMode::Contains);
        assert!(f.matches(&Value::from("xxABxx")));
        assert!(!f.matches(&Value::from("a-b")));
        assert!(!f.matches(&Value::Null));
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let c = FilterCriteria::new()
            .from_date(ymd(2023, 2, 1))
            .to_date(ymd(2023, 2, 10));

        assert!(c.date_in_range(ymd(2023, 2, 1)));
        assert!(c.date_in_range(ymd(2023, 2, 10)));
        assert!(!c.date_in_range(ymd(2023, 1, 31)));
        assert!(!c.date_in_range(ymd(2023, 2, 11)));
        assert!(!c.is_inverted());
    }

    #[test]
    fn test_open_bounds() {
        let c = FilterCriteria::new();
        assert!(c.date_in_range(ymd(1900, 1, 1)));
        assert!(c.date_in_range(ymd(2999, 12, 31)));

        let c = FilterCriteria::new().with_range(None, Some(ymd(2023, 1, 1)));
        assert!(c.date_in_range(ymd(2022, 6, 1)));
        assert!(!c.date_in_range(ymd(2023, 1, 2)));
    }

    #[test]
    fn test_inverted_bounds() {
        let c = FilterCriteria::new()
            .from_date(ymd(2023, 3, 1))
            .to_date(ymd(2023, 1, 1));
        assert!(c.is_inverted());
        assert!(!c.date_in_range(ymd(2023, 2, 1)));
    }

    #[test]
    fn test_active_fields() {
        let c = FilterCriteria::new()
            .field("TIN", "B")
            .with_field(FieldMatch::new("Assessment Number", None, MatchMode::Exact));

        assert_eq!(c.fields().len(), 2);
        let active: Vec<&str> = c.active_fields().map(|f| f.column.as_str()).collect();
        assert_eq!(active, vec!["TIN"]);
    }

    #[test]
    fn test_match_mode_serde() {
        let mode: MatchMode = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(mode, MatchMode::Contains);
        assert_eq!(serde_json::to_string(&MatchMode::Exact).unwrap(), "\"exact\"");
    }
}

//! Filter Engine
//!
//! A row survives iff its normalized date is present, falls inside the
//! inclusive bounds, and every active field constraint matches. Rows keep
//! their source order.

use crate::filter::{DatedRows, FilterCriteria, FilterError, FilterResult};

/// Apply criteria to a dated row set
///
/// Fails only when an active field constraint names a column the row set
/// does not have. Inverted bounds produce an empty result.
pub fn filter_rows(source: &DatedRows, criteria: &FilterCriteria) -> FilterResult<DatedRows> {
    let schema = source.rows();

    // Resolve column positions once, before touching any row
    let fields = criteria
        .active_fields()
        .map(|f| {
            schema
                .column_index(&f.column)
                .map(|idx| (idx, f))
                .ok_or_else(|| FilterError::UnknownColumn(f.column.clone()))
        })
        .collect::<FilterResult<Vec<_>>>()?;

    let columns = schema.columns().to_vec();
    let date_column = source.date_column().to_string();

    if criteria.is_inverted() {
        tracing::debug!(
            from = ?criteria.from_bound(),
            to = ?criteria.to_bound(),
            "Inverted date range, nothing can match"
        );
        return Ok(DatedRows::from_parts(columns, Vec::new(), date_column, Vec::new()));
    }

    let mut rows = Vec::new();
    let mut dates = Vec::new();

    for (row, date) in source.iter() {
        let Some(date) = date else {
            continue;
        };
        if !criteria.date_in_range(date) {
            continue;
        }
        if !fields.iter().all(|(idx, f)| f.matches(&row[*idx])) {
            continue;
        }
        rows.push(row.clone());
        dates.push(Some(date));
    }

    tracing::debug!(
        kept = rows.len(),
        total = source.len(),
        "Filtered rows"
    );

    Ok(DatedRows::from_parts(columns, rows, date_column, dates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DateNormalizer, FieldMatch, MatchMode};
    use crate::store::{RowSet, Value};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_rows() -> DatedRows {
        let rows = RowSet::new(
            vec!["date".to_string(), "tin".to_string()],
            vec![
                vec!["01/02/2023".into(), "A".into()],
                vec!["15/02/2023".into(), "B".into()],
                vec!["garbage".into(), "C".into()],
            ],
        );
        DateNormalizer::default().attach(rows, "date").unwrap()
    }

    fn tins(rows: &DatedRows) -> Vec<String> {
        rows.rows()
            .column_values("tin")
            .unwrap()
            .map(|v| v.to_string())
            .collect()
    }

    /// Larger fixture with mixed formats, duplicates and blanks
    fn ledger_rows() -> DatedRows {
        let data = [
            ("03/01/2023", "T1"),
            ("2023-01-15", "T2"),
            ("", "T3"),
            ("28/02/2023", "T1"),
            ("n/a", "T4"),
            ("2023-03-01 09:00:00", "T2"),
            ("01 Apr 2023", "T5"),
            ("03/01/2023", "T6"),
            ("31/12/2022", "T1"),
        ];
        let rows = RowSet::new(
            vec!["Activity Date".to_string(), "TIN".to_string()],
            data.iter()
                .map(|(d, t)| vec![Value::from(*d), Value::from(*t)])
                .collect(),
        );
        DateNormalizer::default()
            .attach(rows, "Activity Date")
            .unwrap()
    }

    #[test]
    fn test_bounded_range_excludes_outside_and_unparseable() {
        let criteria = FilterCriteria::new()
            .from_date(ymd(2023, 2, 1))
            .to_date(ymd(2023, 2, 10));

        let result = filter_rows(&scenario_rows(), &criteria).unwrap();

        assert_eq!(tins(&result), vec!["A"]);
        assert_eq!(
            result.rows().get(0, "date"),
            Some(&Value::from("01/02/2023"))
        );
    }

    #[test]
    fn test_unbounded_still_drops_unparseable() {
        let result = filter_rows(&scenario_rows(), &FilterCriteria::new()).unwrap();
        assert_eq!(tins(&result), vec!["A", "B"]);
    }

    #[test]
    fn test_field_with_unbounded_dates() {
        let criteria = FilterCriteria::new().field("tin", "B");
        let result = filter_rows(&scenario_rows(), &criteria).unwrap();
        assert_eq!(tins(&result), vec!["B"]);
    }

    #[test]
    fn test_field_cannot_rescue_unparseable_row() {
        let criteria = FilterCriteria::new().field("tin", "C");
        let result = filter_rows(&scenario_rows(), &criteria).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let criteria = FilterCriteria::new()
            .from_date(ymd(2023, 3, 1))
            .to_date(ymd(2023, 1, 1));

        let result = filter_rows(&scenario_rows(), &criteria).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rows().columns(), &["date", "tin"]);
    }

    #[test]
    fn test_unknown_field_column_fails() {
        let criteria = FilterCriteria::new().field("Assessment Number", "X1");
        let err = filter_rows(&scenario_rows(), &criteria).unwrap_err();
        assert_eq!(err, FilterError::UnknownColumn("Assessment Number".into()));
    }

    #[test]
    fn test_unknown_column_checked_even_when_inverted() {
        let criteria = FilterCriteria::new()
            .from_date(ymd(2023, 3, 1))
            .to_date(ymd(2023, 1, 1))
            .field("nope", "x");
        assert!(filter_rows(&scenario_rows(), &criteria).is_err());
    }

    #[test]
    fn test_inactive_unknown_column_is_ignored() {
        let criteria = FilterCriteria::new().with_field(FieldMatch::new(
            "Assessment Number",
            Some(String::new()),
            MatchMode::Exact,
        ));
        let result = filter_rows(&scenario_rows(), &criteria).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_two_fields_must_both_match() {
        let rows = RowSet::new(
            vec!["d".into(), "tin".into(), "num".into()],
            vec![
                vec!["01/01/2023".into(), "A".into(), Value::Integer(1)],
                vec!["02/01/2023".into(), "A".into(), Value::Integer(2)],
                vec!["03/01/2023".into(), "B".into(), Value::Integer(1)],
            ],
        );
        let dated = DateNormalizer::default().attach(rows, "d").unwrap();
        let criteria = FilterCriteria::new().field("tin", "A").field("num", "1");

        let result = filter_rows(&dated, &criteria).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows().get(0, "d"), Some(&Value::from("01/01/2023")));
    }

    #[test]
    fn test_result_values_unchanged() {
        let source = ledger_rows();
        let result = filter_rows(&source, &FilterCriteria::new()).unwrap();

        for (row, date) in result.iter() {
            assert!(date.is_some());
            assert!(source.rows().rows().contains(row));
        }
        assert_eq!(result.dates().len(), result.len());
    }

    #[test]
    fn test_idempotent() {
        let source = ledger_rows();
        let criteria = FilterCriteria::new()
            .from_date(ymd(2023, 1, 1))
            .to_date(ymd(2023, 3, 31))
            .field("TIN", "T1");

        let once = filter_rows(&source, &criteria).unwrap();
        let twice = filter_rows(&once, &criteria).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preserves_relative_order() {
        let source = ledger_rows();
        let result = filter_rows(&source, &FilterCriteria::new()).unwrap();

        let positions: Vec<usize> = result
            .rows()
            .iter()
            .map(|row| {
                source
                    .rows()
                    .iter()
                    .position(|r| r == row)
                    .unwrap()
            })
            .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert_eq!(
            result
                .rows()
                .column_values("TIN")
                .unwrap()
                .map(|v| v.to_string())
                .collect::<Vec<_>>(),
            vec!["T1", "T2", "T1", "T2", "T5", "T6", "T1"]
        );
    }

    #[test]
    fn test_monotonic_in_range_width() {
        let source = ledger_rows();
        let ranges = [
            (ymd(2023, 1, 10), ymd(2023, 2, 28)),
            (ymd(2023, 1, 1), ymd(2023, 3, 1)),
            (ymd(2022, 12, 1), ymd(2023, 4, 30)),
        ];

        let results: Vec<DatedRows> = ranges
            .iter()
            .map(|(f, t)| {
                let c = FilterCriteria::new().from_date(*f).to_date(*t);
                filter_rows(&source, &c).unwrap()
            })
            .collect();

        for pair in results.windows(2) {
            let (narrow, wide) = (&pair[0], &pair[1]);
            assert!(narrow.len() <= wide.len());
            for row in narrow.rows() {
                assert!(wide.rows().rows().contains(row));
            }
        }
        assert_eq!(results[0].len(), 2);
        assert_eq!(results[2].len(), 7);
    }

    #[test]
    fn test_single_day_range() {
        let day = ymd(2023, 1, 3);
        let criteria = FilterCriteria::new().from_date(day).to_date(day);
        let result = filter_rows(&ledger_rows(), &criteria).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_unparseable_never_in_any_result() {
        let source = ledger_rows();
        let criteria_list = [
            FilterCriteria::new(),
            FilterCriteria::new().from_date(ymd(1900, 1, 1)),
            FilterCriteria::new().to_date(ymd(2999, 1, 1)),
            FilterCriteria::new().field("TIN", "T3"),
            FilterCriteria::new().field("TIN", "T4"),
        ];

        for criteria in &criteria_list {
            let result = filter_rows(&source, criteria).unwrap();
            let tins: Vec<String> = result
                .rows()
                .column_values("TIN")
                .unwrap()
                .map(|v| v.to_string())
                .collect();
            assert!(!tins.contains(&"T3".to_string()));
            assert!(!tins.contains(&"T4".to_string()));
        }
    }
}

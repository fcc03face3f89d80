//! Pairwise correlation scan over an enriched table
//!
//! For each relation of a catalogue, the two named columns are aligned row
//! by row; rows where either value is absent are dropped from that pair
//! only. A least-squares fit of the remaining pairs yields Pearson's `r`.
//!
//! Outcomes per relation:
//!
//! - both columns exist and the fit succeeds: a [`CorrelationResult`]
//! - a column does not exist in this table: the relation is skipped
//! - the fit fails (non-numeric or constant column, too few rows): a
//!   [`RelationFailure`], logged and kept out of the results
//!
//! # Examples
//!
//! ```
//! use drawstat_analysis::{
//!     correlation::{rank_by_r, scan},
//!     enrich::{EnrichmentConfig, Enricher},
//!     relation::{RelationCatalogue, RelationSpec},
//!     schema::SchemaRegistry,
//!     source::read_raw_rows,
//! };
//! use drawstat_ephemeris::Ephemeris;
//!
//! let data = "\
//! 1,06.01.2001,3,12,13,16,23,41,7
//! 2,13.01.2001,5,14,19,28,37,45,2
//! 3,20.01.2001,1,8,22,29,33,48,5
//! ";
//! let registry = SchemaRegistry::builtin();
//! let config = EnrichmentConfig::default();
//! let rows = read_raw_rows(data.as_bytes()).unwrap();
//! let table = Enricher::new(registry.lookup("lotto").unwrap(), Ephemeris, &config)
//!     .enrich_table(&rows)
//!     .unwrap();
//!
//! let catalogue = RelationCatalogue::new(vec![
//!     RelationSpec::between("n6", "day_of_year"),
//!     RelationSpec::between("n1", "index"),
//!     RelationSpec::between("n21", "year"), // not a lotto column
//! ]);
//! let report = scan(&table, &catalogue);
//! assert_eq!(report.results.len(), 2);
//! assert_eq!(report.skipped, ["n21 vs year"]);
//!
//! let ranked = rank_by_r(report.results);
//! assert!(ranked[0].r <= ranked[1].r);
//! ```

use drawstat_stats::regression::{Axis, LinearRegression, RegressionError};
use serde::Serialize;

use crate::{
    relation::{RelationCatalogue, RelationSpec},
    table::EnrichedTable,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub name: String,
    pub field_a: String,
    pub field_b: String,
    /// Pearson's correlation coefficient.
    pub r: f64,
    pub slope: f64,
    pub intercept: f64,
    /// Number of rows where both values were present.
    pub n: usize,
}

impl CorrelationResult {
    fn from_fit(relation: &RelationSpec, fit: LinearRegression) -> Self {
        Self {
            name: relation.name.clone(),
            field_a: relation.field_a.clone(),
            field_b: relation.field_b.clone(),
            r: fit.r,
            slope: fit.slope,
            intercept: fit.intercept,
            n: fit.n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CorrelationError {
    #[display("unknown column '{field}'")]
    UnknownField { field: String },
    #[display("column '{field}' is not numeric")]
    NonNumeric { field: String },
    #[display("'{field_a}' and '{field_b}' share {count} complete rows, at least 2 are required")]
    InsufficientData {
        field_a: String,
        field_b: String,
        count: usize,
    },
    #[display("column '{field}' has zero variance")]
    DegenerateInput { field: String },
}

/// A relation whose correlation could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationFailure {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: CorrelationError,
}

fn serialize_display<S>(error: &CorrelationError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(error)
}

/// Outcome of [`scan`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    /// Results in catalogue order.
    pub results: Vec<CorrelationResult>,
    pub failures: Vec<RelationFailure>,
    /// Names of relations naming a column the table does not have.
    pub skipped: Vec<String>,
}

fn fit_columns(
    table: &EnrichedTable,
    field_a: &str,
    field_b: &str,
) -> Result<LinearRegression, CorrelationError> {
    let unresolved = |field: &str| {
        let field = field.to_owned();
        if table.has_column(&field) {
            CorrelationError::NonNumeric { field }
        } else {
            CorrelationError::UnknownField { field }
        }
    };
    let a = table.resolve(field_a).ok_or_else(|| unresolved(field_a))?;
    let b = table.resolve(field_b).ok_or_else(|| unresolved(field_b))?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = table
        .records()
        .iter()
        .filter_map(|record| Some((record.value(a)?, record.value(b)?)))
        .unzip();

    LinearRegression::fit(&xs, &ys).map_err(|err| match err {
        RegressionError::InsufficientData { count } => CorrelationError::InsufficientData {
            field_a: field_a.to_owned(),
            field_b: field_b.to_owned(),
            count,
        },
        RegressionError::DegenerateInput { axis } => CorrelationError::DegenerateInput {
            field: match axis {
                Axis::X => field_a.to_owned(),
                Axis::Y => field_b.to_owned(),
            },
        },
        RegressionError::LengthMismatch { .. } => {
            unreachable!("paired columns always have equal length")
        }
    })
}

/// Correlation of two named columns, named `"<a> vs <b>"`.
pub fn compute_correlation(
    table: &EnrichedTable,
    field_a: &str,
    field_b: &str,
) -> Result<CorrelationResult, CorrelationError> {
    let fit = fit_columns(table, field_a, field_b)?;
    Ok(CorrelationResult::from_fit(
        &RelationSpec::between(field_a, field_b),
        fit,
    ))
}

/// Computes every relation of `catalogue` whose columns exist in `table`.
///
/// A relation naming an existing but non-numeric column (`date`, `time`)
/// is reported as a failure, not skipped.
#[must_use]
pub fn scan(table: &EnrichedTable, catalogue: &RelationCatalogue) -> ScanReport {
    let mut report = ScanReport::default();
    for relation in catalogue {
        if !table.has_column(&relation.field_a) || !table.has_column(&relation.field_b) {
            tracing::debug!(relation = %relation.name, "skipping relation with unknown column");
            report.skipped.push(relation.name.clone());
            continue;
        }
        match fit_columns(table, &relation.field_a, &relation.field_b) {
            Ok(fit) => report
                .results
                .push(CorrelationResult::from_fit(relation, fit)),
            Err(error) => {
                tracing::warn!(relation = %relation.name, %error, "correlation omitted");
                report.failures.push(RelationFailure {
                    name: relation.name.clone(),
                    error,
                });
            }
        }
    }
    tracing::debug!(
        computed = report.results.len(),
        failed = report.failures.len(),
        skipped = report.skipped.len(),
        "correlation scan complete"
    );
    report
}

/// Sorts results by ascending `r`; equal values keep their input order.
#[must_use]
pub fn rank_by_r(mut results: Vec<CorrelationResult>) -> Vec<CorrelationResult> {
    results.sort_by(|a, b| a.r.total_cmp(&b.r));
    results
}

/// Sorts results by descending `|r|`; equal strengths keep their input order.
#[must_use]
pub fn rank_by_strength(mut results: Vec<CorrelationResult>) -> Vec<CorrelationResult> {
    results.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
    results
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        calendar::CalendarFields,
        record::DrawRecord,
        schema::SchemaRegistry,
        table::EnrichedRecord,
    };

    /// Lotto table with `n1 = n2 = i`, `n3 = 6 - i`, constant `n4`, and an
    /// `n6` bucket that is absent on the last row.
    fn table() -> EnrichedTable {
        let schema = SchemaRegistry::builtin().lookup("lotto").unwrap().clone();
        let records = (1..=5)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2024, 1, i).unwrap();
                EnrichedRecord {
                    draw: DrawRecord {
                        index: i64::from(i),
                        date,
                        time: None,
                        primary: vec![i, i, 6 - i, 20, 30, 40 + i],
                        secondary: vec![i % 2],
                    },
                    calendar: CalendarFields::from_date(date),
                    distances: vec![],
                    primary_buckets: vec![
                        Some(0),
                        Some(0),
                        Some(0),
                        Some(2),
                        Some(3),
                        (i < 5).then_some(i),
                    ],
                    secondary_buckets: vec![Some(0)],
                }
            })
            .collect();
        EnrichedTable::new(schema, vec![], records)
    }

    fn result(name: &str, r: f64) -> CorrelationResult {
        CorrelationResult {
            name: name.to_owned(),
            field_a: String::new(),
            field_b: String::new(),
            r,
            slope: 0.0,
            intercept: 0.0,
            n: 2,
        }
    }

    #[test]
    fn test_identical_and_reversed_columns() {
        let table = table();
        let same = compute_correlation(&table, "n1", "n2").unwrap();
        assert!((same.r - 1.0).abs() < 1e-9);
        assert_eq!(same.name, "n1 vs n2");
        assert_eq!(same.n, 5);

        let reversed = compute_correlation(&table, "n1", "n3").unwrap();
        assert!((reversed.r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_column_is_degenerate() {
        assert_eq!(
            compute_correlation(&table(), "n1", "n4").unwrap_err(),
            CorrelationError::DegenerateInput {
                field: "n4".to_owned()
            }
        );
        assert_eq!(
            compute_correlation(&table(), "s1_bucket", "n1").unwrap_err(),
            CorrelationError::DegenerateInput {
                field: "s1_bucket".to_owned()
            }
        );
    }

    #[test]
    fn test_rows_with_missing_values_are_excluded_pairwise() {
        let table = table();
        let with_missing = compute_correlation(&table, "n6_bucket", "n1").unwrap();
        assert_eq!(with_missing.n, 4);
        assert!((with_missing.r - 1.0).abs() < 1e-9);

        let complete = compute_correlation(&table, "n6", "n1").unwrap();
        assert_eq!(complete.n, 5);
    }

    #[test]
    fn test_insufficient_data() {
        let full = table();
        let single = EnrichedTable::new(
            full.schema().clone(),
            vec![],
            full.records()[..1].to_vec(),
        );
        assert_eq!(
            compute_correlation(&single, "n1", "n3").unwrap_err(),
            CorrelationError::InsufficientData {
                field_a: "n1".to_owned(),
                field_b: "n3".to_owned(),
                count: 1
            }
        );
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            compute_correlation(&table(), "n1", "dist_earth_moon").unwrap_err(),
            CorrelationError::UnknownField {
                field: "dist_earth_moon".to_owned()
            }
        );
    }

    #[test]
    fn test_scan_skips_unknown_columns_only() {
        let catalogue = RelationCatalogue::new(vec![
            RelationSpec::new("same", "n1", "n2"),
            RelationSpec::new("moon", "n1", "dist_earth_moon"),
            RelationSpec::new("flat", "n4", "n1"),
            RelationSpec::new("reversed", "n3", "n1"),
        ]);
        let report = scan(&table(), &catalogue);

        let names = report
            .results
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["same", "reversed"]);
        assert_eq!(report.skipped, ["moon"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "flat");
        assert_eq!(report.results[1].field_a, "n3");
    }

    #[test]
    fn test_non_numeric_column_fails_instead_of_skipping() {
        assert_eq!(
            compute_correlation(&table(), "date", "n1").unwrap_err(),
            CorrelationError::NonNumeric {
                field: "date".to_owned()
            }
        );

        let catalogue = RelationCatalogue::new(vec![
            RelationSpec::new("by date", "n1", "date"),
            RelationSpec::new("by time", "n1", "time"),
        ]);
        let report = scan(&table(), &catalogue);
        assert!(report.results.is_empty());
        assert_eq!(report.skipped, ["by time"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "by date");
        assert_eq!(
            report.failures[0].error,
            CorrelationError::NonNumeric {
                field: "date".to_owned()
            }
        );
    }

    #[test]
    fn test_rank_by_r_is_stable() {
        let ranked = rank_by_r(vec![
            result("a", 0.5),
            result("b", -0.2),
            result("c", 0.5),
            result("d", -0.2),
            result("e", 0.1),
        ]);
        let names = ranked.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["b", "d", "e", "a", "c"]);
    }

    #[test]
    fn test_rank_by_strength_is_stable() {
        let ranked = rank_by_strength(vec![
            result("a", 0.1),
            result("b", -0.7),
            result("c", 0.7),
            result("d", 0.0),
        ]);
        let names = ranked.iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["b", "c", "a", "d"]);
    }

    #[test]
    fn test_report_serializes_errors_as_text() {
        let catalogue = RelationCatalogue::new(vec![RelationSpec::new("flat", "n4", "n1")]);
        let json = serde_json::to_value(scan(&table(), &catalogue)).unwrap();
        assert_eq!(
            json["failures"][0]["error"],
            "column 'n4' has zero variance"
        );
    }
}

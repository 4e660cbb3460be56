use super::model::{columns, CellValue, ColumnKind, Dataset};
use crate::error::Result;

/// Decoration stripped from percentage text such as `"95%"`.
pub const PERCENT: &[char] = &['%'];
/// Decoration stripped from currency text such as `"$1,234.00"`.
pub const CURRENCY: &[char] = &['$', ','];

/// A cell whose text could not be read as a number. The cell is set to
/// missing and the row is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionWarning {
    pub column: String,
    pub row: usize,
    pub raw: String,
}

/// Outcome of one normalization pass over a column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeReport {
    pub column: String,
    /// Cells holding a number after the pass.
    pub parsed: usize,
    /// Cells missing after the pass, coerced ones included.
    pub missing: usize,
    pub warnings: Vec<CoercionWarning>,
    /// The column was already numeric and was left untouched.
    pub skipped: bool,
}

/// Convert a text column into numbers after removing `strip_chars`.
///
/// Unparseable text becomes [`CellValue::Missing`] and is recorded as a
/// [`CoercionWarning`]. A column that is already numeric is left as is,
/// so running the pass twice changes nothing.
pub fn normalize(dataset: &mut Dataset, field: &str, strip_chars: &[char]) -> Result<NormalizeReport> {
    let col = dataset.column_index(field)?;
    let mut report = NormalizeReport {
        column: field.to_string(),
        parsed: 0,
        missing: 0,
        warnings: Vec::new(),
        skipped: dataset.column_kind(col) != ColumnKind::Text,
    };

    for row in 0..dataset.len() {
        let cleaned = match dataset.value(row, col) {
            CellValue::Number(_) => {
                report.parsed += 1;
                continue;
            }
            CellValue::Missing => {
                report.missing += 1;
                continue;
            }
            CellValue::Text(raw) => match parse_decorated(raw, strip_chars) {
                Some(v) => CellValue::Number(v),
                None => {
                    report.warnings.push(CoercionWarning {
                        column: field.to_string(),
                        row,
                        raw: raw.clone(),
                    });
                    CellValue::Missing
                }
            },
        };
        match cleaned {
            CellValue::Number(_) => report.parsed += 1,
            _ => report.missing += 1,
        }
        dataset.set_value(row, col, cleaned);
    }

    if report.skipped {
        log::debug!("{field} is already numeric, normalization skipped");
    } else {
        log::info!(
            "Normalized {field}: {} numeric, {} missing",
            report.parsed,
            report.missing
        );
    }
    if !report.warnings.is_empty() {
        log::warn!(
            "{} values in {field} could not be read as numbers and are treated as missing",
            report.warnings.len()
        );
        for w in report.warnings.iter().take(5) {
            log::debug!("  row {}: {:?}", w.row, w.raw);
        }
    }

    Ok(report)
}

/// The two default passes: `host_response_rate` (percent) and `price`
/// (currency). Must run before the dataset is shared with any view.
pub fn normalize_defaults(dataset: &mut Dataset) -> Result<Vec<NormalizeReport>> {
    Ok(vec![
        normalize(dataset, columns::RESPONSE_RATE, PERCENT)?,
        normalize(dataset, columns::PRICE, CURRENCY)?,
    ])
}

fn parse_decorated(raw: &str, strip_chars: &[char]) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !strip_chars.contains(c)).collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::dataset;
    use crate::error::ExplorerError;

    #[test]
    fn test_percent_values() {
        let mut ds = dataset(
            &["host_response_rate"],
            &[&["95%"], &["N/A"], &[""], &["100%"], &["0%"]],
        );
        let report = normalize(&mut ds, "host_response_rate", PERCENT).unwrap();

        assert_eq!(ds.value(0, 0), &CellValue::Number(95.0));
        assert!(ds.value(1, 0).is_missing());
        assert!(ds.value(2, 0).is_missing());
        assert_eq!(ds.value(3, 0), &CellValue::Number(100.0));
        assert_eq!(ds.value(4, 0), &CellValue::Number(0.0));

        assert!(!report.skipped);
        assert_eq!(report.parsed, 3);
        assert_eq!(report.missing, 2);
        assert_eq!(
            report.warnings,
            vec![CoercionWarning {
                column: "host_response_rate".into(),
                row: 1,
                raw: "N/A".into(),
            }]
        );
    }

    #[test]
    fn test_currency_values() {
        let mut ds = dataset(
            &["price"],
            &[&["$1,234"], &["$0"], &["$3,500.00"], &["$ 12.50 "], &["free"]],
        );
        let report = normalize(&mut ds, "price", CURRENCY).unwrap();

        assert_eq!(ds.value(0, 0), &CellValue::Number(1234.0));
        assert_eq!(ds.value(1, 0), &CellValue::Number(0.0));
        assert_eq!(ds.value(2, 0), &CellValue::Number(3500.0));
        assert_eq!(ds.value(3, 0), &CellValue::Number(12.5));
        assert!(ds.value(4, 0).is_missing());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_non_finite_text_is_missing() {
        let mut ds = dataset(&["price"], &[&["$inf"], &["NaN%"], &["$5"]]);
        normalize(&mut ds, "price", CURRENCY).unwrap();
        assert!(ds.value(0, 0).is_missing());
        assert!(ds.value(1, 0).is_missing());
        assert_eq!(ds.value(2, 0), &CellValue::Number(5.0));
    }

    #[test]
    fn test_idempotent() {
        let mut ds = dataset(&["price"], &[&["$1,234"], &["oops"], &["$7"]]);
        normalize(&mut ds, "price", CURRENCY).unwrap();
        let once = ds.clone();

        let second = normalize(&mut ds, "price", CURRENCY).unwrap();
        assert!(second.skipped);
        assert!(second.warnings.is_empty());
        assert_eq!(second.parsed, 2);
        assert_eq!(second.missing, 1);
        assert_eq!(ds.rows, once.rows);
    }

    #[test]
    fn test_already_numeric_column_skipped() {
        let mut ds = dataset(&["host_response_rate"], &[&["95"], &[""]]);
        let report = normalize(&mut ds, "host_response_rate", PERCENT).unwrap();
        assert!(report.skipped);
        assert_eq!(ds.value(0, 0), &CellValue::Number(95.0));
    }

    #[test]
    fn test_missing_column() {
        let mut ds = dataset(&["room_type"], &[&["Hotel room"]]);
        assert!(matches!(
            normalize(&mut ds, "price", CURRENCY),
            Err(ExplorerError::MissingColumn(c)) if c == "price"
        ));
    }

    #[test]
    fn test_defaults_touch_both_fields() {
        let mut ds = dataset(
            &["host_response_rate", "price", "room_type"],
            &[&["90%", "$1,000", "Private room"]],
        );
        let reports = normalize_defaults(&mut ds).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(ds.value(0, 0), &CellValue::Number(90.0));
        assert_eq!(ds.value(0, 1), &CellValue::Number(1000.0));
        assert_eq!(ds.value(0, 2), &CellValue::Text("Private room".into()));
    }
}

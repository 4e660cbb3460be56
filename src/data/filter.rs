use std::collections::BTreeSet;
use std::fmt;

use super::aggregate;
use super::model::{CellValue, Dataset};
use crate::error::Result;

// ---------------------------------------------------------------------------
// RangeBounds – inclusive numeric interval
// ---------------------------------------------------------------------------

/// Inclusive numeric interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    pub low: f64,
    pub high: f64,
}

impl RangeBounds {
    /// Build an interval, swapping the ends if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.low <= v && v <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Default slider bounds for `field`: the observed minimum and maximum
    /// over the whole dataset, rounded to one decimal place.
    /// `None` when the column holds no numbers.
    pub fn from_field(dataset: &Dataset, field: &str) -> Result<Option<Self>> {
        let extent = aggregate::numeric_extent(dataset, &View::all(dataset), field)?;
        Ok(extent.map(|(min, max)| Self::new(round1(min), round1(max))))
    }

    /// Both ends rounded to one decimal place. Slider arithmetic leaves
    /// values like `4.800000000000001` that would exclude the shown bound.
    pub fn snapped(self) -> Self {
        Self::new(round1(self.low), round1(self.high))
    }
}

/// One decimal place, ties to even.
fn round1(v: f64) -> f64 {
    (v * 10.0).round_ties_even() / 10.0
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// A boolean condition over one field. A slice of predicates means their
/// conjunction. A missing value never satisfies a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Identity: every row passes.
    All,
    /// Exact, case-sensitive category match.
    Equals { field: String, value: String },
    /// Inclusive on both ends.
    Range { field: String, bounds: RangeBounds },
    LessThan { field: String, limit: f64 },
    AtMost { field: String, limit: f64 },
    GreaterThan { field: String, limit: f64 },
    AtLeast { field: String, limit: f64 },
    /// Category is one of `values`.
    InSet { field: String, values: BTreeSet<String> },
}

impl Predicate {
    pub fn equals(field: &str, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn range(field: &str, bounds: RangeBounds) -> Self {
        Predicate::Range {
            field: field.to_string(),
            bounds,
        }
    }

    /// Membership in the `k` most frequent categories of `field`, counted
    /// over the whole dataset.
    pub fn top_k(dataset: &Dataset, field: &str, k: usize) -> Result<Self> {
        Ok(Predicate::InSet {
            field: field.to_string(),
            values: aggregate::top_k(dataset, field, k)?.into_iter().collect(),
        })
    }

    /// Resolve column references against `dataset`.
    ///
    /// Fails with `MissingColumn` for an absent field and `NotNumeric` when
    /// a numeric comparison targets a text column.
    pub fn compile(&self, dataset: &Dataset) -> Result<Matcher> {
        let matcher = match self {
            Predicate::All => Matcher::All,
            Predicate::Equals { field, value } => Matcher::Equals {
                col: dataset.column_index(field)?,
                value: value.clone(),
            },
            Predicate::InSet { field, values } => Matcher::InSet {
                col: dataset.column_index(field)?,
                values: values.clone(),
            },
            Predicate::Range { field, bounds } => Matcher::Numeric {
                col: dataset.numeric_column(field)?,
                test: NumericTest::Within(*bounds),
            },
            Predicate::LessThan { field, limit } => Matcher::Numeric {
                col: dataset.numeric_column(field)?,
                test: NumericTest::Below(*limit),
            },
            Predicate::AtMost { field, limit } => Matcher::Numeric {
                col: dataset.numeric_column(field)?,
                test: NumericTest::AtMost(*limit),
            },
            Predicate::GreaterThan { field, limit } => Matcher::Numeric {
                col: dataset.numeric_column(field)?,
                test: NumericTest::Above(*limit),
            },
            Predicate::AtLeast { field, limit } => Matcher::Numeric {
                col: dataset.numeric_column(field)?,
                test: NumericTest::AtLeast(*limit),
            },
        };
        Ok(matcher)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => write!(f, "all rows"),
            Predicate::Equals { field, value } => write!(f, "{field} == {value:?}"),
            Predicate::Range { field, bounds } => {
                write!(f, "{} <= {field} <= {}", bounds.low, bounds.high)
            }
            Predicate::LessThan { field, limit } => write!(f, "{field} < {limit}"),
            Predicate::AtMost { field, limit } => write!(f, "{field} <= {limit}"),
            Predicate::GreaterThan { field, limit } => write!(f, "{field} > {limit}"),
            Predicate::AtLeast { field, limit } => write!(f, "{field} >= {limit}"),
            Predicate::InSet { field, values } => {
                write!(f, "{field} in {{{} values}}", values.len())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Matcher – a predicate bound to column positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericTest {
    Within(RangeBounds),
    Below(f64),
    AtMost(f64),
    Above(f64),
    AtLeast(f64),
}

impl NumericTest {
    fn passes(self, v: f64) -> bool {
        match self {
            NumericTest::Within(b) => b.contains(v),
            NumericTest::Below(l) => v < l,
            NumericTest::AtMost(l) => v <= l,
            NumericTest::Above(l) => v > l,
            NumericTest::AtLeast(l) => v >= l,
        }
    }
}

/// A compiled [`Predicate`], evaluated row by row.
#[derive(Debug, Clone)]
pub enum Matcher {
    All,
    Equals { col: usize, value: String },
    InSet { col: usize, values: BTreeSet<String> },
    Numeric { col: usize, test: NumericTest },
}

impl Matcher {
    pub fn matches(&self, dataset: &Dataset, row: usize) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Equals { col, value } => dataset
                .value(row, *col)
                .as_category()
                .is_some_and(|c| c == value.as_str()),
            Matcher::InSet { col, values } => dataset
                .value(row, *col)
                .as_category()
                .is_some_and(|c| values.contains(&*c)),
            Matcher::Numeric { col, test } => match dataset.value(row, *col) {
                CellValue::Number(v) => test.passes(*v),
                _ => false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// View – row indices into a shared dataset
// ---------------------------------------------------------------------------

/// A subset of a dataset, held as ascending row indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    rows: Vec<usize>,
}

impl View {
    /// Every row of `dataset`.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            rows: (0..dataset.len()).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Narrow this view to rows passing every predicate.
    pub fn filter(&self, dataset: &Dataset, predicates: &[Predicate]) -> Result<View> {
        let matchers = predicates
            .iter()
            .map(|p| p.compile(dataset))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&row| matchers.iter().all(|m| m.matches(dataset, row)))
            .collect();
        Ok(View { rows })
    }
}

/// Rows of `dataset` passing every predicate.
pub fn apply(dataset: &Dataset, predicates: &[Predicate]) -> Result<View> {
    let view = View::all(dataset).filter(dataset, predicates)?;
    log::debug!(
        "{} of {} rows pass [{}]",
        view.len(),
        dataset.len(),
        predicates
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::dataset;
    use crate::error::ExplorerError;

    fn scores() -> Dataset {
        dataset(
            &["neigh", "score"],
            &[
                &["A", "4.5"],
                &["A", "3.0"],
                &["B", "5.0"],
                &["a", "4.0"],
                &["A", ""],
            ],
        )
    }

    #[test]
    fn test_no_predicates_keeps_everything() {
        let ds = scores();
        assert_eq!(apply(&ds, &[]).unwrap().rows(), &[0, 1, 2, 3, 4]);
        assert_eq!(apply(&ds, &[Predicate::All]).unwrap().len(), 5);
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        let ds = scores();
        let view = apply(&ds, &[Predicate::equals("neigh", "A")]).unwrap();
        assert_eq!(view.rows(), &[0, 1, 4]);
        let view = apply(&ds, &[Predicate::equals("neigh", "a")]).unwrap();
        assert_eq!(view.rows(), &[3]);
    }

    #[test]
    fn test_range_inclusive_both_ends() {
        let ds = scores();
        let view = apply(&ds, &[Predicate::range("score", RangeBounds::new(3.0, 5.0))]).unwrap();
        assert_eq!(view.rows(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_missing_never_in_range() {
        let ds = scores();
        let wide = RangeBounds::new(f64::MIN, f64::MAX);
        let view = apply(&ds, &[Predicate::range("score", wide)]).unwrap();
        assert!(!view.rows().contains(&4));
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let ds = scores();
        let view = apply(
            &ds,
            &[
                Predicate::equals("neigh", "A"),
                Predicate::range("score", RangeBounds::new(3.0, 5.0)),
            ],
        )
        .unwrap();
        assert_eq!(view.rows(), &[0, 1]);
    }

    #[test]
    fn test_thresholds() {
        let ds = scores();
        let lt = |limit| Predicate::LessThan { field: "score".into(), limit };
        let le = |limit| Predicate::AtMost { field: "score".into(), limit };
        let gt = |limit| Predicate::GreaterThan { field: "score".into(), limit };
        let ge = |limit| Predicate::AtLeast { field: "score".into(), limit };
        assert_eq!(apply(&ds, &[lt(4.5)]).unwrap().rows(), &[1, 3]);
        assert_eq!(apply(&ds, &[le(4.5)]).unwrap().rows(), &[0, 1, 3]);
        assert_eq!(apply(&ds, &[gt(4.5)]).unwrap().rows(), &[2]);
        assert_eq!(apply(&ds, &[ge(4.5)]).unwrap().rows(), &[0, 2]);
    }

    #[test]
    fn test_default_bounds_rounded() {
        let ds = dataset(&["score"], &[&["2.96"], &["4.04"], &[""]]);
        let bounds = RangeBounds::from_field(&ds, "score").unwrap().unwrap();
        assert_eq!(bounds, RangeBounds { low: 3.0, high: 4.0 });
    }

    #[test]
    fn test_default_bounds_round_half_to_even() {
        let ds = dataset(&["score"], &[&["0.25"], &["0.75"]]);
        let bounds = RangeBounds::from_field(&ds, "score").unwrap().unwrap();
        assert_eq!(bounds, RangeBounds { low: 0.2, high: 0.8 });
    }

    #[test]
    fn test_snapped_keeps_boundary_rows() {
        let ds = dataset(&["score"], &[&["4.8"], &["5.0"], &["1.0"]]);
        let drifted = RangeBounds::new(1.0 + 38.0 * 0.1, 5.0);
        assert!(drifted.low > 4.8);
        let view = apply(&ds, &[Predicate::range("score", drifted.snapped())]).unwrap();
        assert_eq!(view.rows(), &[0, 1]);
    }

    #[test]
    fn test_default_bounds_include_extremes() {
        let ds = scores();
        let bounds = RangeBounds::from_field(&ds, "score").unwrap().unwrap();
        assert_eq!(bounds, RangeBounds { low: 3.0, high: 5.0 });
        let view = apply(&ds, &[Predicate::range("score", bounds)]).unwrap();
        assert!(view.rows().contains(&2));
    }

    #[test]
    fn test_default_bounds_empty_column() {
        let ds = dataset(&["score"], &[&[""]]);
        assert_eq!(RangeBounds::from_field(&ds, "score").unwrap(), None);
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        assert_eq!(RangeBounds::new(5.0, 1.0), RangeBounds { low: 1.0, high: 5.0 });
    }

    #[test]
    fn test_top_k_membership_uses_whole_dataset() {
        let ds = dataset(
            &["n"],
            &[&["x"], &["y"], &["y"], &["z"], &["z"], &["z"]],
        );
        let pred = Predicate::top_k(&ds, "n", 2).unwrap();
        let view = apply(&ds, &[pred]).unwrap();
        assert_eq!(view.rows(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filter_narrows_existing_view() {
        let ds = scores();
        let base = apply(&ds, &[Predicate::equals("neigh", "A")]).unwrap();
        let narrowed = base
            .filter(&ds, &[Predicate::GreaterThan { field: "score".into(), limit: 4.0 }])
            .unwrap();
        assert_eq!(narrowed.rows(), &[0]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let ds = scores();
        assert!(matches!(
            apply(&ds, &[Predicate::equals("room_type", "x")]),
            Err(ExplorerError::MissingColumn(c)) if c == "room_type"
        ));
    }

    #[test]
    fn test_numeric_predicate_on_text_column() {
        let ds = scores();
        assert!(matches!(
            apply(&ds, &[Predicate::range("neigh", RangeBounds::new(0.0, 1.0))]),
            Err(ExplorerError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Predicate::equals("room_type", "Hotel room").to_string(), "room_type == \"Hotel room\"");
        assert_eq!(
            Predicate::AtMost { field: "price".into(), limit: 3000.0 }.to_string(),
            "price <= 3000"
        );
    }
}

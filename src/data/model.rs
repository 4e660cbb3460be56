use std::borrow::Cow;
use std::fmt;

use crate::error::{ExplorerError, Result};

/// Column names the explorer reads.
pub mod columns {
    pub const HOST_NEIGHBOURHOOD: &str = "host_neighbourhood";
    pub const NEIGHBOURHOOD: &str = "neighbourhood_cleansed";
    pub const ROOM_TYPE: &str = "room_type";
    pub const REVIEW_SCORE: &str = "review_scores_rating";
    pub const REVIEW_COUNT: &str = "number_of_reviews";
    pub const RESPONSE_RATE: &str = "host_response_rate";
    pub const PRICE: &str = "price";
    pub const ESTIMATED_REVENUE: &str = "estimated_revenue_l365d";
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a listings export carries.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a category label. Numbers are rendered with `Display`.
    pub fn as_category(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            CellValue::Number(v) => Some(Cow::Owned(v.to_string())),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

static MISSING: CellValue = CellValue::Missing;

/// Storage type of a column, decided from its present values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every present value is a number.
    Numeric,
    /// At least one present value is text.
    Text,
    /// No present values at all.
    Empty,
}

// ---------------------------------------------------------------------------
// Listing – one row of the table
// ---------------------------------------------------------------------------

/// One rental listing. Cells are positional, aligned with
/// [`Dataset::column_names`].
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub cells: Vec<CellValue>,
}

impl Listing {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table. Mutated only by normalization, then shared
/// read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// All listings (rows).
    pub rows: Vec<Listing>,
}

impl Dataset {
    pub fn new(column_names: Vec<String>, rows: Vec<Listing>) -> Self {
        Self { column_names, rows }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name`, or [`ExplorerError::MissingColumn`].
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.column_names
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ExplorerError::MissingColumn(name.to_string()))
    }

    pub fn value(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .map(|r| r.get(column))
            .unwrap_or(&MISSING)
    }

    pub fn column_kind(&self, column: usize) -> ColumnKind {
        let mut kind = ColumnKind::Empty;
        for row in &self.rows {
            match row.get(column) {
                CellValue::Text(_) => return ColumnKind::Text,
                CellValue::Number(_) => kind = ColumnKind::Numeric,
                CellValue::Missing => {}
            }
        }
        kind
    }

    /// Resolve a column that numeric operations will read.
    /// Empty columns are accepted; every comparison on them fails.
    pub fn numeric_column(&self, name: &str) -> Result<usize> {
        let idx = self.column_index(name)?;
        match self.column_kind(idx) {
            ColumnKind::Text => Err(ExplorerError::NotNumeric {
                column: name.to_string(),
            }),
            ColumnKind::Numeric | ColumnKind::Empty => Ok(idx),
        }
    }

    pub(crate) fn set_value(&mut self, row: usize, column: usize, value: CellValue) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.cells.get_mut(column)) {
            *cell = value;
        }
    }
}

/// Core data types for the Malaysia flood prediction dashboard.
///
/// This module defines the shared domain model imported by all other modules:
/// rainfall records, the month columns they are keyed by, and the flood risk
/// tiers derived from rainfall magnitudes. It contains no I/O.

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Months
// ---------------------------------------------------------------------------

/// Calendar month, in the column order used by the rainfall dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// All twelve months, January first.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Column header for this month in the dataset (e.g. "JAN").
    pub fn column(&self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }

    /// Zero-based position of this month within a record's monthly array.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the historical dataset: a district's monthly rainfall for a
/// single year, and whether a flood was recorded.
///
/// Records are immutable once loaded; every aggregation reads them through
/// shared references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallRecord {
    pub state: String,
    pub district: String,
    pub year: i32,
    /// Monthly rainfall in millimetres, JAN..DEC.
    pub monthly: [f64; 12],
    pub flood: bool,
}

impl RainfallRecord {
    /// Rainfall for a single month, in millimetres.
    pub fn month(&self, month: Month) -> f64 {
        self.monthly[month.index()]
    }

    /// Annual total: the sum of the twelve monthly values.
    pub fn annual_total(&self) -> f64 {
        self.monthly.iter().sum()
    }
}

/// Measurements of the table the records were read from, kept for the
/// admin diagnostics. Zero for record sets built in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceShape {
    /// Header columns, including ones the loader does not consume.
    pub columns: usize,
    /// Empty cells across all data rows.
    pub missing_values: usize,
}

/// The full loaded dataset. Source of truth for all aggregations.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<RainfallRecord>,
    shape: SourceShape,
}

impl RecordSet {
    pub fn new(records: Vec<RainfallRecord>) -> Self {
        Self {
            records,
            shape: SourceShape::default(),
        }
    }

    pub fn with_shape(mut self, shape: SourceShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn shape(&self) -> SourceShape {
        self.shape
    }

    pub fn records(&self) -> &[RainfallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RainfallRecord> {
        self.records.iter()
    }

    /// Borrowed view over every record, the input shape the analysis
    /// functions and filters share.
    pub fn view(&self) -> Vec<&RainfallRecord> {
        self.records.iter().collect()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a RainfallRecord;
    type IntoIter = std::slice::Iter<'a, RainfallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Risk tiers
// ---------------------------------------------------------------------------

/// Flood risk tier, in ascending order of severity.
///
/// Derived purely from a rainfall magnitude by `risk::thresholds`; carries
/// no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Short name used in map popups and JSON output ("High").
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }

    /// Label shown next to predictions ("High Risk").
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Display colour for the tier.
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "#2a9d8f",
            RiskTier::Medium => "#f77f00",
            RiskTier::High => "#d62828",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

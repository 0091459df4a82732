/// Dataset diagnostics shown behind the admin login.

use serde::Serialize;

use crate::model::{Month, RecordSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub month: Month,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub records: usize,
    /// Columns in the source table, including unused ones.
    pub columns: usize,
    /// Empty cells in the source table. A row with an empty rainfall, year
    /// or flag cell fails to load, so only unused columns can contribute.
    pub missing_values: usize,
    pub monthly: Vec<MonthStats>,
    /// Flood rows as a fraction of all rows, 0.0..=1.0.
    pub flood_ratio: f64,
}

pub fn diagnostics(records: &RecordSet) -> Diagnostics {
    let monthly = if records.is_empty() {
        Vec::new()
    } else {
        Month::ALL
            .iter()
            .map(|&month| {
                let values = records.iter().map(|r| r.month(month));
                let (min, max, sum) = values.fold(
                    (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                    |(lo, hi, sum), v| (lo.min(v), hi.max(v), sum + v),
                );
                MonthStats { month, min, mean: sum / records.len() as f64, max }
            })
            .collect()
    };

    let floods = records.iter().filter(|r| r.flood).count();
    let flood_ratio = if records.is_empty() {
        0.0
    } else {
        floods as f64 / records.len() as f64
    };

    let shape = records.shape();
    Diagnostics {
        records: records.len(),
        columns: shape.columns,
        missing_values: shape.missing_values,
        monthly,
        flood_ratio,
    }
}

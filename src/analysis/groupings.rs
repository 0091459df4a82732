/// Grouping and reduction helpers over borrowed record views.
///
/// Every function takes `&[&RainfallRecord]` so filters compose freely:
///
/// ```ignore
/// let kelantan = filter_state(&records.view(), "Kelantan");
/// let recent = filter_years(&kelantan, 2010, 2015);
/// let yearly = total_annual_by_year(&recent);
/// ```
///
/// Grouped output is emitted in ascending key order unless a function says
/// otherwise. Records are never modified.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Month, RainfallRecord};

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyValue {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// A count keyed by a state or district name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

/// A value keyed by a state or district name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyValue {
    pub month: Month,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMonthlyTotals {
    pub state: String,
    /// Summed rainfall per month, JAN..DEC.
    pub monthly: [f64; 12],
}

/// Mean annual rainfall and flood count for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub mean_annual: f64,
    pub flood_events: usize,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Records with `from <= year <= to`.
pub fn filter_years<'a>(
    records: &[&'a RainfallRecord],
    from: i32,
    to: i32,
) -> Vec<&'a RainfallRecord> {
    records
        .iter()
        .copied()
        .filter(|r| r.year >= from && r.year <= to)
        .collect()
}

pub fn filter_state<'a>(records: &[&'a RainfallRecord], state: &str) -> Vec<&'a RainfallRecord> {
    records.iter().copied().filter(|r| r.state == state).collect()
}

pub fn filter_year<'a>(records: &[&'a RainfallRecord], year: i32) -> Vec<&'a RainfallRecord> {
    filter_years(records, year, year)
}

/// Distinct state names, sorted.
pub fn sorted_states(records: &[&RainfallRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.state.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, ascending.
pub fn sorted_years(records: &[&RainfallRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Earliest and latest year present, or `None` for an empty view.
pub fn year_bounds(records: &[&RainfallRecord]) -> Option<(i32, i32)> {
    let min = records.iter().map(|r| r.year).min()?;
    let max = records.iter().map(|r| r.year).max()?;
    Some((min, max))
}

// ---------------------------------------------------------------------------
// Annual rainfall by year
// ---------------------------------------------------------------------------

fn annual_by_year(records: &[&RainfallRecord]) -> BTreeMap<i32, (f64, usize)> {
    let mut acc: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = acc.entry(r.year).or_insert((0.0, 0));
        entry.0 += r.annual_total();
        entry.1 += 1;
    }
    acc
}

/// Mean of the per-record annual totals within each year.
pub fn mean_annual_by_year(records: &[&RainfallRecord]) -> Vec<YearlyValue> {
    annual_by_year(records)
        .into_iter()
        .map(|(year, (sum, n))| YearlyValue { year, value: sum / n as f64 })
        .collect()
}

/// Sum of the per-record annual totals within each year.
pub fn total_annual_by_year(records: &[&RainfallRecord]) -> Vec<YearlyValue> {
    annual_by_year(records)
        .into_iter()
        .map(|(year, (sum, _))| YearlyValue { year, value: sum })
        .collect()
}

/// Mean annual rainfall per district name.
///
/// Districts are keyed by name alone, so identically named districts in
/// different states share a group.
pub fn mean_annual_by_district(records: &[&RainfallRecord]) -> Vec<NamedValue> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = acc.entry(r.district.as_str()).or_insert((0.0, 0));
        entry.0 += r.annual_total();
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(name, (sum, n))| NamedValue {
            name: name.to_string(),
            value: sum / n as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Flood counts
// ---------------------------------------------------------------------------

fn count_floods_by<'a, F>(records: &[&'a RainfallRecord], key: F) -> Vec<NamedCount>
where
    F: Fn(&'a RainfallRecord) -> &'a str,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records.iter().copied().filter(|r| r.flood) {
        *counts.entry(key(r)).or_insert(0) += 1;
    }

    let mut rows: Vec<NamedCount> = counts
        .into_iter()
        .map(|(name, count)| NamedCount { name: name.to_string(), count })
        .collect();
    // Stable sort keeps the alphabetical order within equal counts.
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Flood rows per state, most floods first; ties in name order. States
/// without any flood row are absent.
pub fn flood_events_by_state(records: &[&RainfallRecord]) -> Vec<NamedCount> {
    count_floods_by(records, |r| r.state.as_str())
}

/// Flood rows per district name, most floods first; ties in name order.
pub fn flood_events_by_district(records: &[&RainfallRecord]) -> Vec<NamedCount> {
    count_floods_by(records, |r| r.district.as_str())
}

/// Flood rows per year. Every year present in the view appears, including
/// years with no floods.
pub fn flood_events_by_year(records: &[&RainfallRecord]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.year).or_insert(0) += usize::from(r.flood);
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Mean annual rainfall against flood count, per year.
pub fn yearly_rainfall_vs_floods(records: &[&RainfallRecord]) -> Vec<YearSummary> {
    let floods = flood_events_by_year(records);
    mean_annual_by_year(records)
        .into_iter()
        .zip(floods)
        .map(|(mean, flood)| YearSummary {
            year: mean.year,
            mean_annual: mean.value,
            flood_events: flood.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Monthly totals
// ---------------------------------------------------------------------------

fn sum_months<'a, I>(records: I) -> [f64; 12]
where
    I: IntoIterator<Item = &'a RainfallRecord>,
{
    let mut totals = [0.0; 12];
    for r in records {
        for (total, value) in totals.iter_mut().zip(r.monthly.iter()) {
            *total += value;
        }
    }
    totals
}

/// Rainfall summed per calendar month, JAN..DEC.
pub fn monthly_totals(records: &[&RainfallRecord]) -> Vec<MonthlyValue> {
    let totals = sum_months(records.iter().copied());
    Month::ALL
        .iter()
        .map(|&month| MonthlyValue { month, value: totals[month.index()] })
        .collect()
}

/// Per-state monthly totals, states in name order.
pub fn monthly_totals_by_state(records: &[&RainfallRecord]) -> Vec<StateMonthlyTotals> {
    sorted_states(records)
        .into_iter()
        .map(|state| {
            let monthly = sum_months(records.iter().copied().filter(|r| r.state == state));
            StateMonthlyTotals { state, monthly }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Headline numbers for the landing view and the national/state overviews.
///
/// `DatasetSummary` counts what the loaded dataset actually contains.
/// `NationalOverview` and `StateOverview` bundle the metric cards and the
/// grouped tables each overview shows.

use serde::Serialize;
use std::collections::BTreeSet;

use super::groupings::{
    filter_state, flood_events_by_district, flood_events_by_state, flood_events_by_year,
    mean_annual_by_district, monthly_totals, monthly_totals_by_state, yearly_rainfall_vs_floods,
    MonthlyValue, NamedCount, NamedValue, StateMonthlyTotals, YearCount, YearSummary,
};
use super::round_to;
use crate::model::{RainfallRecord, RecordSet};

// ---------------------------------------------------------------------------
// Dataset summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub states: usize,
    pub districts: usize,
    pub years: usize,
    pub flood_cases: usize,
    pub no_flood_cases: usize,
    /// Share of flood rows, in percent, rounded to 1 decimal.
    pub flood_pct: f64,
}

pub fn dataset_summary(records: &RecordSet) -> DatasetSummary {
    let states: BTreeSet<&str> = records.iter().map(|r| r.state.as_str()).collect();
    let districts: BTreeSet<&str> = records.iter().map(|r| r.district.as_str()).collect();
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let flood_cases = records.iter().filter(|r| r.flood).count();

    let flood_pct = if records.is_empty() {
        0.0
    } else {
        round_to(flood_cases as f64 * 100.0 / records.len() as f64, 1)
    };

    DatasetSummary {
        records: records.len(),
        states: states.len(),
        districts: districts.len(),
        years: years.len(),
        flood_cases,
        no_flood_cases: records.len() - flood_cases,
        flood_pct,
    }
}

// ---------------------------------------------------------------------------
// National overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalOverview {
    pub total_floods: usize,
    /// Mean annual rainfall across all rows, rounded to 1 decimal.
    pub avg_annual_rainfall: Option<f64>,
    pub most_flood_prone_state: Option<String>,
    pub wettest_district: Option<NamedValue>,
    pub floods_by_state: Vec<NamedCount>,
    pub yearly: Vec<YearSummary>,
    pub monthly_by_state: Vec<StateMonthlyTotals>,
}

fn mean_annual(records: &[&RainfallRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(|r| r.annual_total()).sum();
    Some(round_to(total / records.len() as f64, 1))
}

/// Highest value; the first one wins a tie.
fn max_value(values: Vec<NamedValue>) -> Option<NamedValue> {
    values.into_iter().fold(None, |best, v| match best {
        Some(b) if b.value >= v.value => Some(b),
        _ => Some(v),
    })
}

pub fn national_overview(records: &RecordSet) -> NationalOverview {
    let all = records.view();
    let floods_by_state = flood_events_by_state(&all);

    NationalOverview {
        total_floods: all.iter().filter(|r| r.flood).count(),
        avg_annual_rainfall: mean_annual(&all),
        most_flood_prone_state: floods_by_state.first().map(|c| c.name.clone()),
        wettest_district: max_value(mean_annual_by_district(&all)),
        floods_by_state,
        yearly: yearly_rainfall_vs_floods(&all),
        monthly_by_state: monthly_totals_by_state(&all),
    }
}

// ---------------------------------------------------------------------------
// State overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateOverview {
    pub state: String,
    pub floods: usize,
    pub avg_annual_rainfall: f64,
    pub most_flood_prone_district: Option<String>,
    pub district_floods: Vec<NamedCount>,
    /// The state's rainfall summed per calendar month.
    pub monthly_contribution: Vec<MonthlyValue>,
    /// Flood rows per year, dry years included.
    pub flood_trend: Vec<YearCount>,
}

/// Overview for one state, or `None` if the state has no records.
pub fn state_overview(records: &RecordSet, state: &str) -> Option<StateOverview> {
    let rows = filter_state(&records.view(), state);
    let avg_annual_rainfall = mean_annual(&rows)?;
    let district_floods = flood_events_by_district(&rows);

    Some(StateOverview {
        state: state.to_string(),
        floods: rows.iter().filter(|r| r.flood).count(),
        avg_annual_rainfall,
        most_flood_prone_district: district_floods.first().map(|c| c.name.clone()),
        district_floods,
        monthly_contribution: monthly_totals(&rows),
        flood_trend: flood_events_by_year(&rows),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

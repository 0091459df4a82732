/// Rainfall pattern series for a year range, nationwide or for one state.

use serde::Serialize;

use super::groupings::{
    filter_state, filter_years, monthly_totals, total_annual_by_year, year_bounds, MonthlyValue,
    YearlyValue,
};
use super::rolling::moving_average_5;
use crate::model::RecordSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallPattern {
    /// "Malaysia" or the state name.
    pub scope: String,
    pub from_year: i32,
    pub to_year: i32,
    /// Summed annual rainfall per year.
    pub yearly_totals: Vec<YearlyValue>,
    /// Mean of `yearly_totals`; `None` when the range holds no data.
    pub long_term_average: Option<f64>,
    /// Five-year trailing average of `yearly_totals`.
    pub moving_average: Vec<YearlyValue>,
    /// Monthly totals over the selected years.
    pub monthly_distribution: Vec<MonthlyValue>,
    /// Monthly totals over every year of the scope, ignoring the range.
    pub all_years_monthly: Vec<MonthlyValue>,
}

/// Full year span available for the scope; the default slider range.
pub fn available_range(records: &RecordSet, state: Option<&str>) -> Option<(i32, i32)> {
    let all = records.view();
    match state {
        Some(name) => year_bounds(&filter_state(&all, name)),
        None => year_bounds(&all),
    }
}

pub fn rainfall_pattern(
    records: &RecordSet,
    state: Option<&str>,
    from_year: i32,
    to_year: i32,
) -> RainfallPattern {
    let all = records.view();
    let scoped = match state {
        Some(name) => filter_state(&all, name),
        None => all,
    };
    let selected = filter_years(&scoped, from_year, to_year);

    let yearly_totals = total_annual_by_year(&selected);
    let long_term_average = if yearly_totals.is_empty() {
        None
    } else {
        Some(yearly_totals.iter().map(|y| y.value).sum::<f64>() / yearly_totals.len() as f64)
    };

    let totals: Vec<f64> = yearly_totals.iter().map(|y| y.value).collect();
    let moving_average = yearly_totals
        .iter()
        .zip(moving_average_5(&totals))
        .map(|(y, value)| YearlyValue { year: y.year, value })
        .collect();

    log::debug!(
        "Pattern for {:?} {}-{}: {} years selected",
        state,
        from_year,
        to_year,
        yearly_totals.len()
    );

    RainfallPattern {
        scope: state.unwrap_or("Malaysia").to_string(),
        from_year,
        to_year,
        yearly_totals,
        long_term_average,
        moving_average,
        monthly_distribution: monthly_totals(&selected),
        all_years_monthly: monthly_totals(&scoped),
    }
}

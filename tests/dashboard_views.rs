/// Integration tests for the dashboard views over the shipped sample data
///
/// These tests verify:
/// 1. The sample dataset, credential table and boundary file load
/// 2. Overview, pattern and map views agree with each other
/// 3. The admin gate guards the diagnostics view
///
/// Run with: cargo test --test dashboard_views

use mfps_dashboard::analysis::diagnostics::diagnostics;
use mfps_dashboard::analysis::district_map::{build_district_map, DEFAULT_CENTER};
use mfps_dashboard::analysis::groupings::{
    flood_events_by_state, sorted_states, sorted_years, total_annual_by_year,
};
use mfps_dashboard::analysis::overview::{dataset_summary, national_overview, state_overview};
use mfps_dashboard::analysis::patterns::{available_range, rainfall_pattern};
use mfps_dashboard::auth::{AdminSession, AuthError, CredentialStore};
use mfps_dashboard::ingest::boundaries::{load_boundaries, BoundaryError};
use mfps_dashboard::ingest::records::load_records;
use mfps_dashboard::model::RecordSet;
use mfps_dashboard::risk::thresholds::classify_annual;

use std::path::PathBuf;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn sample_records() -> RecordSet {
    load_records(data_path("your_flood_data.csv")).expect("sample dataset should load")
}

#[test]
fn test_sample_dataset_summary() {
    let records = sample_records();
    let summary = dataset_summary(&records);
    assert_eq!(summary.records, records.len());
    assert_eq!(summary.states, 6);
    assert_eq!(summary.years, 11);
    assert_eq!(summary.flood_cases + summary.no_flood_cases, summary.records);
    assert!(summary.flood_pct > 0.0 && summary.flood_pct < 100.0);
}

#[test]
fn test_national_overview_matches_groupings() {
    let records = sample_records();
    let overview = national_overview(&records);
    let by_state = flood_events_by_state(&records.view());

    assert_eq!(overview.floods_by_state, by_state);
    assert_eq!(
        overview.total_floods,
        by_state.iter().map(|s| s.count).sum::<usize>()
    );
    assert_eq!(overview.most_flood_prone_state.as_deref(), Some("Kelantan"));
    for pair in by_state.windows(2) {
        assert!(pair[0].count >= pair[1].count, "descending flood counts");
    }
}

#[test]
fn test_state_overviews_partition_floods() {
    let records = sample_records();
    let national = national_overview(&records);
    let mut total = 0;
    for state in sorted_states(&records.view()) {
        let overview = state_overview(&records, &state).expect("state has rows");
        let trend_sum: usize = overview.flood_trend.iter().map(|y| y.count).sum();
        assert_eq!(trend_sum, overview.floods, "{}", state);
        total += overview.floods;
    }
    assert_eq!(total, national.total_floods);
}

#[test]
fn test_full_range_pattern_matches_yearly_totals() {
    let records = sample_records();
    let (from, to) = available_range(&records, None).expect("dataset is not empty");
    assert_eq!((from, to), (2010, 2020));

    let pattern = rainfall_pattern(&records, None, from, to);
    assert_eq!(pattern.yearly_totals, total_annual_by_year(&records.view()));
    assert_eq!(pattern.moving_average[0].value, pattern.yearly_totals[0].value);
    assert_eq!(pattern.moving_average.len(), 11);

    let monthly_sum: f64 = pattern.monthly_distribution.iter().map(|m| m.value).sum();
    let yearly_sum: f64 = pattern.yearly_totals.iter().map(|y| y.value).sum();
    assert!((monthly_sum - yearly_sum).abs() < 1e-6);
}

#[test]
fn test_district_map_every_year() {
    let records = sample_records();
    let boundaries = load_boundaries(data_path("malaysia_districts.geojson"))
        .expect("sample boundaries should load");

    for year in sorted_years(&records.view()) {
        let map = build_district_map(&records, &boundaries, year, None);
        assert_eq!(map.view.center, DEFAULT_CENTER);
        assert_eq!(map.districts.len(), 14, "every sample district reports each year");
        assert_eq!(map.features.features.len(), 14, "Gua Musang has no data and is dropped");

        for feature in &map.features.features {
            let rainfall = feature.properties["ANNUAL_RAINFALL"]
                .as_f64()
                .expect("annotated with rainfall");
            let tier = classify_annual(rainfall);
            assert_eq!(feature.properties["flood_risk"], tier.as_str());
        }
    }
}

#[test]
fn test_state_map_zooms_in() {
    let records = sample_records();
    let boundaries = load_boundaries(data_path("malaysia_districts.geojson")).expect("boundaries");
    let map = build_district_map(&records, &boundaries, 2015, Some("Kelantan"));
    assert_eq!(map.view.zoom, 7);
    assert_eq!(map.view.center, [5.3, 102.0]);
    assert_eq!(map.districts.len(), 3);
    let counted: usize = map.tier_counts().iter().map(|(_, n)| n).sum();
    assert_eq!(counted, 3);
    for d in &map.districts {
        assert_eq!(d.state, "Kelantan");
        assert_eq!(d.flood_risk, classify_annual(d.annual_rainfall));
    }
}

#[test]
fn test_missing_boundary_file_is_reported() {
    let err = load_boundaries(data_path("missing.geojson")).expect_err("no such file");
    assert!(matches!(err, BoundaryError::NotFound(_)));
    assert!(err.to_string().starts_with("GeoJSON file not found"));
}

#[test]
fn test_admin_gate_guards_diagnostics() {
    let store = CredentialStore::load(data_path("admin_users.csv")).expect("credentials load");
    let mut session = AdminSession::new();

    let err = session.login(&store, "admin", "letmein").expect_err("wrong password");
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(session.require().is_err());

    session.login(&store, "admin", "admin123").expect("valid login");
    assert_eq!(session.require().expect("logged in"), "admin");

    let records = sample_records();
    let report = diagnostics(&records);
    assert_eq!(report.records, records.len());
    // The sample file carries the upstream ANNUAL RAINFALL column too
    assert_eq!(report.columns, 17);
    assert_eq!(report.missing_values, 0);
    assert_eq!(report.monthly.len(), 12);
    for m in &report.monthly {
        assert!(m.min <= m.mean && m.mean <= m.max, "{}", m.month);
    }
}

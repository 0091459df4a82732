/// District-level annual rainfall and flood risk for the interactive map.
///
/// For a chosen year, district rows are grouped by (state, district) and
/// their annual totals averaged. Each district is classified on the annual
/// scale, optionally restricted to one state, and the boundary collection is
/// cut down to the districts that have data. Kept features gain two
/// properties:
///
/// - `ANNUAL_RAINFALL`: the district's mean annual rainfall (mm)
/// - `flood_risk`: "Low", "Medium" or "High"
///
/// Rendering is left to whatever consumes the annotated collection.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::groupings::filter_year;
use crate::ingest::boundaries::{BoundaryCollection, BoundaryFeature};
use crate::model::{RecordSet, RiskTier};
use crate::risk::thresholds::classify_annual;

// ---------------------------------------------------------------------------
// Map framing
// ---------------------------------------------------------------------------

/// Centre of peninsular Malaysia, used when no state is selected.
pub const DEFAULT_CENTER: [f64; 2] = [4.2105, 101.9758];
pub const DEFAULT_ZOOM: u8 = 6;
pub const STATE_ZOOM: u8 = 7;
/// Centre used for a selected state missing from `STATE_CENTERS`.
pub const FALLBACK_STATE_CENTER: [f64; 2] = [4.2, 101.9];

/// Approximate [lat, lon] centre of each state.
pub const STATE_CENTERS: [(&str, [f64; 2]); 14] = [
    ("Johor", [1.85, 103.5]),
    ("Kedah", [6.1, 100.4]),
    ("Kelantan", [5.3, 102.0]),
    ("Melaka", [2.2, 102.3]),
    ("Negeri Sembilan", [2.7, 102.1]),
    ("Pahang", [3.8, 102.4]),
    ("Perak", [4.8, 101.0]),
    ("Perlis", [6.6, 100.2]),
    ("Pulau Pinang", [5.4, 100.3]),
    ("Sabah", [5.5, 117.0]),
    ("Sarawak", [2.5, 113.0]),
    ("Selangor", [3.1, 101.6]),
    ("Terengganu", [5.2, 103.1]),
    ("Wilayah Persekutuan", [3.15, 101.7]),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
}

pub fn map_view(state: Option<&str>) -> MapView {
    match state {
        None => MapView { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM },
        Some(name) => {
            let center = STATE_CENTERS
                .iter()
                .find(|(s, _)| *s == name)
                .map(|(_, c)| *c)
                .unwrap_or(FALLBACK_STATE_CENTER);
            MapView { center, zoom: STATE_ZOOM }
        }
    }
}

/// Popup background for a district's tier.
pub fn popup_background(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => "#f8d7da",
        RiskTier::Medium => "#fff3cd",
        RiskTier::Low => "#d4edda",
    }
}

// ---------------------------------------------------------------------------
// District risk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictRisk {
    pub state: String,
    pub district: String,
    pub annual_rainfall: f64,
    pub flood_risk: RiskTier,
}

/// Mean annual rainfall and annual-scale risk per (state, district) for
/// `year`, ordered by state then district.
pub fn district_risks(records: &RecordSet, year: i32, state: Option<&str>) -> Vec<DistrictRisk> {
    let mut acc: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for r in filter_year(&records.view(), year) {
        let entry = acc
            .entry((r.state.as_str(), r.district.as_str()))
            .or_insert((0.0, 0));
        entry.0 += r.annual_total();
        entry.1 += 1;
    }

    acc.into_iter()
        .filter(|((s, _), _)| state.is_none_or(|wanted| *s == wanted))
        .map(|((s, d), (sum, n))| {
            let annual_rainfall = sum / n as f64;
            DistrictRisk {
                state: s.to_string(),
                district: d.to_string(),
                annual_rainfall,
                flood_risk: classify_annual(annual_rainfall),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Annotated map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictMap {
    pub year: i32,
    pub state: Option<String>,
    pub view: MapView,
    pub districts: Vec<DistrictRisk>,
    /// Boundary features for districts with data, annotated.
    pub features: BoundaryCollection,
}

impl DistrictMap {
    /// Number of districts per tier, High first.
    pub fn tier_counts(&self) -> [(RiskTier, usize); 3] {
        [RiskTier::High, RiskTier::Medium, RiskTier::Low]
            .map(|tier| (tier, self.districts.iter().filter(|d| d.flood_risk == tier).count()))
    }
}

fn annotate(feature: &BoundaryFeature, risk: &DistrictRisk) -> BoundaryFeature {
    let mut feature = feature.clone();
    feature
        .properties
        .insert("ANNUAL_RAINFALL".to_string(), Value::from(risk.annual_rainfall));
    feature
        .properties
        .insert("flood_risk".to_string(), Value::from(risk.flood_risk.as_str()));
    feature
}

pub fn build_district_map(
    records: &RecordSet,
    boundaries: &BoundaryCollection,
    year: i32,
    state: Option<&str>,
) -> DistrictMap {
    let districts = district_risks(records, year, state);

    // Features are matched on district name alone; a repeated name resolves
    // to its first (state, district) row.
    let features = boundaries
        .features
        .iter()
        .filter_map(|feature| {
            let name = feature.district()?;
            let risk = districts.iter().find(|d| d.district == name)?;
            Some(annotate(feature, risk))
        })
        .collect::<Vec<_>>();

    let unmatched = districts
        .iter()
        .filter(|d| boundaries.find(&d.district).is_none())
        .count();
    if unmatched > 0 {
        log::warn!("{} districts in {} have no boundary feature", unmatched, year);
    }

    DistrictMap {
        year,
        state: state.map(str::to_string),
        view: map_view(state),
        districts,
        features: BoundaryCollection {
            collection_type: boundaries.collection_type.clone(),
            features,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

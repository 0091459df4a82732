/// Test fixtures: small but structurally complete input files.
///
/// The record fixture is hand-built so every aggregate is easy to verify by
/// hand:
///
/// | state    | district   | year | monthly        | annual | flood |
/// |----------|------------|------|----------------|--------|-------|
/// | Kelantan | Kota Bharu | 2000 | 250, 200×10, 500 | 2750 | 1 |
/// | Kelantan | Kota Bharu | 2001 | 300×12         | 3600   | 1     |
/// | Kelantan | Pasir Mas  | 2000 | 200×12         | 2400   | 1     |
/// | Kelantan | Pasir Mas  | 2001 | 150×12         | 1800   | 0     |
/// | Johor    | Kluang     | 2000 | 100×12         | 1200   | 0     |
/// | Johor    | Kluang     | 2001 | 250×12         | 3000   | 1     |
/// | Johor    | Segamat    | 2002 | 220×12         | 2640   | 0     |
/// | Selangor | Klang      | 2002 | 180×12         | 2160   | 0     |

/// Eight district-year rows across three states and three years.
#[cfg(test)]
pub(crate) fn fixture_records_csv() -> &'static str {
    "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,FLOOD
Kelantan,Kota Bharu,2000,250,200,200,200,200,200,200,200,200,200,200,500,1
Kelantan,Kota Bharu,2001,300,300,300,300,300,300,300,300,300,300,300,300,1
Kelantan,Pasir Mas,2000,200,200,200,200,200,200,200,200,200,200,200,200,1
Kelantan,Pasir Mas,2001,150,150,150,150,150,150,150,150,150,150,150,150,0
Johor,Kluang,2000,100,100,100,100,100,100,100,100,100,100,100,100,0
Johor,Kluang,2001,250,250,250,250,250,250,250,250,250,250,250,250,1
Johor,Segamat,2002,220,220,220,220,220,220,220,220,220,220,220,220,0
Selangor,Klang,2002,180,180,180,180,180,180,180,180,180,180,180,180,0
"
}

/// Parsed form of `fixture_records_csv`.
#[cfg(test)]
pub(crate) fn fixture_records() -> crate::model::RecordSet {
    crate::ingest::records::parse_records(fixture_records_csv().as_bytes())
        .expect("record fixture should parse")
}

/// Admin credential table with two accounts.
#[cfg(test)]
pub(crate) fn fixture_credentials_csv() -> &'static str {
    "username,password
admin,flood2026
analyst,monsoon
"
}

/// State model summary: Kelantan has 6- and 7-month models, Johor only 6.
#[cfg(test)]
pub(crate) fn fixture_state_summary_csv() -> &'static str {
    "State,Input_Months,Model_File
Kelantan,6,rf_Kelantan_6m.json
Kelantan,7,rf_Kelantan_7m.json
Johor,6,rf_Johor_6m.json
"
}

/// Linear persistence model over six months: predicts the latest value.
#[cfg(test)]
pub(crate) fn fixture_linear_artifact_json() -> &'static str {
    r#"{
      "kind": "linear",
      "input_len": 6,
      "intercept": 0.0,
      "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
    }"#
}

/// Two-tree forest over six months.
///
/// Tree 1 splits on the newest month: <= 250 mm predicts 200, otherwise 400.
/// Tree 2 is a single leaf of 300. The forest mean is therefore 250 for a
/// newest month <= 250 mm and 350 above it.
#[cfg(test)]
pub(crate) fn fixture_forest_artifact_json() -> &'static str {
    r#"{
      "kind": "forest",
      "input_len": 6,
      "trees": [
        { "nodes": [
            { "feature": 5, "threshold": 250.0, "left": 1, "right": 2 },
            { "leaf": 200.0 },
            { "leaf": 400.0 }
        ] },
        { "nodes": [ { "leaf": 300.0 } ] }
      ]
    }"#
}

/// District boundaries keyed by `NAME_2`. Gua Musang has no records.
#[cfg(test)]
pub(crate) fn fixture_boundaries_geojson() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        { "type": "Feature", "properties": { "NAME_1": "Kelantan", "NAME_2": "Kota Bharu" },
          "geometry": { "type": "Polygon", "coordinates": [[[102.2, 6.1], [102.3, 6.1], [102.3, 6.2], [102.2, 6.1]]] } },
        { "type": "Feature", "properties": { "NAME_1": "Kelantan", "NAME_2": "Pasir Mas" },
          "geometry": { "type": "Polygon", "coordinates": [[[102.1, 6.0], [102.2, 6.0], [102.2, 6.1], [102.1, 6.0]]] } },
        { "type": "Feature", "properties": { "NAME_1": "Kelantan", "NAME_2": "Gua Musang" },
          "geometry": { "type": "Polygon", "coordinates": [[[101.9, 4.8], [102.0, 4.8], [102.0, 4.9], [101.9, 4.8]]] } },
        { "type": "Feature", "properties": { "NAME_1": "Johor", "NAME_2": "Kluang" },
          "geometry": { "type": "Polygon", "coordinates": [[[103.3, 2.0], [103.4, 2.0], [103.4, 2.1], [103.3, 2.0]]] } },
        { "type": "Feature", "properties": { "NAME_1": "Johor", "NAME_2": "Segamat" },
          "geometry": { "type": "Polygon", "coordinates": [[[102.8, 2.5], [102.9, 2.5], [102.9, 2.6], [102.8, 2.5]]] } },
        { "type": "Feature", "properties": { "NAME_1": "Selangor", "NAME_2": "Klang" },
          "geometry": { "type": "Polygon", "coordinates": [[[101.4, 3.0], [101.5, 3.0], [101.5, 3.1], [101.4, 3.0]]] } }
      ]
    }"#
}

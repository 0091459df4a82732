/// Rainfall dataset loader.
///
/// Reads the historical record CSV. The file has one row per district-year:
///
/// ```text
/// STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,...,DEC,FLOOD
/// Kelantan,Kota Bharu,2000,230.1,98.4,...,612.0,1
/// ```
///
/// Header names are whitespace-trimmed before matching, and columns not
/// listed above (the upstream dataset also carries an `ANNUAL RAINFALL`
/// column) are ignored. The annual total is always recomputed from the
/// monthly columns.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::model::{RainfallRecord, RecordSet, SourceShape};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Dataset not found: {0}")]
    NotFound(String),
    #[error("Failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {row}: invalid FLOOD value '{value}' (expected 0 or 1)")]
    InvalidFlag { row: usize, value: String },
    #[error("Row {row}: {column} has negative rainfall {value}")]
    NegativeRainfall {
        row: usize,
        column: &'static str,
        value: f64,
    },
    #[error("Row {row}: {column} is not a finite rainfall value ({value})")]
    NonFiniteRainfall {
        row: usize,
        column: &'static str,
        value: f64,
    },
}

/// Row layout as it appears in the CSV.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "STATE_NAME")]
    state: String,
    #[serde(rename = "DISTRICT_NAME")]
    district: String,
    #[serde(rename = "YEAR")]
    year: i32,
    #[serde(rename = "JAN")]
    jan: f64,
    #[serde(rename = "FEB")]
    feb: f64,
    #[serde(rename = "MAR")]
    mar: f64,
    #[serde(rename = "APR")]
    apr: f64,
    #[serde(rename = "MAY")]
    may: f64,
    #[serde(rename = "JUN")]
    jun: f64,
    #[serde(rename = "JUL")]
    jul: f64,
    #[serde(rename = "AUG")]
    aug: f64,
    #[serde(rename = "SEP")]
    sep: f64,
    #[serde(rename = "OCT")]
    oct: f64,
    #[serde(rename = "NOV")]
    nov: f64,
    #[serde(rename = "DEC")]
    dec: f64,
    #[serde(rename = "FLOOD")]
    flood: String,
}

impl RawRecord {
    fn into_record(self, row: usize) -> Result<RainfallRecord, RecordError> {
        let monthly = [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ];

        for (month, value) in crate::model::Month::ALL.iter().zip(monthly.iter()) {
            if !value.is_finite() {
                return Err(RecordError::NonFiniteRainfall {
                    row,
                    column: month.column(),
                    value: *value,
                });
            }
            if *value < 0.0 {
                return Err(RecordError::NegativeRainfall {
                    row,
                    column: month.column(),
                    value: *value,
                });
            }
        }

        let flood = parse_flood_flag(&self.flood).ok_or_else(|| RecordError::InvalidFlag {
            row,
            value: self.flood.clone(),
        })?;

        Ok(RainfallRecord {
            state: self.state.trim().to_string(),
            district: self.district.trim().to_string(),
            year: self.year,
            monthly,
            flood,
        })
    }
}

/// Interprets the binary flood indicator. Spreadsheet exports sometimes
/// write it as a float ("1.0"), so those are accepted too.
fn parse_flood_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "1.0" => Some(true),
        "0" | "0.0" => Some(false),
        _ => None,
    }
}

/// Parses records from any CSV source.
///
/// The returned set also carries the table's shape: every header column and
/// every empty cell, including those in columns the records do not use.
pub fn parse_records<R: Read>(reader: R) -> Result<RecordSet, RecordError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut shape = SourceShape {
        columns: headers.len(),
        missing_values: 0,
    };

    let mut records = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        // Row numbers are 1-based and count the header line.
        let row = idx + 2;
        let cells = result?;
        shape.missing_values += cells.iter().filter(|cell| cell.trim().is_empty()).count();

        let raw: RawRecord = cells.deserialize(Some(&headers))?;
        records.push(raw.into_record(row)?);
    }

    Ok(RecordSet::new(records).with_shape(shape))
}

/// Loads the rainfall dataset from disk.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<RecordSet, RecordError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(RecordError::NotFound(display));
    }

    let file = File::open(path).map_err(|source| RecordError::Io {
        path: display.clone(),
        source,
    })?;

    let records = parse_records(file)?;
    log::info!("Loaded {} rainfall records from {}", records.len(), display);
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::model::Month;

    #[test]
    fn test_parse_fixture_row_count() {
        let records = parse_records(fixture_records_csv().as_bytes()).expect("fixture should parse");
        assert_eq!(records.len(), 8);
    }

    #[test]
    fn test_parse_preserves_monthly_values_and_flag() {
        let records = parse_records(fixture_records_csv().as_bytes()).expect("fixture should parse");
        let first = &records.records()[0];
        assert_eq!(first.state, "Kelantan");
        assert_eq!(first.district, "Kota Bharu");
        assert_eq!(first.year, 2000);
        assert_eq!(first.month(Month::Jan), 250.0);
        assert_eq!(first.month(Month::Dec), 500.0);
        assert!(first.flood);
    }

    #[test]
    fn test_padded_headers_are_trimmed() {
        let csv = "STATE_NAME , DISTRICT_NAME,YEAR ,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC, FLOOD\n\
                   Johor,Kluang,2003,1,2,3,4,5,6,7,8,9,10,11,12,0\n";
        let records = parse_records(csv.as_bytes()).expect("padded headers should parse");
        assert_eq!(records.len(), 1);
        assert!((records.records()[0].annual_total() - 78.0).abs() < 1e-9);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANNUAL RAINFALL,FLOOD\n\
                   Johor,Kluang,2003,1,1,1,1,1,1,1,1,1,1,1,1,9999,1.0\n";
        let records = parse_records(csv.as_bytes()).expect("extra column should be ignored");
        let r = &records.records()[0];
        assert!((r.annual_total() - 12.0).abs() < 1e-9);
        assert!(r.flood);
    }

    #[test]
    fn test_invalid_flood_flag_is_reported() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,FLOOD\n\
                   Johor,Kluang,2003,1,1,1,1,1,1,1,1,1,1,1,1,yes\n";
        let err = parse_records(csv.as_bytes()).expect_err("'yes' is not a valid flag");
        match err {
            RecordError::InvalidFlag { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_rainfall_is_reported() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,FLOOD\n\
                   Johor,Kluang,2003,1,1,-4,1,1,1,1,1,1,1,1,1,0\n";
        let err = parse_records(csv.as_bytes()).expect_err("negative rainfall should fail");
        assert!(err.to_string().contains("MAR"));
    }

    #[test]
    fn test_nan_rainfall_is_reported() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,FLOOD\n\
                   Kelantan,Kota Bharu,2003,NaN,400,400,400,400,400,400,400,400,400,400,400,1\n";
        let err = parse_records(csv.as_bytes()).expect_err("NaN rainfall should fail");
        match err {
            RecordError::NonFiniteRainfall { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "JAN");
                assert!(value.is_nan());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_infinite_rainfall_is_reported() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,FLOOD\n\
                   Kelantan,Kota Bharu,2003,400,400,400,400,400,400,400,400,400,400,400,inf,1\n";
        let err = parse_records(csv.as_bytes()).expect_err("infinite rainfall should fail");
        assert!(matches!(
            err,
            RecordError::NonFiniteRainfall { column: "DEC", .. }
        ));
    }

    #[test]
    fn test_shape_counts_every_header_and_empty_cell() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC, ANNUAL RAINFALL ,FLOOD\n\
                   Johor,Kluang,2003,1,1,1,1,1,1,1,1,1,1,1,1,,0\n\
                   Johor,Kluang,2004,1,1,1,1,1,1,1,1,1,1,1,1,12,1\n";
        let records = parse_records(csv.as_bytes()).expect("blank unused cell should parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records.shape().columns, 17);
        assert_eq!(records.shape().missing_values, 1);
    }

    #[test]
    fn test_missing_column_is_a_csv_error() {
        let csv = "STATE_NAME,DISTRICT_NAME,YEAR,JAN\nJohor,Kluang,2003,1\n";
        assert!(matches!(
            parse_records(csv.as_bytes()),
            Err(RecordError::Csv(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_records("no/such/dataset.csv").expect_err("missing file should fail");
        assert!(matches!(err, RecordError::NotFound(_)));
    }
}

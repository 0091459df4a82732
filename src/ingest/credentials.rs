/// Admin credential table loader (CSV: `username,password`).

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential table not found: {0}")]
    NotFound(String),
    #[error("Failed to open credential table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the credential table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Parses credentials from any CSV source.
pub fn parse_credentials<R: Read>(reader: R) -> Result<Vec<Credential>, CredentialError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut credentials = Vec::new();
    for result in csv_reader.deserialize::<Credential>() {
        credentials.push(result?);
    }
    Ok(credentials)
}

/// Loads the credential table from disk.
pub fn load_credentials<P: AsRef<Path>>(path: P) -> Result<Vec<Credential>, CredentialError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(CredentialError::NotFound(display));
    }

    let file = File::open(path).map_err(|source| CredentialError::Io {
        path: display,
        source,
    })?;
    parse_credentials(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::fixture_credentials_csv;

    #[test]
    fn test_parse_fixture_credentials() {
        let creds = parse_credentials(fixture_credentials_csv().as_bytes())
            .expect("fixture should parse");
        assert_eq!(creds.len(), 2);
        assert_eq!(creds[0].username, "admin");
        assert_eq!(creds[1].password, "monsoon");
    }

    #[test]
    fn test_missing_table() {
        assert!(matches!(
            load_credentials("no/such/admins.csv"),
            Err(CredentialError::NotFound(_))
        ));
    }
}

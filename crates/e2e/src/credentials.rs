//! Login credential rows loaded from CSV

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};

/// Outcome a credential row is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Pass,
    Fail,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Pass => f.write_str("pass"),
            Expectation::Fail => f.write_str("fail"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialRow {
    pub username: String,
    pub password: String,
    #[serde(deserialize_with = "trimmed_expectation")]
    pub expected: Expectation,
}

/// Credentials are taken verbatim; only the `expected` marker tolerates padding
fn trimmed_expectation<'de, D>(deserializer: D) -> Result<Expectation, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "pass" => Ok(Expectation::Pass),
        "fail" => Ok(Expectation::Fail),
        other => Err(serde::de::Error::custom(format!(
            "unknown expectation '{}', expected 'pass' or 'fail'",
            other
        ))),
    }
}

impl fmt::Debug for CredentialRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRow")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("expected", &self.expected)
            .finish()
    }
}

/// Read-only set of credential rows for one run
#[derive(Debug, Clone)]
pub struct CredentialSet {
    path: PathBuf,
    rows: Vec<CredentialRow>,
}

impl CredentialSet {
    /// Load rows from a CSV file with a `username,password,expected` header
    pub fn load(path: &Path) -> E2eResult<Self> {
        info!("Loading login data from {}", path.display());
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)?;
        let rows = Self::read_rows(reader, path)?;
        debug!("Loaded {} credential row(s)", rows.len());

        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    /// Parse rows from in-memory CSV text; `origin` is used in error messages
    pub fn from_csv(content: &str, origin: &Path) -> E2eResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(content.as_bytes());
        let rows = Self::read_rows(reader, origin)?;

        Ok(Self {
            path: origin.to_path_buf(),
            rows,
        })
    }

    fn read_rows<R: std::io::Read>(
        mut reader: csv::Reader<R>,
        path: &Path,
    ) -> E2eResult<Vec<CredentialRow>> {
        let headers = reader.headers()?.clone();
        for column in ["username", "password", "expected"] {
            if !headers.iter().any(|h| h == column) {
                return Err(E2eError::Credentials {
                    path: path.to_path_buf(),
                    reason: format!("missing column '{}'", column),
                });
            }
        }

        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<CredentialRow>().enumerate() {
            let row = record.map_err(|e| E2eError::Credentials {
                path: path.to_path_buf(),
                // Row 1 is the header
                reason: format!("row {}: {}", index + 2, e),
            })?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// First row with the given expectation
    pub fn first(&self, expected: Expectation) -> E2eResult<&CredentialRow> {
        self.rows
            .iter()
            .find(|row| row.expected == expected)
            .ok_or_else(|| E2eError::NoCredentialRow {
                expected,
                path: self.path.clone(),
            })
    }

    pub fn rows(&self) -> &[CredentialRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

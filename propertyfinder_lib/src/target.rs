//! Search targets and the per-target result collection.

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::error::ConfigError;
use crate::record::{DetailRecord, ExportRow};

/// One configured search: a fully-formed results URL for one site and
/// filter combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    url: String,
    domain: String,
    token: String,
}

impl SearchTarget {
    /// Validates `url` as an absolute http(s) URL with a host.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url)
            .map_err(|e| ConfigError::Invalid(format!("invalid target url {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "target url {} must use http or https",
                url
            )));
        }
        let domain = parsed
            .host_str()
            .ok_or_else(|| ConfigError::Invalid(format!("target url {} has no host", url)))?
            .to_string();
        let token = domain
            .rsplit('.')
            .next()
            .unwrap_or(domain.as_str())
            .to_string();
        Ok(Self {
            url: url.to_string(),
            domain,
            token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host name, e.g. `www.propertyfinder.ae`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Last label of the host (`ae`, `qa`, ...), used to name the artifact.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Name of the file this target's rows are written to.
    pub fn artifact_name(&self, extension: &str) -> String {
        format!("{}_database.{}", self.token, extension)
    }

    /// URL of results page `page` (1-based).
    pub fn page_url(&self, page: u32) -> String {
        format!("{}&page={}", self.url, page)
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Deduplicated rows collected for one target, in first-seen order.
///
/// Rows are compared on every exported column: exact duplicates collapse,
/// rows that differ in any column are both kept.
#[derive(Debug, Default)]
pub struct TargetResult {
    rows: Vec<ExportRow>,
    seen: HashSet<ExportRow>,
}

impl TargetResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record's exported row; returns `false` if it was a duplicate.
    pub fn push(&mut self, record: &DetailRecord) -> bool {
        self.push_row(record.to_export_row())
    }

    pub fn push_row(&mut self, row: ExportRow) -> bool {
        if self.seen.contains(&row) {
            return false;
        }
        self.seen.insert(row.clone());
        self.rows.push(row);
        true
    }

    /// Merges a page batch in order; returns how many rows were new.
    pub fn extend<I: IntoIterator<Item = ExportRow>>(&mut self, batch: I) -> usize {
        let mut added = 0;
        for row in batch {
            if self.push_row(row) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Seals the collection, handing out the rows.
    pub fn finish(self) -> Vec<ExportRow> {
        self.rows
    }
}

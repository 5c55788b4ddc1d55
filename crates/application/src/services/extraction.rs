//! Markdown Test-Case Extraction
//!
//! Turns a markdown document of service sections into test cases. Each `##`
//! section header maps to a canonical service area, and the section body
//! carries a 2-column pipe table of tool identifier / prompt rows.

use indexmap::IndexMap;
use mcp_eval_domain::{ExtractionError, TestCase};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, instrument, warn};

static SECTION_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"##\s+").unwrap());
static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|:?-+:?\|:?-+:?\|").unwrap());

/// Mapping from markdown section headers to canonical service area names.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ServiceMappings {
    headers: IndexMap<String, String>,
}

impl ServiceMappings {
    /// The built-in header mapping.
    pub fn defaults() -> Self {
        let headers = [
            ("Azure Kubernetes Service (AKS)", "aks"),
            ("Azure App Configuration", "appconfig"),
            ("Azure Cosmos DB", "cosmos"),
            ("Azure AI Foundry", "foundry"),
            ("Azure Key Vault", "keyvault"),
            ("Azure Data Explorer", "kusto"),
            ("Azure Monitor", "monitor"),
            ("Azure Database for PostgreSQL", "postgres"),
            ("Azure Cache for Redis", "redis"),
            ("Azure AI Search", "search"),
            ("Azure Service Bus", "servicebus"),
            ("Azure SQL Database", "sql"),
            ("Azure Storage", "storage"),
        ]
        .into_iter()
        .map(|(header, area)| (header.to_string(), area.to_string()))
        .collect();

        Self { headers }
    }

    /// Load a mapping of the same JSON shape from a file, replacing the
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self, ExtractionError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ExtractionError::InvalidMappings {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        serde_json::from_str(&contents).map_err(|e| ExtractionError::InvalidMappings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical service area for a section header, if mapped.
    pub fn area_for(&self, header: &str) -> Option<&str> {
        self.headers.get(header).map(String::as_str)
    }

    /// Sorted, deduplicated list of canonical service areas.
    pub fn available_areas(&self) -> Vec<String> {
        let areas: BTreeSet<&str> = self.headers.values().map(String::as_str).collect();
        areas.into_iter().map(String::from).collect()
    }

    /// Reject filter entries that name no known service area.
    pub fn validate_filter(&self, requested: &[String]) -> Result<(), ExtractionError> {
        let valid: BTreeSet<&str> = self.headers.values().map(String::as_str).collect();
        let invalid: Vec<String> = requested
            .iter()
            .filter(|area| !valid.contains(area.as_str()))
            .cloned()
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(ExtractionError::UnknownServiceAreas {
                invalid,
                available: self.available_areas(),
            })
        }
    }
}

impl Default for ServiceMappings {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Extracts test cases from a markdown prompt document.
pub struct MarkdownExtractor {
    mappings: ServiceMappings,
    strict_tables: bool,
}

impl MarkdownExtractor {
    /// Create an extractor using the given header mapping.
    pub fn new(mappings: ServiceMappings) -> Self {
        Self {
            mappings,
            strict_tables: false,
        }
    }

    /// Log table rows that are skipped for not having exactly two cells.
    pub fn with_strict_tables(mut self, strict_tables: bool) -> Self {
        self.strict_tables = strict_tables;
        self
    }

    /// Extract one test case per valid table row.
    ///
    /// Sections whose header has no mapping are dropped. When `filter` is
    /// given, only sections mapping to one of the listed areas are
    /// processed.
    #[instrument(skip(self, content))]
    pub fn extract(&self, content: &str, filter: Option<&[String]>) -> Vec<TestCase> {
        let mut cases = Vec::new();

        // Everything before the first header is preamble.
        let mut sections = SECTION_SPLIT.split(content);
        sections.next();

        for section in sections {
            let section = section.trim();
            if section.is_empty() {
                continue;
            }

            let mut lines = section.lines();
            let header = lines.next().map(str::trim).unwrap_or_default();

            let Some(area) = self.mappings.area_for(header) else {
                debug!(header, "Skipping section without a service mapping");
                continue;
            };

            if let Some(areas) = filter {
                if !areas.iter().any(|requested| requested == area) {
                    continue;
                }
            }

            self.extract_section(lines, area, &mut cases);
        }

        debug!(cases = cases.len(), "Extraction complete");
        cases
    }

    fn extract_section<'a>(
        &self,
        lines: impl Iterator<Item = &'a str>,
        area: &str,
        cases: &mut Vec<TestCase>,
    ) {
        let mut in_table = false;

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if TABLE_SEPARATOR.is_match(line) {
                in_table = true;
                continue;
            }

            if in_table && line.starts_with('|') && line.ends_with('|') {
                if let Some(case) = self.parse_row(line, area) {
                    cases.push(case);
                }
            }
        }
    }

    fn parse_row(&self, row: &str, area: &str) -> Option<TestCase> {
        let pieces: Vec<&str> = row.split('|').collect();
        // The leading and trailing pipes produce empty artifacts.
        let cells: Vec<&str> = pieces[1..pieces.len() - 1]
            .iter()
            .map(|cell| cell.trim())
            .collect();

        if cells.len() != 2 {
            if self.strict_tables {
                warn!(area, row, cells = cells.len(), "Skipping malformed table row");
            }
            return None;
        }

        let tool_identifier = cells[0];
        let prompt = cells[1].replace("\\<", "<").replace("\\>", ">");

        Some(TestCase::new(prompt, tool_identifier, area))
    }
}

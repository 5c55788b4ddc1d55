//! Placeholder Resolution
//!
//! Replaces angle-bracket tokens in extracted prompts with concrete values
//! drawn from per-area variable mappings and test settings.

use crate::ports::{EnvSettings, SettingsSource};
use indexmap::IndexMap;
use mcp_eval_domain::{
    ExtractionError, PlaceholderTiers, PlaceholderValues, TestCase, UnmappedPolicy,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument, warn};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Settings keys a mapping template may reference directly.
const SETTINGS_KEYS: [&str; 6] = [
    "ResourceBaseName",
    "TenantId",
    "SubscriptionId",
    "TenantName",
    "SubscriptionName",
    "ResourceGroupName",
];

/// Placeholder templates per tier, prior to settings resolution.
///
/// The `common` tier applies to every area; area tiers overlay it. A
/// template value takes one of three forms: a settings key (resolved through
/// the settings source), a string interpolating `{SubscriptionId}` or
/// `{ResourceGroupName}`, or a literal.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct VariableMappings {
    tiers: IndexMap<String, IndexMap<String, String>>,
}

impl VariableMappings {
    /// The built-in template tiers.
    pub fn defaults() -> Self {
        let tiers = [
            (
                "common",
                vec![
                    ("<subscription>", "SubscriptionName"),
                    ("<subscription_id>", "SubscriptionId"),
                    ("<tenant>", "TenantName"),
                    ("<tenant_id>", "TenantId"),
                    ("<resource_group>", "ResourceGroupName"),
                ],
            ),
            ("aks", vec![("<cluster_name>", "ResourceBaseName")]),
            ("appconfig", vec![("<config_store_name>", "ResourceBaseName")]),
            (
                "cosmos",
                vec![
                    ("<account_name>", "ResourceBaseName"),
                    ("<database_name>", "sampledb"),
                    ("<container_name>", "samplecontainer"),
                ],
            ),
            ("foundry", vec![("<deployment_name>", "gpt-4o")]),
            (
                "keyvault",
                vec![
                    ("<vault_name>", "ResourceBaseName"),
                    ("<key_name>", "samplekey"),
                ],
            ),
            (
                "kusto",
                vec![
                    ("<cluster_name>", "ResourceBaseName"),
                    ("<database_name>", "sampledb"),
                ],
            ),
            ("monitor", vec![("<workspace_name>", "ResourceBaseName")]),
            (
                "postgres",
                vec![
                    ("<server_name>", "ResourceBaseName"),
                    ("<database_name>", "postgres"),
                ],
            ),
            ("redis", vec![("<cache_name>", "ResourceBaseName")]),
            (
                "search",
                vec![
                    ("<service_name>", "ResourceBaseName"),
                    ("<index_name>", "sampleindex"),
                ],
            ),
            (
                "servicebus",
                vec![
                    ("<namespace_name>", "ResourceBaseName"),
                    ("<queue_name>", "samplequeue"),
                ],
            ),
            (
                "sql",
                vec![
                    ("<server_name>", "ResourceBaseName"),
                    ("<database_name>", "sampledb"),
                ],
            ),
            (
                "storage",
                vec![
                    ("<account_name>", "ResourceBaseName"),
                    ("<container_name>", "samplecontainer"),
                    (
                        "<account_id>",
                        "/subscriptions/{SubscriptionId}/resourceGroups/{ResourceGroupName}/providers/Microsoft.Storage/storageAccounts/samplestorage",
                    ),
                ],
            ),
        ]
        .into_iter()
        .map(|(tier, entries)| {
            let templates = entries
                .into_iter()
                .map(|(token, template)| (token.to_string(), template.to_string()))
                .collect();
            (tier.to_string(), templates)
        })
        .collect();

        Self { tiers }
    }

    /// Load templates of the same JSON shape from a file, replacing the
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

    /// Resolve templates into concrete per-tier values.
    ///
    /// The common tier resolves against the process environment alone; each
    /// area in `areas` resolves against its own settings source, falling
    /// back to the environment for absent keys.
    pub fn resolve_tiers<S, F>(&self, areas: &[String], settings_for: F) -> PlaceholderTiers
    where
        S: SettingsSource,
        F: Fn(&str) -> S,
    {
        let mut tiers = PlaceholderTiers::default();

        if let Some(templates) = self.tiers.get("common") {
            tiers.common = resolve_tier(templates, &EnvSettings);
        }

        for area in areas {
            if let Some(templates) = self.tiers.get(area.as_str()) {
                let settings = settings_for(area);
                tiers.set_area(area.clone(), resolve_tier(templates, &settings));
            }
        }

        tiers
    }
}

impl Default for VariableMappings {
    fn default() -> Self {
        Self::defaults()
    }
}

fn lookup(settings: &dyn SettingsSource, key: &str) -> Option<String> {
    settings.get(key).or_else(|| std::env::var(key).ok())
}

fn resolve_tier(
    templates: &IndexMap<String, String>,
    settings: &dyn SettingsSource,
) -> PlaceholderValues {
    templates
        .iter()
        .map(|(token, template)| (token.clone(), resolve_template(template, settings)))
        .collect()
}

fn resolve_template(template: &str, settings: &dyn SettingsSource) -> Option<String> {
    if SETTINGS_KEYS.contains(&template) {
        return lookup(settings, template);
    }

    if template.contains('{') && template.contains('}') {
        // Any unresolved key voids the whole value rather than writing a
        // partial interpolation into the prompt.
        let mut value = template.to_string();
        for key in ["SubscriptionId", "ResourceGroupName"] {
            let token = format!("{{{key}}}");
            if value.contains(&token) {
                value = value.replace(&token, &lookup(settings, key)?);
            }
        }
        return Some(value);
    }

    Some(template.to_string())
}

/// Outcome of resolving a batch of test cases.
#[derive(Debug, Default)]
pub struct ResolutionOutcome {
    /// Cases whose prompts substituted cleanly (plus kept records under the
    /// lenient policy).
    pub cases: Vec<TestCase>,
    /// Occurrence count per token that survived substitution.
    pub unmapped: BTreeMap<String, usize>,
    /// Records dropped under the strict policy.
    pub skipped: usize,
}

/// Applies resolved placeholder values to extracted test cases.
pub struct PlaceholderResolver {
    tiers: PlaceholderTiers,
    policy: UnmappedPolicy,
}

impl PlaceholderResolver {
    /// Create a resolver over resolved tiers.
    pub fn new(tiers: PlaceholderTiers, policy: UnmappedPolicy) -> Self {
        Self { tiers, policy }
    }

    /// Substitute placeholders in every case and apply the unmapped policy.
    ///
    /// Substitution walks the effective map for the case's area in insertion
    /// order; entries whose value is unresolved are skipped.
    #[instrument(skip(self, cases), fields(total = cases.len()))]
    pub fn resolve(&self, cases: Vec<TestCase>) -> ResolutionOutcome {
        let mut outcome = ResolutionOutcome::default();

        for mut case in cases {
            let effective = self.tiers.effective_for(&case.service_area);
            let mut query = case.query.clone();

            for (token, value) in &effective {
                let Some(value) = value else { continue };
                query = query.replace(token.as_str(), value);
            }

            let remaining: Vec<&str> = PLACEHOLDER
                .find_iter(&query)
                .map(|found| found.as_str())
                .collect();

            if remaining.is_empty() {
                case.query = query;
                outcome.cases.push(case);
                continue;
            }

            for token in &remaining {
                *outcome.unmapped.entry((*token).to_string()).or_insert(0) += 1;
            }

            match self.policy {
                UnmappedPolicy::Drop => {
                    outcome.skipped += 1;
                    warn!(
                        tokens = ?remaining,
                        query = %truncate(&case.query, 100),
                        "Skipping query with unmapped placeholders"
                    );
                }
                UnmappedPolicy::Keep => {
                    warn!(
                        tokens = ?remaining,
                        query = %truncate(&case.query, 100),
                        "Keeping query with unmapped placeholders"
                    );
                    case.query = query;
                    outcome.cases.push(case);
                }
            }
        }

        debug!(
            resolved = outcome.cases.len(),
            skipped = outcome.skipped,
            "Resolution complete"
        );
        outcome
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    }
}

//! Placeholder value tiers applied to prompts before execution.
//!
//! Extracted prompts carry angle-bracket tokens such as `<account_name>`.
//! Resolution produces a value map per service area: a common tier shared by
//! every area, overlaid by the area's own tier.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Resolved placeholder values in insertion order.
///
/// A `None` value marks a mapping whose backing setting could not be
/// resolved; such entries are skipped during substitution rather than written
/// into the prompt literally.
pub type PlaceholderValues = IndexMap<String, Option<String>>;

/// What to do with a record whose prompt still carries placeholder tokens
/// after substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Drop the record; every leftover token is counted and logged.
    #[default]
    Drop,
    /// Keep the record as-is; tokens are still counted and logged.
    Keep,
}

/// Placeholder values grouped into a shared tier plus per-area overlays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceholderTiers {
    /// Values shared by every service area.
    #[serde(default)]
    pub common: PlaceholderValues,
    /// Area-specific values keyed by canonical area name.
    #[serde(default)]
    pub areas: IndexMap<String, PlaceholderValues>,
}

impl PlaceholderTiers {
    /// The effective map for `area`: the common tier overlaid by the area
    /// tier. Area entries win on token collisions.
    pub fn effective_for(&self, area: &str) -> PlaceholderValues {
        let mut effective = self.common.clone();
        if let Some(overlay) = self.areas.get(area) {
            for (token, value) in overlay {
                effective.insert(token.clone(), value.clone());
            }
        }
        effective
    }

    /// Register the tier for `area`, replacing any previous one.
    pub fn set_area(&mut self, area: impl Into<String>, values: PlaceholderValues) {
        self.areas.insert(area.into(), values);
    }
}

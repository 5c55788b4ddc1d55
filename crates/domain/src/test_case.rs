//! Test case records extracted from service documentation.
//!
//! A test case pairs a natural-language prompt with the tool the model is
//! expected to select, identified by the two-element service/command pair
//! derived from the documentation's tool identifier column.

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Prefix carried by fully qualified tool identifiers in source tables.
pub const TOOL_ID_PREFIX: &str = "azmcp-";

/// A single extracted evaluation case.
///
/// Instances are immutable once extracted. The JSONL corpus stores one case
/// per line with exactly this field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Natural-language prompt sent to the model.
    pub query: String,
    /// The tool the model is expected to select.
    pub expected_tool_calls: ExpectedToolCalls,
    /// Canonical service area the case belongs to.
    pub service_area: String,
}

impl TestCase {
    /// Create a test case from a prompt and a raw tool identifier.
    pub fn new(
        query: impl Into<String>,
        tool_identifier: &str,
        service_area: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            expected_tool_calls: ExpectedToolCalls::parse(tool_identifier),
            service_area: service_area.into(),
        }
    }
}

/// The expected tool selection for a test case.
///
/// Always holds exactly two entries derived from the tool identifier: the
/// service segment and the full command name. Serializes as a two-element
/// JSON array such as `["storage", "storage_blob_list"]`; any other arity is
/// rejected on deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedToolCalls {
    /// Service segment of the identifier.
    pub service: String,
    /// Full command name with `_` separators.
    pub command: String,
}

impl ExpectedToolCalls {
    /// Derive the expected pair from a raw tool identifier.
    ///
    /// The grammar is deterministic:
    ///
    /// - `azmcp-storage-blob-list` → `("storage", "storage_blob_list")`
    /// - `storage-blob-list` → `("storage", "storage_blob_list")`
    /// - `storage_blob_list` → `("storage", "storage_blob_list")`
    /// - `ping` → `("ping", "ping")`
    pub fn parse(identifier: &str) -> Self {
        if let Some(rest) = identifier.strip_prefix(TOOL_ID_PREFIX) {
            let service = rest.split('-').next().unwrap_or_default().to_string();
            Self {
                service,
                command: rest.replace('-', "_"),
            }
        } else if identifier.contains('-') {
            let service = identifier.split('-').next().unwrap_or_default().to_string();
            Self {
                service,
                command: identifier.replace('-', "_"),
            }
        } else if identifier.contains('_') {
            let service = identifier.split('_').next().unwrap_or_default().to_string();
            Self {
                service,
                command: identifier.to_string(),
            }
        } else {
            Self {
                service: identifier.to_string(),
                command: identifier.to_string(),
            }
        }
    }

    /// Both identifiers in serialization order.
    pub fn identifiers(&self) -> [&str; 2] {
        [&self.service, &self.command]
    }

    /// Whether `candidate` equals either expected identifier.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate == self.service || candidate == self.command
    }
}

impl Serialize for ExpectedToolCalls {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.service)?;
        seq.serialize_element(&self.command)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ExpectedToolCalls {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = ExpectedToolCalls;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a two-element array of tool identifiers")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let service: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let command: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(3, &self));
                }
                Ok(ExpectedToolCalls { service, command })
            }
        }

        deserializer.deserialize_seq(PairVisitor)
    }
}

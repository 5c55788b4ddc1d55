//! Per-case accuracy verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pass/fail outcome of the accuracy rubric.
///
/// Serializes as `"Pass"` / `"Fail"`, the form the report file has always
/// used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCallAccuracy {
    /// Score reached the configured threshold.
    Pass,
    /// Score fell short of the threshold.
    Fail,
}

impl ToolCallAccuracy {
    /// Whether this is a passing verdict.
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for ToolCallAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("Pass"),
            Self::Fail => f.write_str("Fail"),
        }
    }
}

/// How the required-parameter component of the rubric treats multiple calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamCheckMode {
    /// Every call that matches a known definition must carry the definition's
    /// required parameters, and at least one call must match.
    #[default]
    AllMatchingCalls,
    /// Historical rubric: stop at the first call with no matching definition
    /// and let the last matching call decide.
    LastMatchingCall,
}

/// Outcome of scoring one driven conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    /// Pass/fail against the threshold.
    pub tool_call_accuracy: ToolCallAccuracy,
    /// Human-readable explanation of the verdict.
    pub reason: String,
    /// Weighted score in `[0.0, 1.0]`.
    pub score: f64,
    /// Threshold the score was compared against.
    pub score_threshold: f64,
    /// Tool name and `command` argument of every observed call.
    pub actual_tool_calls: Vec<(String, Option<String>)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_serialization() {
        assert_eq!(
            serde_json::to_string(&ToolCallAccuracy::Pass).unwrap(),
            r#""Pass""#
        );
        assert_eq!(
            serde_json::to_string(&ToolCallAccuracy::Fail).unwrap(),
            r#""Fail""#
        );
    }

    #[test]
    fn test_actual_calls_serialize_as_pairs() {
        let verdict = EvaluationVerdict {
            tool_call_accuracy: ToolCallAccuracy::Pass,
            reason: "Passed successfully".to_string(),
            score: 1.0,
            score_threshold: 0.8,
            actual_tool_calls: vec![("storage".to_string(), Some("storage_blob_list".to_string()))],
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            json["actual_tool_calls"][0],
            serde_json::json!(["storage", "storage_blob_list"])
        );
    }
}

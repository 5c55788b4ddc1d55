//! Tool-Call Accuracy Scoring
//!
//! Produces a weighted verdict over the tool calls a conversation made: did
//! the expected tool get called, were its required parameters supplied, and
//! did the call count match.

use mcp_eval_common::ScoringConfig;
use mcp_eval_domain::{
    EvaluationVerdict, ExpectedToolCalls, ParamCheckMode, ToolCallAccuracy, ToolCallRecord,
    ToolDefinition,
};

// Component weights in tenths. Kept integral so boundary comparisons
// against the threshold stay exact.
const EXPECTED_TOOL_TENTHS: u32 = 5;
const REQUIRED_PARAMS_TENTHS: u32 = 3;
const CALL_COUNT_TENTHS: u32 = 2;

/// Scores tool-call traces against a case's expectation.
pub struct AccuracyScorer {
    config: ScoringConfig,
}

impl AccuracyScorer {
    /// Create a scorer with the given configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// The pass threshold the scorer applies.
    pub fn threshold(&self) -> f64 {
        self.config.score_threshold
    }

    /// Score the calls made for a case.
    ///
    /// The expected call count is the number of expected identifiers.
    pub fn score(
        &self,
        expected: &ExpectedToolCalls,
        calls: &[ToolCallRecord],
        definitions: &[ToolDefinition],
    ) -> EvaluationVerdict {
        self.score_with_expected_count(expected, calls, definitions, expected.identifiers().len())
    }

    /// Score with an explicit expected call count.
    pub fn score_with_expected_count(
        &self,
        expected: &ExpectedToolCalls,
        calls: &[ToolCallRecord],
        definitions: &[ToolDefinition],
        expected_count: usize,
    ) -> EvaluationVerdict {
        let actual_tool_calls: Vec<(String, Option<String>)> = calls
            .iter()
            .map(|call| (call.name.clone(), call.command_argument().map(String::from)))
            .collect();

        if calls.is_empty() {
            return self.verdict(0, "No tool calls were made".to_string(), actual_tool_calls);
        }

        // Existential over the whole trace: the matching name and the
        // matching command argument may come from different calls.
        let called_expected = calls.iter().any(|call| expected.matches(&call.name))
            && calls.iter().any(|call| {
                call.command_argument()
                    .is_some_and(|command| expected.matches(command))
            });

        let correct_params = match self.config.param_check {
            ParamCheckMode::AllMatchingCalls => all_matching_calls_valid(calls, definitions),
            ParamCheckMode::LastMatchingCall => last_matching_call_valid(calls, definitions),
        };

        let count_matched = calls.len() == expected_count;

        let mut tenths = 0;
        let mut reasons = Vec::new();

        if called_expected {
            tenths += EXPECTED_TOOL_TENTHS;
        } else {
            reasons.push("Expected tool was not called".to_string());
        }

        if correct_params {
            tenths += REQUIRED_PARAMS_TENTHS;
        } else {
            reasons.push("Some parameters are missing or invalid".to_string());
        }

        if count_matched {
            tenths += CALL_COUNT_TENTHS;
        } else {
            reasons.push(format!(
                "Number of tool calls mismatch (expected {expected_count}, got {})",
                calls.len()
            ));
        }

        let reason = if reasons.is_empty() {
            "Passed successfully".to_string()
        } else {
            reasons.join("; ")
        };

        self.verdict(tenths, reason, actual_tool_calls)
    }

    fn verdict(
        &self,
        tenths: u32,
        reason: String,
        actual_tool_calls: Vec<(String, Option<String>)>,
    ) -> EvaluationVerdict {
        let score = f64::from(tenths) / 10.0;
        let tool_call_accuracy = if score >= self.config.score_threshold {
            ToolCallAccuracy::Pass
        } else {
            ToolCallAccuracy::Fail
        };

        EvaluationVerdict {
            tool_call_accuracy,
            reason,
            score,
            score_threshold: self.config.score_threshold,
            actual_tool_calls,
        }
    }
}

/// At least one call matches a known definition, and every matching call
/// carries all of its definition's required parameters non-null.
fn all_matching_calls_valid(calls: &[ToolCallRecord], definitions: &[ToolDefinition]) -> bool {
    let matching: Vec<(&ToolCallRecord, &ToolDefinition)> = calls
        .iter()
        .filter_map(|call| {
            definitions
                .iter()
                .find(|definition| definition.name == call.name)
                .map(|definition| (call, definition))
        })
        .collect();

    !matching.is_empty()
        && matching
            .iter()
            .all(|(call, definition)| required_params_present(call, definition))
}

/// Compatibility semantics: walk the calls in order, stopping at the first
/// one with no matching definition; the result reflects only the last call
/// that did match.
fn last_matching_call_valid(calls: &[ToolCallRecord], definitions: &[ToolDefinition]) -> bool {
    let mut valid = false;
    for call in calls {
        let Some(definition) = definitions
            .iter()
            .find(|definition| definition.name == call.name)
        else {
            break;
        };
        valid = required_params_present(call, definition);
    }
    valid
}

fn required_params_present(call: &ToolCallRecord, definition: &ToolDefinition) -> bool {
    definition
        .parameters
        .required
        .iter()
        .all(|param| call.arguments.get(param).is_some_and(|value| !value.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn scorer() -> AccuracyScorer {
        AccuracyScorer::new(ScoringConfig::default())
    }

    fn scorer_with_mode(param_check: ParamCheckMode) -> AccuracyScorer {
        AccuracyScorer::new(ScoringConfig {
            param_check,
            ..ScoringConfig::default()
        })
    }

    fn call(name: &str, args: &[(&str, Value)]) -> ToolCallRecord {
        let mut arguments = Map::new();
        for (key, value) in args {
            arguments.insert((*key).to_string(), value.clone());
        }
        ToolCallRecord::new(format!("call_{name}"), name, arguments)
    }

    fn definition(name: &str, required: &[&str]) -> ToolDefinition {
        let mut def = ToolDefinition::new(name, None);
        def.parameters.required = required.iter().map(|p| (*p).to_string()).collect();
        def
    }

    fn expected_storage() -> ExpectedToolCalls {
        ExpectedToolCalls::parse("storage-blob-list")
    }

    #[test]
    fn test_full_score_passes() {
        let calls = vec![
            call("storage", &[("command", json!("storage_blob_list"))]),
            call("storage", &[("command", json!("storage_blob_list"))]),
        ];
        let defs = vec![definition("storage", &[])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.tool_call_accuracy, ToolCallAccuracy::Pass);
        assert_eq!(verdict.reason, "Passed successfully");
        assert_eq!(verdict.actual_tool_calls.len(), 2);
        assert_eq!(
            verdict.actual_tool_calls[0],
            ("storage".to_string(), Some("storage_blob_list".to_string()))
        );
    }

    #[test]
    fn test_single_call_scores_exactly_at_threshold() {
        let calls = vec![call("storage", &[("command", json!("storage_blob_list"))])];
        let defs = vec![definition("storage", &[])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.score, 0.8);
        assert_eq!(verdict.tool_call_accuracy, ToolCallAccuracy::Pass);
        assert_eq!(
            verdict.reason,
            "Number of tool calls mismatch (expected 2, got 1)"
        );
    }

    #[test]
    fn test_explicit_expected_count_restores_full_score() {
        let calls = vec![call("storage", &[("command", json!("storage_blob_list"))])];
        let defs = vec![definition("storage", &[])];

        let verdict =
            scorer().score_with_expected_count(&expected_storage(), &calls, &defs, 1);
        assert_eq!(verdict.score, 1.0);
        assert_eq!(verdict.reason, "Passed successfully");
    }

    #[test]
    fn test_zero_calls_short_circuits() {
        let verdict = scorer().score(&expected_storage(), &[], &[]);
        assert_eq!(verdict.reason, "No tool calls were made");
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.tool_call_accuracy, ToolCallAccuracy::Fail);
        assert!(verdict.actual_tool_calls.is_empty());
    }

    #[test]
    fn test_wrong_tool_withholds_expected_weight() {
        let calls = vec![
            call("keyvault", &[("command", json!("keyvault_secret_get"))]),
            call("keyvault", &[("command", json!("keyvault_secret_get"))]),
        ];
        let defs = vec![definition("keyvault", &[])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.score, 0.5);
        assert_eq!(verdict.tool_call_accuracy, ToolCallAccuracy::Fail);
        assert_eq!(verdict.reason, "Expected tool was not called");
    }

    #[test]
    fn test_name_and_command_may_come_from_different_calls() {
        let calls = vec![
            call("storage", &[("command", json!("storage_account_get"))]),
            call("extension", &[("command", json!("storage_blob_list"))]),
        ];
        let defs = vec![definition("storage", &[]), definition("extension", &[])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.score, 1.0);
    }

    #[test]
    fn test_missing_required_parameter() {
        let calls = vec![
            call("storage", &[("command", json!("storage_blob_list"))]),
            call("storage", &[("command", json!("storage_blob_list"))]),
        ];
        let defs = vec![definition("storage", &["account"])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.score, 0.7);
        assert_eq!(verdict.tool_call_accuracy, ToolCallAccuracy::Fail);
        assert_eq!(verdict.reason, "Some parameters are missing or invalid");
    }

    #[test]
    fn test_null_required_parameter_is_invalid() {
        let calls = vec![call(
            "storage",
            &[("command", json!("storage_blob_list")), ("account", Value::Null)],
        )];
        let defs = vec![definition("storage", &["account"])];

        assert!(!all_matching_calls_valid(&calls, &defs));
    }

    #[test]
    fn test_no_matching_definition_fails_param_check() {
        let calls = vec![call("mystery", &[])];
        let defs = vec![definition("storage", &[])];

        assert!(!all_matching_calls_valid(&calls, &defs));
        assert!(!last_matching_call_valid(&calls, &defs));
    }

    #[test]
    fn test_param_check_modes_diverge_on_unknown_call_mid_trace() {
        // valid call, then an unknown tool, then an invalid call
        let calls = vec![
            call("storage", &[("account", json!("acct1"))]),
            call("mystery", &[]),
            call("storage", &[]),
        ];
        let defs = vec![definition("storage", &["account"])];

        // The compatibility mode stops at the unknown call and keeps the
        // verdict of the last matching one before it.
        assert!(last_matching_call_valid(&calls, &defs));
        // The corrected mode judges every matching call.
        assert!(!all_matching_calls_valid(&calls, &defs));
    }

    #[test]
    fn test_last_matching_call_mode_reflects_final_call() {
        let invalid_then_valid = vec![
            call("storage", &[]),
            call("storage", &[("account", json!("acct1"))]),
        ];
        let defs = vec![definition("storage", &["account"])];

        assert!(last_matching_call_valid(&invalid_then_valid, &defs));
        assert!(!all_matching_calls_valid(&invalid_then_valid, &defs));

        let verdict = scorer_with_mode(ParamCheckMode::LastMatchingCall).score(
            &expected_storage(),
            &invalid_then_valid,
            &defs,
        );
        assert_eq!(verdict.score, 1.0);
    }

    #[test]
    fn test_reasons_join_in_component_order() {
        let calls = vec![call("mystery", &[])];
        let defs = vec![definition("storage", &["account"])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(
            verdict.reason,
            "Expected tool was not called; Some parameters are missing or invalid; \
             Number of tool calls mismatch (expected 2, got 1)"
        );
    }

    #[test]
    fn test_command_argument_missing_yields_none_pair() {
        let calls = vec![
            call("storage", &[]),
            call("storage", &[("command", json!("storage_blob_list"))]),
        ];
        let defs = vec![definition("storage", &[])];

        let verdict = scorer().score(&expected_storage(), &calls, &defs);
        assert_eq!(verdict.actual_tool_calls[0], ("storage".to_string(), None));
        assert_eq!(
            verdict.actual_tool_calls[1],
            ("storage".to_string(), Some("storage_blob_list".to_string()))
        );
    }
}

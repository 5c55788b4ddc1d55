//! Test fixtures for generating domain values with realistic data.

use fake::{faker::lorem::en::Sentence, Fake};
use mcp_eval_domain::{
    CaseEvaluation, ChatMessage, EvaluationVerdict, TestCase, ToolCallAccuracy, ToolCallRecord,
    ToolDefinition, ToolParameters,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// A markdown prompt document covering the extraction edge cases: an
/// unmapped section, a malformed row, escaped angle brackets, and
/// placeholder tokens.
pub const SAMPLE_MARKDOWN: &str = r#"# Azure MCP e2e Test Prompts

Prompts exercised against live resources. Placeholders in angle brackets
are substituted before execution.

## Azure Storage

| Tool | Test prompt |
|:-----|:------------|
| azmcp-storage-account-list | List all storage accounts in subscription <subscription> |
| azmcp-storage-blob-list | List blobs in container <container_name> for account <account_name> |
| storage-table-list | Show tables in \<account_name\> |

## Internal Notes

This section has no service mapping and contributes nothing.

| Tool | Test prompt |
|:-----|:------------|
| ignored-tool | should never appear |

## Azure Key Vault

| Tool | Test prompt |
|:-----|:------------|
| azmcp-keyvault-secret-get | Get secret <secret_name> from vault <vault_name> |
| broken | row | with three cells |
| ping | Check connectivity |
"#;

/// Create a storage test case with a fully resolved query.
pub fn create_test_case() -> TestCase {
    TestCase::new(
        "List blobs in container samplecontainer for account acct1",
        "azmcp-storage-blob-list",
        "storage",
    )
}

/// Create a test case for the given tool identifier and area, with a
/// generated query.
pub fn create_test_case_for(identifier: &str, area: &str) -> TestCase {
    let query: String = Sentence(4..9).fake();
    TestCase::new(query, identifier, area)
}

/// Create a batch of storage test cases with generated queries.
pub fn create_test_cases(count: usize) -> Vec<TestCase> {
    (0..count)
        .map(|_| create_test_case_for("azmcp-storage-blob-list", "storage"))
        .collect()
}

/// Create a tool definition with a generated description and no required
/// parameters.
pub fn create_tool_definition(name: &str) -> ToolDefinition {
    ToolDefinition::new(name, Some(Sentence(3..8).fake()))
}

/// Create a tool definition requiring the given parameters.
pub fn create_tool_definition_with_required(name: &str, required: &[&str]) -> ToolDefinition {
    let mut properties = Map::new();
    for param in required {
        properties.insert((*param).to_string(), json!({ "type": "string" }));
    }

    ToolDefinition {
        name: name.to_string(),
        description: Some(Sentence(3..8).fake()),
        parameters: ToolParameters {
            schema_type: "object".to_string(),
            properties,
            required: required.iter().map(|p| (*p).to_string()).collect(),
        },
    }
}

/// A small catalog covering the services used across the test suite.
pub fn create_tool_catalog() -> Vec<ToolDefinition> {
    vec![
        create_tool_definition_with_required("storage", &["command"]),
        create_tool_definition_with_required("keyvault", &["command"]),
        create_tool_definition("extension"),
    ]
}

/// Create a tool call carrying a `command` argument.
pub fn create_tool_call(name: &str, command: &str) -> ToolCallRecord {
    let mut arguments = Map::new();
    arguments.insert("command".to_string(), json!(command));
    create_tool_call_with_args(name, arguments)
}

/// Create a tool call with explicit arguments and a generated call id.
pub fn create_tool_call_with_args(name: &str, arguments: Map<String, Value>) -> ToolCallRecord {
    ToolCallRecord::new(format!("call_{}", Uuid::new_v4().simple()), name, arguments)
}

/// An assistant message that issues the given tool calls.
pub fn create_tool_call_message(calls: Vec<ToolCallRecord>) -> ChatMessage {
    ChatMessage::assistant_with_tool_calls(None, calls)
}

/// Create a scored case evaluation with the given verdict inputs.
pub fn create_case_evaluation(score: f64, threshold: f64) -> CaseEvaluation {
    let accuracy = if score >= threshold {
        ToolCallAccuracy::Pass
    } else {
        ToolCallAccuracy::Fail
    };
    let reason = if accuracy.is_pass() {
        "Passed successfully".to_string()
    } else {
        "Expected tool was not called".to_string()
    };

    CaseEvaluation {
        test_case: create_test_case(),
        verdict: Some(EvaluationVerdict {
            tool_call_accuracy: accuracy,
            reason,
            score,
            score_threshold: threshold,
            actual_tool_calls: vec![(
                "storage".to_string(),
                Some("storage_blob_list".to_string()),
            )],
        }),
        transport_error: None,
        transcript: vec![
            ChatMessage::user("List blobs"),
            ChatMessage::assistant("Done."),
        ],
        attempts: 2,
        duration_ms: 1200,
    }
}

/// Create a case evaluation that failed in transport before scoring.
pub fn create_transport_failure_evaluation() -> CaseEvaluation {
    CaseEvaluation {
        test_case: create_test_case(),
        verdict: None,
        transport_error: Some("Chat completion request failed with status 503".to_string()),
        transcript: Vec::new(),
        attempts: 0,
        duration_ms: 80,
    }
}

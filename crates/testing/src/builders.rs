//! Fluent builders for constructing test data.

use mcp_eval_domain::{
    CaseEvaluation, ChatMessage, EvaluationVerdict, TestCase, ToolCallAccuracy, ToolDefinition,
    ToolParameters,
};
use serde_json::{json, Map, Value};

/// Builder for [`TestCase`] instances.
#[derive(Clone)]
pub struct TestCaseBuilder {
    query: String,
    tool_identifier: String,
    service_area: String,
}

impl TestCaseBuilder {
    pub fn new() -> Self {
        Self {
            query: "List all storage accounts in my subscription".to_string(),
            tool_identifier: "azmcp-storage-account-list".to_string(),
            service_area: "storage".to_string(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_tool_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.tool_identifier = identifier.into();
        self
    }

    pub fn with_service_area(mut self, area: impl Into<String>) -> Self {
        self.service_area = area.into();
        self
    }

    pub fn build(self) -> TestCase {
        TestCase::new(self.query, &self.tool_identifier, self.service_area)
    }
}

impl Default for TestCaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ToolDefinition`] instances.
#[derive(Clone)]
pub struct ToolDefinitionBuilder {
    name: String,
    description: Option<String>,
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ToolDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare an optional string parameter.
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.properties
            .insert(name.into(), json!({ "type": "string" }));
        self
    }

    /// Declare a required string parameter.
    pub fn with_required_param(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.properties
            .insert(name.clone(), json!({ "type": "string" }));
        self.required.push(name);
        self
    }

    pub fn build(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description,
            parameters: ToolParameters {
                schema_type: "object".to_string(),
                properties: self.properties,
                required: self.required,
            },
        }
    }
}

/// Builder for [`CaseEvaluation`] instances used in report and table tests.
#[derive(Clone)]
pub struct CaseEvaluationBuilder {
    test_case: TestCase,
    score: f64,
    score_threshold: f64,
    reason: String,
    actual_tool_calls: Vec<(String, Option<String>)>,
    transport_error: Option<String>,
    transcript: Vec<ChatMessage>,
    attempts: u32,
    duration_ms: u64,
}

impl CaseEvaluationBuilder {
    pub fn new() -> Self {
        Self {
            test_case: TestCaseBuilder::new().build(),
            score: 1.0,
            score_threshold: 0.8,
            reason: "Passed successfully".to_string(),
            actual_tool_calls: vec![(
                "storage".to_string(),
                Some("storage_account_list".to_string()),
            )],
            transport_error: None,
            transcript: Vec::new(),
            attempts: 2,
            duration_ms: 950,
        }
    }

    pub fn with_test_case(mut self, test_case: TestCase) -> Self {
        self.test_case = test_case;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.test_case.query = query.into();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_actual_call(mut self, name: impl Into<String>, command: Option<&str>) -> Self {
        self.actual_tool_calls
            .push((name.into(), command.map(str::to_string)));
        self
    }

    pub fn without_actual_calls(mut self) -> Self {
        self.actual_tool_calls.clear();
        self
    }

    /// Score 0.5 with the standard missing-parameters reason.
    pub fn failing(mut self) -> Self {
        self.score = 0.5;
        self.reason = "Some parameters are missing or invalid; Number of tool calls mismatch (expected 2, got 1)".to_string();
        self
    }

    /// No verdict; the case never completed transport.
    pub fn with_transport_error(mut self, message: impl Into<String>) -> Self {
        self.transport_error = Some(message.into());
        self
    }

    pub fn build(self) -> CaseEvaluation {
        let verdict = if self.transport_error.is_some() {
            None
        } else {
            let accuracy = if self.score >= self.score_threshold {
                ToolCallAccuracy::Pass
            } else {
                ToolCallAccuracy::Fail
            };
            Some(EvaluationVerdict {
                tool_call_accuracy: accuracy,
                reason: self.reason,
                score: self.score,
                score_threshold: self.score_threshold,
                actual_tool_calls: self.actual_tool_calls,
            })
        };

        CaseEvaluation {
            test_case: self.test_case,
            verdict,
            transport_error: self.transport_error,
            transcript: self.transcript,
            attempts: self.attempts,
            duration_ms: self.duration_ms,
        }
    }
}

impl Default for CaseEvaluationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_case_builder() {
        let case = TestCaseBuilder::new()
            .with_query("Get secret prod-key from vault main")
            .with_tool_identifier("azmcp-keyvault-secret-get")
            .with_service_area("keyvault")
            .build();

        assert_eq!(case.query, "Get secret prod-key from vault main");
        assert_eq!(case.expected_tool_calls.service, "keyvault");
        assert_eq!(case.expected_tool_calls.command, "keyvault_secret_get");
    }

    #[test]
    fn test_tool_definition_builder() {
        let definition = ToolDefinitionBuilder::new("storage")
            .with_description("Storage operations")
            .with_required_param("command")
            .with_property("account")
            .build();

        assert_eq!(definition.name, "storage");
        assert_eq!(definition.parameters.required, vec!["command"]);
        assert!(definition.parameters.properties.contains_key("account"));
    }

    #[test]
    fn test_case_evaluation_builder_passes_at_threshold() {
        let evaluation = CaseEvaluationBuilder::new().with_score(0.8).build();

        let verdict = evaluation.verdict.as_ref().unwrap();
        assert!(verdict.tool_call_accuracy.is_pass());
        assert!(evaluation.is_pass());
    }

    #[test]
    fn test_case_evaluation_builder_transport_error() {
        let evaluation = CaseEvaluationBuilder::new()
            .with_transport_error("connection refused")
            .build();

        assert!(evaluation.verdict.is_none());
        assert!(!evaluation.is_pass());
    }
}

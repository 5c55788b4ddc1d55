//! Evaluation Run Orchestration
//!
//! Runs the full evaluation for a batch of test cases: one driven, scored
//! conversation per case, collected into a run report.

use crate::ports::{ChatEndpoint, ToolEndpoint};
use crate::scoring::AccuracyScorer;
use crate::services::ConversationDriver;
use chrono::Utc;
use mcp_eval_common::EvalConfig;
use mcp_eval_domain::{
    CaseEvaluation, EvalResult, EvaluationReport, TestCase, ToolDefinition,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Orchestrates driving and scoring across a batch of test cases.
pub struct EvaluationService<C, T>
where
    C: ChatEndpoint,
    T: ToolEndpoint,
{
    driver: ConversationDriver<C, T>,
    tools: Arc<T>,
    scorer: AccuracyScorer,
    model: String,
}

impl<C, T> EvaluationService<C, T>
where
    C: ChatEndpoint,
    T: ToolEndpoint,
{
    /// Assemble the service from endpoints and configuration.
    pub fn new(chat: Arc<C>, tools: Arc<T>, config: &EvalConfig) -> Self {
        Self {
            driver: ConversationDriver::new(chat, Arc::clone(&tools), config.driver.clone()),
            tools,
            scorer: AccuracyScorer::new(config.scoring.clone()),
            model: config.chat.model.clone(),
        }
    }

    /// Evaluate every case sequentially, invoking `progress` after each.
    ///
    /// The tool catalog is listed once and shared read-only across cases. A
    /// transport failure on an individual case is recorded as that case's
    /// outcome rather than aborting the run; failure to list the catalog is
    /// fatal.
    #[instrument(skip_all, fields(cases = cases.len(), model = %self.model))]
    pub async fn run<F>(&self, cases: Vec<TestCase>, mut progress: F) -> EvalResult<EvaluationReport>
    where
        F: FnMut(&CaseEvaluation),
    {
        let started_at = Utc::now();

        let catalog = self.tools.list_tools().await?;
        info!(tools = catalog.len(), "Fetched tool catalog");

        let mut evaluated = Vec::with_capacity(cases.len());
        for case in cases {
            let evaluation = self.evaluate_case(case, &catalog).await;
            progress(&evaluation);
            evaluated.push(evaluation);
        }

        let report = EvaluationReport::new(
            self.model.clone(),
            self.scorer.threshold(),
            started_at,
            evaluated,
        );
        info!(
            passed = report.metrics.passed,
            failed = report.metrics.failed,
            transport_errors = report.metrics.transport_errors,
            "Evaluation run complete"
        );
        Ok(report)
    }

    async fn evaluate_case(&self, case: TestCase, catalog: &[ToolDefinition]) -> CaseEvaluation {
        let started = Instant::now();

        match self.driver.drive(&case, catalog).await {
            Ok(outcome) => {
                let verdict =
                    self.scorer
                        .score(&case.expected_tool_calls, &outcome.tool_calls, catalog);
                CaseEvaluation {
                    test_case: case,
                    verdict: Some(verdict),
                    transport_error: None,
                    transcript: outcome.transcript,
                    attempts: outcome.attempts,
                    duration_ms: started.elapsed().as_millis() as u64,
                }
            }
            Err(error) => {
                warn!(%error, "Transport failure while driving case");
                CaseEvaluation {
                    test_case: case,
                    verdict: None,
                    transport_error: Some(error.to_string()),
                    transcript: Vec::new(),
                    attempts: 0,
                    duration_ms: started.elapsed().as_millis() as u64,
                }
            }
        }
    }
}

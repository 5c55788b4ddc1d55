//! Whole-run evaluation reports and aggregate metrics.

use crate::conversation::ChatMessage;
use crate::test_case::TestCase;
use crate::verdict::EvaluationVerdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Unique identifier for an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run identifier.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get a reference to the underlying UUID.
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Everything recorded for one evaluated test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEvaluation {
    /// The case that was driven.
    pub test_case: TestCase,
    /// Scored verdict; absent when transport failed before scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<EvaluationVerdict>,
    /// Transport failure that prevented scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_error: Option<String>,
    /// Full conversation transcript.
    #[serde(default)]
    pub transcript: Vec<ChatMessage>,
    /// Chat round-trips consumed.
    pub attempts: u32,
    /// Wall-clock duration of the case in milliseconds.
    pub duration_ms: u64,
}

impl CaseEvaluation {
    /// Whether the case was scored and passed.
    pub fn is_pass(&self) -> bool {
        self.verdict
            .as_ref()
            .is_some_and(|v| v.tool_call_accuracy.is_pass())
    }
}

/// Aggregate metrics over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    /// Number of cases evaluated.
    pub total_cases: usize,
    /// Cases that passed the threshold.
    pub passed: usize,
    /// Cases scored below the threshold.
    pub failed: usize,
    /// Cases aborted by transport failures.
    pub transport_errors: usize,
    /// Mean score over scored cases; `0.0` when nothing was scored.
    pub mean_score: f64,
    /// `passed / total_cases`; `0.0` for an empty run.
    pub pass_rate: f64,
}

impl ReportMetrics {
    /// Compute metrics from per-case outcomes.
    pub fn from_cases(cases: &[CaseEvaluation]) -> Self {
        let total_cases = cases.len();
        let passed = cases.iter().filter(|c| c.is_pass()).count();
        let transport_errors = cases
            .iter()
            .filter(|c| c.transport_error.is_some())
            .count();
        let failed = total_cases - passed - transport_errors;

        let scores: Vec<f64> = cases
            .iter()
            .filter_map(|c| c.verdict.as_ref().map(|v| v.score))
            .collect();
        let mean_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let pass_rate = if total_cases == 0 {
            0.0
        } else {
            passed as f64 / total_cases as f64
        };

        Self {
            total_cases,
            passed,
            failed,
            transport_errors,
            mean_score,
            pass_rate,
        }
    }
}

/// Full record of an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique run identifier.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Model the run was driven against.
    pub model: String,
    /// Threshold applied by the scorer.
    pub score_threshold: f64,
    /// Per-case outcomes in input order.
    pub cases: Vec<CaseEvaluation>,
    /// Aggregates over `cases`.
    pub metrics: ReportMetrics,
}

impl EvaluationReport {
    /// Assemble a report, computing metrics from the cases.
    pub fn new(
        model: impl Into<String>,
        score_threshold: f64,
        started_at: DateTime<Utc>,
        cases: Vec<CaseEvaluation>,
    ) -> Self {
        let metrics = ReportMetrics::from_cases(&cases);
        Self {
            run_id: RunId::new(),
            started_at,
            model: model.into(),
            score_threshold,
            cases,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::ToolCallAccuracy;

    fn case(score: Option<f64>, transport_error: Option<&str>) -> CaseEvaluation {
        CaseEvaluation {
            test_case: TestCase::new("q", "ping", "ping"),
            verdict: score.map(|score| EvaluationVerdict {
                tool_call_accuracy: if score >= 0.8 {
                    ToolCallAccuracy::Pass
                } else {
                    ToolCallAccuracy::Fail
                },
                reason: String::new(),
                score,
                score_threshold: 0.8,
                actual_tool_calls: vec![],
            }),
            transport_error: transport_error.map(str::to_string),
            transcript: vec![],
            attempts: 1,
            duration_ms: 10,
        }
    }

    #[test]
    fn test_metrics_counts() {
        let cases = vec![
            case(Some(1.0), None),
            case(Some(0.5), None),
            case(None, Some("connection refused")),
        ];
        let metrics = ReportMetrics::from_cases(&cases);
        assert_eq!(metrics.total_cases, 3);
        assert_eq!(metrics.passed, 1);
        assert_eq!(metrics.failed, 1);
        assert_eq!(metrics.transport_errors, 1);
        assert!((metrics.mean_score - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_empty_run() {
        let metrics = ReportMetrics::from_cases(&[]);
        assert_eq!(metrics.total_cases, 0);
        assert_eq!(metrics.mean_score, 0.0);
        assert_eq!(metrics.pass_rate, 0.0);
    }

    #[test]
    fn test_report_assembly() {
        let report = EvaluationReport::new("gpt-4o", 0.8, Utc::now(), vec![case(Some(1.0), None)]);
        assert_eq!(report.model, "gpt-4o");
        assert_eq!(report.metrics.passed, 1);
        assert!((report.metrics.pass_rate - 1.0).abs() < f64::EPSILON);
    }
}

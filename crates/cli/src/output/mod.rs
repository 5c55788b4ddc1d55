//! Terminal output formatting for CLI

mod table;

pub use table::TableFormatter;

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use mcp_eval_domain::{CaseEvaluation, EvaluationReport, ToolDefinition};

/// Render the per-case results table for a finished run.
pub fn results_table(report: &EvaluationReport) -> Result<String> {
    let rows = report.cases.iter().map(case_row).collect();
    TableFormatter::simple(
        vec![
            "Query",
            "Expected (tool, cmd)",
            "Actual (tool, cmd)",
            "Status",
            "Score",
            "Reason",
        ],
        rows,
    )
}

fn case_row(case: &CaseEvaluation) -> Vec<String> {
    let expected = &case.test_case.expected_tool_calls;
    let expected_cell = format!("({}, {})", expected.service, expected.command);
    let query = truncate(&case.test_case.query, 60);

    match &case.verdict {
        Some(verdict) => vec![
            query,
            expected_cell,
            actual_cell(&verdict.actual_tool_calls),
            verdict.tool_call_accuracy.to_string(),
            format!("{:.3}", verdict.score),
            verdict.reason.clone(),
        ],
        None => vec![
            query,
            expected_cell,
            "-".to_string(),
            "Error".to_string(),
            "-".to_string(),
            case.transport_error.clone().unwrap_or_default(),
        ],
    }
}

fn actual_cell(calls: &[(String, Option<String>)]) -> String {
    if calls.is_empty() {
        return "-".to_string();
    }
    calls
        .iter()
        .map(|(tool, command)| match command {
            Some(command) => format!("({tool}, {command})"),
            None => format!("({tool})"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the overall metrics block shown under the results table.
pub fn metrics_block(report: &EvaluationReport) -> String {
    let metrics = &report.metrics;
    let status = if metrics.mean_score >= report.score_threshold {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };

    let mut block = String::new();
    block.push_str(&format!("Total Cases:      {}\n", metrics.total_cases));
    block.push_str(&format!("Passed:           {}\n", metrics.passed));
    block.push_str(&format!("Failed:           {}\n", metrics.failed));
    if metrics.transport_errors > 0 {
        block.push_str(&format!(
            "Transport Errors: {}\n",
            metrics.transport_errors
        ));
    }
    block.push_str(&format!("Overall Score:    {:.4}\n", metrics.mean_score));
    block.push_str(&format!("Score Threshold:  {:.4}\n", report.score_threshold));
    block.push_str(&format!("Status:           {status}"));
    block
}

/// Render occurrence counts for placeholders that survived substitution.
pub fn unmapped_counts(unmapped: &BTreeMap<String, usize>) -> Result<String> {
    let rows = unmapped
        .iter()
        .map(|(token, count)| vec![token.clone(), count.to_string()])
        .collect();
    TableFormatter::simple(vec!["Placeholder", "Count"], rows)
}

/// Render the tool catalog advertised by the MCP server.
pub fn tool_catalog(tools: &[ToolDefinition]) -> Result<String> {
    let rows = tools
        .iter()
        .map(|tool| {
            vec![
                tool.name.clone(),
                tool.parameters.required.join(", "),
                truncate(tool.description.as_deref().unwrap_or(""), 80),
            ]
        })
        .collect();
    TableFormatter::simple(vec!["Tool", "Required Parameters", "Description"], rows)
}

/// Shorten text to `limit` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{cut}...")
}

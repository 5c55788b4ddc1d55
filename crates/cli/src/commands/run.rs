//! Evaluate extracted test cases against the configured model.
//!
//! Drives one tool-calling conversation per case, scores the observed calls,
//! prints per-case progress and the final results table, and writes the run
//! report as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use mcp_eval_application::{write_report, EvaluationService};
use mcp_eval_common::{read_jsonl, EvalConfig};
use mcp_eval_domain::{CaseEvaluation, TestCase};
use mcp_eval_infrastructure::{McpToolEndpoint, OpenAiChatClient};

use crate::output;

/// Arguments for `mcp-eval run`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSONL corpus of test cases to evaluate
    #[arg(short, long, value_name = "FILE", default_value = "data.jsonl")]
    pub data: PathBuf,

    /// Report output file
    #[arg(short, long, value_name = "FILE", default_value = "evaluation_result.json")]
    pub output: PathBuf,

    /// Model or deployment name (overrides configuration)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Minimum passing score (overrides configuration)
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Maximum chat round-trips per case (overrides configuration)
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Print the full report JSON to stdout
    #[arg(long)]
    pub json: bool,
}

/// Run the evaluation and write the report.
pub async fn execute(mut config: EvalConfig, args: RunArgs) -> Result<()> {
    if let Some(model) = args.model {
        config.chat.model = model;
    }
    if let Some(threshold) = args.threshold {
        config.scoring.score_threshold = threshold;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.driver.max_attempts = max_attempts;
    }
    config.validate()?;

    let cases: Vec<TestCase> = read_jsonl(&args.data)?;
    if cases.is_empty() {
        println!("{}", "No test cases to evaluate.".yellow());
        println!("Run 'mcp-eval extract' to build a corpus first.");
        return Ok(());
    }
    let total = cases.len();

    println!(
        "{} {} test cases against {}",
        "Evaluating".bold().cyan(),
        total,
        config.chat.model.bold()
    );
    println!("{}", "=".repeat(60));
    println!();

    let chat = Arc::new(OpenAiChatClient::new(config.chat.clone())?);
    let tools = Arc::new(McpToolEndpoint::new(config.tools.clone()));
    let service = EvaluationService::new(chat, tools, &config);

    let mut index = 0usize;
    let report = service
        .run(cases, |evaluation| {
            index += 1;
            print_progress(index, total, evaluation);
        })
        .await?;

    println!();
    println!("{}", output::results_table(&report)?);
    println!();
    println!("{}", output::metrics_block(&report));

    write_report(&report, &args.output)?;
    println!();
    println!("Report written to {}", args.output.display());

    if args.json {
        println!();
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.metrics.mean_score < report.score_threshold {
        anyhow::bail!(
            "Overall score {:.4} is below the threshold {:.4}",
            report.metrics.mean_score,
            report.score_threshold
        );
    }

    Ok(())
}

fn print_progress(index: usize, total: usize, evaluation: &CaseEvaluation) {
    let query = output::truncate(&evaluation.test_case.query, 60);

    match &evaluation.verdict {
        Some(verdict) => {
            let marker = if verdict.tool_call_accuracy.is_pass() {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            println!(
                "[{}/{}] {} {} {}",
                index,
                total,
                marker,
                query,
                format!("(score {:.2}, {} ms)", verdict.score, evaluation.duration_ms).dimmed()
            );
        }
        None => {
            println!(
                "[{}/{}] {} {} {}",
                index,
                total,
                "ERROR".yellow().bold(),
                query,
                format!("({} ms)", evaluation.duration_ms).dimmed()
            );
            if let Some(error) = &evaluation.transport_error {
                println!("        {} {}", "Error:".red(), error);
            }
        }
    }
}

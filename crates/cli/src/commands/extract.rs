//! Extract test cases from a markdown prompts document.
//!
//! Reads the per-service prompt tables, substitutes placeholder values, and
//! writes one test case per line to a JSONL corpus.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use mcp_eval_application::{MarkdownExtractor, PlaceholderResolver, ServiceMappings, VariableMappings};
use mcp_eval_common::{write_jsonl, EvalConfig};
use mcp_eval_domain::{ExtractionError, UnmappedPolicy};
use mcp_eval_infrastructure::TestSettingsSource;

use crate::output;

/// Arguments for `mcp-eval extract`
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Markdown document containing the per-service prompt tables
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output JSONL corpus
    #[arg(short, long, value_name = "FILE", default_value = "data.jsonl")]
    pub output: PathBuf,

    /// Restrict extraction to these service areas (comma-separated or repeated)
    #[arg(short, long = "service", value_name = "AREA", value_delimiter = ',')]
    pub services: Vec<String>,

    /// JSON file overriding the built-in header-to-area mappings
    #[arg(long, value_name = "FILE")]
    pub service_mappings: Option<PathBuf>,

    /// JSON file overriding the built-in placeholder templates
    #[arg(long, value_name = "FILE")]
    pub variable_mappings: Option<PathBuf>,

    /// Project root for test settings discovery
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Keep records with unresolved placeholders instead of dropping them
    #[arg(long)]
    pub keep_unmapped: bool,

    /// Log table rows skipped for not having exactly two cells
    #[arg(long)]
    pub strict_tables: bool,
}

/// Run the extraction pipeline and write the corpus.
pub async fn execute(config: EvalConfig, args: ExtractArgs) -> Result<()> {
    if !args.input.is_file() {
        return Err(ExtractionError::SourceNotFound {
            path: args.input.clone(),
        }
        .into());
    }

    let mappings = match args
        .service_mappings
        .as_deref()
        .or(config.extraction.service_mappings.as_deref())
    {
        Some(path) => ServiceMappings::from_file(path)?,
        None => ServiceMappings::defaults(),
    };

    if !args.services.is_empty() {
        mappings.validate_filter(&args.services)?;
    }

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let strict_tables = args.strict_tables || config.extraction.strict_tables;
    let extractor = MarkdownExtractor::new(mappings).with_strict_tables(strict_tables);
    let filter = (!args.services.is_empty()).then_some(args.services.as_slice());
    let cases = extractor.extract(&content, filter);

    if cases.is_empty() {
        println!(
            "{} no test cases found in {}",
            "Warning:".yellow().bold(),
            args.input.display()
        );
    }

    let variables = match args
        .variable_mappings
        .as_deref()
        .or(config.extraction.variable_mappings.as_deref())
    {
        Some(path) => VariableMappings::from_file(path)?,
        None => VariableMappings::defaults(),
    };

    let areas: Vec<String> = cases
        .iter()
        .map(|case| case.service_area.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let root = args.root.as_deref().or(config.extraction.root.as_deref());
    let tiers = variables.resolve_tiers(&areas, |area| TestSettingsSource::discover(root, area));

    let policy = if args.keep_unmapped {
        UnmappedPolicy::Keep
    } else {
        config.extraction.unmapped_policy
    };
    let outcome = PlaceholderResolver::new(tiers, policy).resolve(cases);

    let written = write_jsonl(&args.output, &outcome.cases)?;

    println!(
        "{} {} test cases to {}",
        "Extracted".green().bold(),
        written.to_string().bold(),
        args.output.display()
    );
    if outcome.skipped > 0 {
        println!(
            "{} {} queries with unmapped placeholders",
            "Dropped".yellow().bold(),
            outcome.skipped
        );
    }
    if !outcome.unmapped.is_empty() {
        println!();
        println!("{}", "Unmapped placeholders:".bold());
        println!("{}", output::unmapped_counts(&outcome.unmapped)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_eval_common::read_jsonl;
    use mcp_eval_domain::TestCase;

    const SAMPLE: &str = "\
# e2e Test Prompts

## Azure Storage

| Tool | Prompt |
|:-----|:-------|
| azmcp-storage-account-list | List all storage accounts |
| azmcp-storage-blob-list | Show blobs in container contoso |

## Azure Key Vault

| Tool | Prompt |
|:-----|:-------|
| azmcp-keyvault-secret-list | List secrets in my vault |
";

    fn args(input: PathBuf, output: PathBuf) -> ExtractArgs {
        ExtractArgs {
            input,
            output,
            services: vec![],
            service_mappings: None,
            variable_mappings: None,
            root: None,
            keep_unmapped: false,
            strict_tables: false,
        }
    }

    #[tokio::test]
    async fn test_extracts_corpus_from_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("prompts.md");
        std::fs::write(&input, SAMPLE).unwrap();
        let output = dir.path().join("data.jsonl");

        execute(EvalConfig::default(), args(input, output.clone()))
            .await
            .unwrap();

        let cases: Vec<TestCase> = read_jsonl(&output).unwrap();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].expected_tool_calls.service, "storage");
        assert_eq!(cases[2].service_area, "keyvault");
    }

    #[tokio::test]
    async fn test_service_filter_restricts_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("prompts.md");
        std::fs::write(&input, SAMPLE).unwrap();
        let output = dir.path().join("data.jsonl");

        let mut args = args(input, output.clone());
        args.services = vec!["keyvault".to_string()];
        execute(EvalConfig::default(), args).await.unwrap();

        let cases: Vec<TestCase> = read_jsonl(&output).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].expected_tool_calls.command, "keyvault_secret_list");
    }

    #[tokio::test]
    async fn test_unknown_service_name_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("prompts.md");
        std::fs::write(&input, SAMPLE).unwrap();
        let output = dir.path().join("data.jsonl");

        let mut args = args(input, output.clone());
        args.services = vec!["blobz".to_string()];
        let error = execute(EvalConfig::default(), args).await.unwrap_err();

        assert!(error
            .to_string()
            .contains("No support added for service name(s): blobz"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.md");
        let output = dir.path().join("data.jsonl");

        let error = execute(EvalConfig::default(), args(input, output))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("Source document not found"));
    }
}

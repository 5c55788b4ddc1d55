//! MCP Eval CLI
//!
//! Command-line interface for extracting tool-calling test cases and
//! evaluating models against an MCP server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use mcp_eval_cli::commands::{extract, run, tools};
use mcp_eval_common::{init_tracing, EvalConfig};

#[derive(Parser, Debug)]
#[command(name = "mcp-eval")]
#[command(author, version, about = "MCP tool-calling evaluation toolkit")]
#[command(long_about = "Command-line interface for the MCP evaluation toolkit.\n\n\
    Extract test cases from markdown prompt documents and evaluate how accurately \
    a model selects and parameterizes MCP tools against them.")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE", env = "MCP_EVAL_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Enable verbose output (shorthand for --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract test cases from a markdown prompts document
    #[command(alias = "x")]
    Extract(extract::ExtractArgs),

    /// Evaluate extracted test cases against the configured model
    #[command(alias = "r")]
    Run(run::RunArgs),

    /// List the tools advertised by the MCP server
    #[command(alias = "t")]
    Tools(tools::ToolsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let mut config = match EvalConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    // Override telemetry settings with CLI arguments
    if cli.json_logs {
        config.telemetry.json_logging = true;
    }
    if let Some(level) = &cli.log_level {
        config.telemetry.log_level = level.clone();
    } else if cli.verbose {
        config.telemetry.log_level = "debug".to_string();
    }
    if let Err(e) = config.validate() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(2);
    }

    // Initialize tracing
    init_tracing(config.telemetry.json_logging, &config.telemetry.log_level)?;

    // Execute command
    let result = match cli.command {
        Commands::Extract(args) => extract::execute(config, args).await,
        Commands::Run(args) => run::execute(config, args).await,
        Commands::Tools(args) => tools::execute(config, args).await,
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if cli.verbose {
            eprintln!("\n{}", "Backtrace:".dimmed());
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

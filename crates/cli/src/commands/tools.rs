//! Inspect the MCP server's tool catalog.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use mcp_eval_application::ToolEndpoint;
use mcp_eval_common::EvalConfig;
use mcp_eval_infrastructure::McpToolEndpoint;

use crate::output;

/// Arguments for `mcp-eval tools`
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// List every tool the configured MCP server advertises.
pub async fn execute(config: EvalConfig, args: ToolsArgs) -> Result<()> {
    let endpoint = McpToolEndpoint::new(config.tools.clone());
    let tools = endpoint.list_tools().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Tools advertised by".bold().cyan(),
        config.tools.endpoint()
    );
    println!("{}", "=".repeat(60));
    println!("{}", output::tool_catalog(&tools)?);
    println!("Total: {} tools", tools.len().to_string().bold());

    Ok(())
}

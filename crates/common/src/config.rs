//! Configuration management for the toolkit.
//!
//! Settings are loaded from optional configuration files overlaid by
//! environment variables, so a bare `mcp-eval run` works against a local MCP
//! server with nothing but `MCP_EVAL__CHAT__BASE_URL` and
//! `MCP_EVAL__CHAT__API_KEY` exported.
//!
//! ## Example Configuration
//!
//! ```toml
//! [chat]
//! base_url = "https://my-deployment.openai.azure.com/openai"
//! model = "gpt-4o"
//! auth_header = "api-key"
//!
//! [tools]
//! protocol = "stdio"
//! command = "npx"
//! args = ["-y", "@azure/mcp@latest", "server", "start"]
//!
//! [scoring]
//! score_threshold = 0.8
//! ```

use anyhow::{Context, Result};
use mcp_eval_domain::{ParamCheckMode, UnmappedPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main toolkit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Chat completion endpoint settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// MCP server transport
    #[serde(default)]
    pub tools: McpTransport,
    /// Conversation driver settings
    #[serde(default)]
    pub driver: DriverConfig,
    /// Accuracy scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Test-case extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Chat completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the OpenAI-compatible endpoint, without the
    /// `/chat/completions` suffix
    #[serde(default)]
    pub base_url: String,

    /// Model or deployment name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; sent as a bearer token unless `auth_header` is set
    #[serde(default)]
    pub api_key: Option<String>,

    /// `api-version` query parameter for Azure-style deployments.
    /// An empty value disables it.
    #[serde(default = "default_api_version")]
    pub api_version: Option<String>,

    /// Header name to carry the API key (e.g. `api-key`) instead of
    /// `Authorization: Bearer`
    #[serde(default)]
    pub auth_header: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retries for transient failures (429, 5xx, connect errors)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ChatConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The effective `api-version` query value, if enabled.
    pub fn api_version_param(&self) -> Option<&str> {
        self.api_version.as_deref().filter(|v| !v.is_empty())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: default_model(),
            api_key: None,
            api_version: default_api_version(),
            auth_header: None,
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

/// How to reach the MCP server.
///
/// Tagged by `protocol`, matching the shape used in MCP client configuration
/// files:
///
/// ```toml
/// [tools]
/// protocol = "sse"
/// url = "http://localhost:8000/sse"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "protocol")]
pub enum McpTransport {
    /// Server-sent events endpoint
    Sse {
        /// SSE endpoint URL
        url: String,
    },
    /// Child process speaking MCP over stdio
    Stdio {
        /// Executable to spawn
        command: String,
        /// Arguments passed to the executable
        #[serde(default)]
        args: Vec<String>,
        /// Extra environment variables for the child
        #[serde(default)]
        envs: HashMap<String, String>,
    },
}

impl McpTransport {
    /// Human-readable endpoint description for logs and errors.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Sse { url } => url.clone(),
            Self::Stdio { command, args, .. } => {
                let mut parts = vec![command.clone()];
                parts.extend(args.iter().cloned());
                parts.join(" ")
            }
        }
    }
}

impl Default for McpTransport {
    fn default() -> Self {
        Self::Stdio {
            command: "npx".to_string(),
            args: vec![
                "-y".to_string(),
                "@azure/mcp@latest".to_string(),
                "server".to_string(),
                "start".to_string(),
            ],
            envs: HashMap::new(),
        }
    }
}

/// Conversation driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Maximum chat round-trips per test case
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Assistant context message seeded before the user query.
    /// When unset, one is built from the subscription fields.
    #[serde(default)]
    pub context_message: Option<String>,

    /// Subscription display name for the default context message
    #[serde(default)]
    pub subscription_name: Option<String>,

    /// Subscription ID for the default context message
    #[serde(default)]
    pub subscription_id: Option<String>,
}

impl DriverConfig {
    /// The context message seeded as the first assistant turn, when any.
    pub fn seed_context(&self) -> Option<String> {
        if let Some(message) = &self.context_message {
            return Some(message.clone());
        }
        match (&self.subscription_name, &self.subscription_id) {
            (Some(name), Some(id)) => Some(format!(
                "The subscription is {name} with subscription ID {id}."
            )),
            _ => None,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            context_message: None,
            subscription_name: None,
            subscription_id: None,
        }
    }
}

/// Accuracy scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum score for a passing verdict
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Required-parameter check semantics
    #[serde(default)]
    pub param_check: ParamCheckMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            param_check: ParamCheckMode::default(),
        }
    }
}

/// Test-case extraction configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// JSON file overriding the built-in header-to-area mappings
    #[serde(default)]
    pub service_mappings: Option<PathBuf>,

    /// JSON file overriding the built-in placeholder templates
    #[serde(default)]
    pub variable_mappings: Option<PathBuf>,

    /// Project root for settings discovery; defaults to walking upward
    /// from the working directory
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Handling of records with leftover placeholder tokens
    #[serde(default)]
    pub unmapped_policy: UnmappedPolicy,

    /// Log skipped table rows instead of dropping them silently
    #[serde(default)]
    pub strict_tables: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_version() -> Option<String> {
    Some("2025-03-01-preview".to_string())
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    10
}

fn default_score_threshold() -> f64 {
    0.8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EvalConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. Default values
    /// 2. `config/default.toml` (if present)
    /// 3. `mcp-eval.toml` in the working directory (if present)
    /// 4. `path`, when given (must exist)
    /// 5. Environment variables prefixed with `MCP_EVAL__`
    ///    (e.g. `MCP_EVAL__CHAT__MODEL=gpt-4o-mini`)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("mcp-eval").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("MCP_EVAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let eval_config: EvalConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        eval_config.validate()?;

        Ok(eval_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.scoring.score_threshold) {
            anyhow::bail!(
                "Score threshold must be within [0.0, 1.0], got {}",
                self.scoring.score_threshold
            );
        }

        if self.driver.max_attempts == 0 {
            anyhow::bail!("Driver max attempts must be greater than 0");
        }

        if self.chat.timeout_seconds == 0 {
            anyhow::bail!("Chat timeout must be greater than 0");
        }

        if let McpTransport::Sse { url } = &self.tools {
            if url.is_empty() {
                anyhow::bail!("SSE transport requires a url");
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.chat.model, "gpt-4o");
        assert_eq!(config.chat.api_version.as_deref(), Some("2025-03-01-preview"));
        assert_eq!(config.driver.max_attempts, 10);
        assert_eq!(config.scoring.score_threshold, 0.8);
        assert_eq!(config.scoring.param_check, ParamCheckMode::AllMatchingCalls);
        assert_eq!(config.extraction.unmapped_policy, UnmappedPolicy::Drop);
        assert!(matches!(config.tools, McpTransport::Stdio { .. }));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_stdio_command_line() {
        let config = EvalConfig::default();
        assert_eq!(
            config.tools.endpoint(),
            "npx -y @azure/mcp@latest server start"
        );
    }

    #[test]
    fn test_seed_context_built_from_subscription() {
        let driver = DriverConfig {
            subscription_name: Some("Contoso Dev".to_string()),
            subscription_id: Some("0000-1111".to_string()),
            ..Default::default()
        };
        assert_eq!(
            driver.seed_context().unwrap(),
            "The subscription is Contoso Dev with subscription ID 0000-1111."
        );
    }

    #[test]
    fn test_explicit_context_wins() {
        let driver = DriverConfig {
            context_message: Some("use the sandbox tenant".to_string()),
            subscription_name: Some("ignored".to_string()),
            subscription_id: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(driver.seed_context().unwrap(), "use the sandbox tenant");
    }

    #[test]
    fn test_seed_context_absent_without_subscription() {
        assert_eq!(DriverConfig::default().seed_context(), None);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = EvalConfig::default();
        config.scoring.score_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = EvalConfig::default();
        config.driver.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = EvalConfig::default();
        config.telemetry.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = EvalConfig::default();
        config.tools = McpTransport::Sse { url: String::new() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_api_version_disables_param() {
        let chat = ChatConfig {
            api_version: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(chat.api_version_param(), None);
    }

    #[test]
    fn test_transport_deserializes_from_tag() {
        let sse: McpTransport =
            serde_json::from_str(r#"{"protocol":"sse","url":"http://localhost:8000/sse"}"#)
                .unwrap();
        assert!(matches!(sse, McpTransport::Sse { .. }));

        let stdio: McpTransport =
            serde_json::from_str(r#"{"protocol":"stdio","command":"azmcp"}"#).unwrap();
        match stdio {
            McpTransport::Stdio { command, args, .. } => {
                assert_eq!(command, "azmcp");
                assert!(args.is_empty());
            }
            _ => panic!("expected stdio transport"),
        }
    }
}

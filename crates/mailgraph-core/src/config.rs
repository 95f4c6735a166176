//! Configuration management for Mailgraph services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`MAILGRAPH__SECTION__KEY`)
//! 2. Config file (`<prefix>.toml`, default `mailgraph.toml`)
//! 3. Defaults

use serde::Deserialize;

use crate::error::{MailgraphError, Result};

/// Top-level configuration shared by the server and the ingestion job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

/// Neo4j connection settings (`[neo4j]`).
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,

    #[serde(default = "default_neo4j_user")]
    pub user: String,

    #[serde(default = "default_neo4j_password")]
    pub password: String,

    /// Upper bound on pooled Bolt connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Rows pulled per round-trip when streaming results.
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Per-query timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

/// LLM collaborator settings (`[llm]`).
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API, without the trailing
    /// `/chat/completions`.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Models a caller may request by name.
    #[serde(default = "default_llm_models")]
    pub models: Vec<String>,

    /// Used when the caller names no model or one outside `models`.
    #[serde(default = "default_llm_model")]
    pub default_model: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// HTTP server settings (`[server]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_neo4j_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_neo4j_password() -> String {
    "mailgraph-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_query_timeout() -> u64 {
    30
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_models() -> Vec<String> {
    vec!["gpt-3.5-turbo".to_string(), "gpt-4".to_string()]
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_neo4j_uri(),
            user: default_neo4j_user(),
            password: default_neo4j_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            models: default_llm_models(),
            default_model: default_llm_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `<file_prefix>.toml` (optional) and
    /// `MAILGRAPH__` environment variables on top of the defaults.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = ::config::Config::builder()
            .add_source(::config::File::with_name(file_prefix).required(false))
            .add_source(
                ::config::Environment::with_prefix("MAILGRAPH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("llm.models")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = cfg.try_deserialize()?;
        tracing::debug!(
            neo4j_uri = %config.neo4j.uri,
            llm_base_url = %config.llm.base_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Presence-only validation of the settings the HTTP server needs.
    pub fn validate_for_server(&self) -> Result<()> {
        if self.neo4j.uri.trim().is_empty() {
            return Err(MailgraphError::MissingSetting("neo4j.uri"));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(MailgraphError::MissingSetting("llm.api_key"));
        }
        if self.llm.default_model.trim().is_empty() {
            return Err(MailgraphError::MissingSetting("llm.default_model"));
        }
        Ok(())
    }
}

impl LlmSettings {
    /// Pick the model to use for a request: the requested one if it is on
    /// the allow-list, otherwise the default.
    pub fn resolve_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(name) if self.models.iter().any(|m| m == name) => name,
            _ => &self.default_model,
        }
    }
}

//! Configuration for the mailgraph-ingest loader.

use serde::Deserialize;

/// Ingestion settings.
///
/// Loaded from the `[ingest]` section of `mailgraph.toml` or
/// `MAILGRAPH__INGEST__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Input file used when `load` is given no path.
    #[serde(default = "default_input_path")]
    pub input_path: String,

    /// Create the `Person.email` uniqueness constraint before writing.
    #[serde(default = "default_true")]
    pub ensure_schema: bool,

    /// Log progress every N records (0 disables).
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_input_path() -> String {
    "email_data.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_progress_every() -> usize {
    1000
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            ensure_schema: true,
            progress_every: default_progress_every(),
        }
    }
}

impl IngestConfig {
    /// Load the `[ingest]` section, falling back to defaults when it is
    /// absent.
    pub fn load(file_prefix: &str) -> Result<Self, ::config::ConfigError> {
        let cfg = ::config::Config::builder()
            .add_source(::config::File::with_name(file_prefix).required(false))
            .add_source(
                ::config::Environment::with_prefix("MAILGRAPH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match cfg.get::<IngestConfig>("ingest") {
            Ok(c) => Ok(c),
            Err(::config::ConfigError::NotFound(_)) => Ok(IngestConfig::default()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.input_path, "email_data.json");
        assert!(config.ensure_schema);
        assert_eq!(config.progress_every, 1000);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent");
        let config = IngestConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.input_path, "email_data.json");
    }

    #[test]
    fn test_section_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingest-test.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[ingest]
input_path = "/data/emails.json"
ensure_schema = false
"#
        )
        .unwrap();

        let prefix = dir.path().join("ingest-test");
        let config = IngestConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.input_path, "/data/emails.json");
        assert!(!config.ensure_schema);
        assert_eq!(config.progress_every, 1000);
    }
}

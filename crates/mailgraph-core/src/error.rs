use thiserror::Error;

/// Top-level error type for Mailgraph.
#[derive(Error, Debug)]
pub enum MailgraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),
}

pub type Result<T> = std::result::Result<T, MailgraphError>;

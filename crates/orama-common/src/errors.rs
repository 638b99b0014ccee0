use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OramaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("network error: {0}")]
    Network(String),

    #[error("answer error: {0}")]
    Answer(String),
}

//! Error types for Importune

use thiserror::Error;

pub type ImportuneResult<T> = std::result::Result<T, ImportuneError>;

#[derive(Debug, Error)]
pub enum ImportuneError {
    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Oracle(#[from] OracleError),

    #[error("{0}")]
    Context(#[from] ContextError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures of the convergence loop itself.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The fix set never reached a textual fixed point. This is an engine or
    /// configuration defect, not a user error.
    #[error(
        "formatting did not settle within {limit} iterations. \
         Please open an issue and include the contents of your file."
    )]
    DepthLimitExceeded { limit: u32 },

    #[error("{0}")]
    Oracle(#[from] OracleError),
}

/// Failures at the analyzer boundary.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("analyzer rejected the configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "failed to launch analyzer '{command}': {source}. Run 'importune doctor' to check your setup."
    )]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("analyzer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("analyzer produced malformed output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures locating or reading a cell's containing notebook.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("cell {index} is out of range (notebook has {count} cells)")]
    CellOutOfRange { index: usize, count: usize },

    #[error("not a notebook: {0}")]
    NotANotebook(String),

    #[error("cell context requested but the containing notebook could not be read: {0}")]
    ContainerUnavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

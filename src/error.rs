use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Unsafe path '{}': must be relative and must not leave the project directory", .0.display())]
    UnsafePath(PathBuf),

    #[error("Prompt input closed before an answer was given")]
    PromptClosed,

    #[error("Command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("package.json not found in {}", .0.display())]
    MissingPackageJson(PathBuf),

    #[error("Invalid package.json: {0}")]
    InvalidPackageJson(String),

    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

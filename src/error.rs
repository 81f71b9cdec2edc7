//! Error type shared by every recipe.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ChoreError> = std::result::Result<T, E>;

/// Exit code used when a delegated tool is not installed, matching the shell convention.
pub const EXIT_TOOL_NOT_FOUND: u8 = 127;

#[derive(Debug, Error)]
pub enum ChoreError {
    #[error("unknown recipe `{name}` (run `chore --list` to see available recipes)")]
    UnknownRecipe { name: String },

    #[error("recipe `{recipe}` takes no arguments, got: {}", .args.join(" "))]
    UnexpectedArguments { recipe: &'static str, args: Vec<String> },

    #[error("tool not found: {program}")]
    ToolNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("env file not found: {}", .path.display())]
    EnvFileMissing { path: PathBuf },

    #[error("failed to read env file {}: {source}", .path.display())]
    EnvFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}:{col}: {message}", .path.display())]
    EnvFileParse {
        path: PathBuf,
        line: usize,
        col: usize,
        message: String,
    },

    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize recipes: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChoreError {
    /// Process exit code to report for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            ChoreError::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            _ => 1,
        }
    }
}

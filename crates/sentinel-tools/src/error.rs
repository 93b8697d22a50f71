//! Error type for tool execution

use thiserror::Error;

/// Errors surfaced across the tool seam
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool input did not match the declared schema
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// No tool registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::InvalidParams(err.to_string())
    }
}

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

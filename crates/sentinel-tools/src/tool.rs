//! Tool trait definition

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A typed callable an agent shell can invoke against market data
///
/// A tool carries its own metadata: the registry keys it by `name`, and the
/// description plus input schema are what the shell hands to the LLM so it
/// can decide when to call the tool and with what arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool
    ///
    /// `params` is the JSON input; implementations deserialize it against
    /// their own params struct and reject anything off-schema as
    /// `ToolError::InvalidParams`. Output is a JSON value.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Registry key for this tool; registering a duplicate name replaces
    /// the earlier tool
    fn name(&self) -> &str;

    /// One or two sentences telling the LLM what the tool is for
    fn description(&self) -> &str;

    /// JSON Schema describing the shape `execute` accepts
    fn input_schema(&self) -> Value;
}

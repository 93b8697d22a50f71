//! Tool management framework for the sentinel workspace
//!
//! This crate provides the seam between the domain crates and an external
//! LLM agent shell: tools are typed callables with a name, description and
//! JSON input schema, collected in a registry populated at startup.

pub mod error;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tool::Tool;

// Tools module - pluggable capability descriptors and supervised invocation
// See docs/tools-design.md for design details

pub mod config;
pub mod error;
pub mod shell;
pub mod supervisor;
pub mod types;
pub mod validate;

pub use config::ToolsConfig;
pub use error::{Result, ToolError};
pub use shell::ShellTool;
pub use supervisor::{BoundTool, Supervisor, ToolImpl, invoke};
pub use types::{ToolArgs, ToolDescriptor, ToolExecutionResult};
pub use validate::{RawToolSpec, ToolValidation, validate_specs};

// Script module - supervised execution of model-authored code
// See docs/script-design.md for design details

pub mod config;
pub mod error;
pub mod runner;
pub mod sanitize;
pub mod types;

pub use config::ScriptConfig;
pub use error::{Result, ScriptError};
pub use runner::{ScriptRunner, detect_interactive};
pub use sanitize::sanitize;
pub use types::{Classification, ExecutionResult, GeneratedScript};

// Coder module - model-driven code generation with a bounded retry loop
// See docs/coder-design.md for design details

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use config::CoderConfig;
pub use error::CoderError;
pub use orchestrator::{Coder, UserInteraction};
pub use types::{Confirmation, CoderOutcome, RetryState, SessionStatus};

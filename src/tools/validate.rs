// Load-time validation of externally supplied tool descriptors
#![allow(dead_code)]

use crate::tools::types::ToolDescriptor;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

/// Default invocation budget when a spec omits timeout_sec
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 15;

/// A tool descriptor as it appears in the configuration file, before
/// validation. All fields optional so shape errors surface as validation
/// reasons rather than parse failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawToolSpec {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub timeout_sec: Option<u64>,
    pub include_history: Option<bool>,
    pub pipe_input: Option<bool>,
    pub pipe_output: Option<bool>,
}

/// Validation outcome for one spec. Produced once at load time; the
/// supervisor only ever sees the Valid arm.
#[derive(Debug, Clone)]
pub enum ToolValidation {
    Valid(ToolDescriptor),
    Invalid { id: String, reasons: Vec<String> },
}

/// Validate a batch of raw specs. Missing optional fields take defaults;
/// a missing or duplicate name rejects the spec.
pub fn validate_specs(specs: &[RawToolSpec]) -> Vec<ToolValidation> {
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(specs.len());

    for (index, spec) in specs.iter().enumerate() {
        let mut reasons = Vec::new();

        let name = match spec.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            Some(_) => {
                reasons.push("attribute 'name' is empty".to_string());
                None
            }
            None => {
                reasons.push("missing required attribute 'name'".to_string());
                None
            }
        };

        if let Some(name) = &name {
            if !seen_names.insert(name.clone()) {
                reasons.push(format!("duplicate tool name '{name}' is not allowed"));
            }
        }

        if spec.timeout_sec == Some(0) {
            reasons.push("attribute 'timeout_sec' must be greater than zero".to_string());
        }

        let id = name
            .clone()
            .unwrap_or_else(|| format!("<tool #{index}>"));

        if !reasons.is_empty() {
            out.push(ToolValidation::Invalid { id, reasons });
            continue;
        }

        let descriptor = ToolDescriptor {
            name: id,
            alias: spec.alias.clone(),
            timeout_secs: spec.timeout_sec.unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS),
            include_history: spec.include_history.unwrap_or(false),
            pipe_input: spec.pipe_input.unwrap_or(false),
            pipe_output: spec.pipe_output.unwrap_or(false),
        };
        debug!(tool = %descriptor.name, "tool descriptor validated");
        out.push(ToolValidation::Valid(descriptor));
    }

    out
}

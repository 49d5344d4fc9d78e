// Script runner configuration
#![allow(dead_code)]

/// Script runner configuration
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Interpreter used to run generated scripts
    pub interpreter: String,
    /// Default wall-clock bound for one execution, in seconds
    pub timeout_secs: u64,
    /// Echo interactive output to the terminal as it is produced
    pub echo: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            interpreter: String::from("python3"),
            timeout_secs: 300,
            echo: true,
        }
    }
}

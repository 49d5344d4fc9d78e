// Coder configuration
#![allow(dead_code)]

use tracing::warn;

/// System instruction for the code-generation calls. The first history
/// entry of every session; states the execution contract the runner
/// classifies against.
pub const DEFAULT_PROMPT_CODE: &str = "\
You are an advanced Python coding assistant.

OBJECTIVE
Return a single, self-contained Python 3 script that fulfils the user's request.

ALLOWED IMPORTS
The Python standard library only.

MANDATORY FORMAT & BEHAVIOR
1. Raw code only, no markdown back-ticks, comments, or extra text.
2. First non-blank character must be Python code.
3. The script must call print() (or an equivalent) so its final answer appears on stdout.
4. No blank lines before the first or after the last line of code.
5. DO NOT use any interactive input (no input() functions). Instead, hardcode example values or use command line arguments if needed.";

/// System instruction for the one answer-synthesis call issued after a
/// successful run.
pub const DEFAULT_PROMPT_ANSWER: &str = "\
Using ONLY the execution output provided, answer the user's original question \
plainly and MAKE SURE NOT to end your answer with a period unless it makes \
sense to do so";

/// Parse an environment variable, logging a warning if the value is present but invalid.
fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => match v.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %v, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Coder configuration
#[derive(Debug, Clone)]
pub struct CoderConfig {
    /// Additional attempts permitted after the initial failure
    pub max_retries: u32,
    /// Confirmation replies longer than this are treated as modification
    /// instructions rather than yes/no answers
    pub modify_threshold: usize,
    /// System instruction for code generation
    pub prompt_code: String,
    /// System instruction for answer synthesis
    pub prompt_answer: String,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            modify_threshold: 5,
            prompt_code: DEFAULT_PROMPT_CODE.to_string(),
            prompt_answer: DEFAULT_PROMPT_ANSWER.to_string(),
        }
    }
}

impl CoderConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = CoderConfig::default();
        config.max_retries = parse_env_var("CODA_MAX_RETRIES", config.max_retries);
        config.modify_threshold = parse_env_var("CODA_MODIFY_THRESHOLD", config.modify_threshold);
        config
    }
}

// Integration tests for the tools module
// This file should be run with cargo test --test test_tools

#[path = "../src/model/mod.rs"]
mod model;

#[path = "../src/tools/mod.rs"]
mod tools;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tools::{
    BoundTool, RawToolSpec, Supervisor, ToolArgs, ToolDescriptor, ToolImpl, ToolValidation,
    invoke, validate_specs,
};

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .init();
    });
}

fn descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        alias: None,
        timeout_secs: 5,
        include_history: false,
        pipe_input: false,
        pipe_output: false,
    }
}

/// Reports back which arguments the supervisor assembled
struct EchoArgsTool;

#[async_trait]
impl ToolImpl for EchoArgsTool {
    async fn execute(&self, args: ToolArgs) -> tools::Result<Value> {
        Ok(json!({
            "history_len": args.chat_history.as_ref().map(Vec::len),
            "piped_input": args.piped_input,
        }))
    }
}

/// Never finishes inside any sane budget
struct SlowTool;

#[async_trait]
impl ToolImpl for SlowTool {
    async fn execute(&self, _args: ToolArgs) -> tools::Result<Value> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(json!("too late"))
    }
}

/// Always fails
struct FailingTool;

#[async_trait]
impl ToolImpl for FailingTool {
    async fn execute(&self, _args: ToolArgs) -> tools::Result<Value> {
        Err(tools::ToolError::ExecutionFailed("boom".to_string()))
    }
}

/// Panics instead of returning
struct PanickingTool;

#[async_trait]
impl ToolImpl for PanickingTool {
    async fn execute(&self, _args: ToolArgs) -> tools::Result<Value> {
        panic!("tool blew up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A complete spec validates into a descriptor with its own values
    #[test]
    fn test_validate_complete_spec() {
        let specs = vec![RawToolSpec {
            name: Some("search".to_string()),
            alias: Some("s".to_string()),
            timeout_sec: Some(30),
            include_history: Some(true),
            pipe_input: Some(true),
            pipe_output: Some(false),
        }];

        let results = validate_specs(&specs);
        assert_eq!(results.len(), 1);
        match &results[0] {
            ToolValidation::Valid(desc) => {
                assert_eq!(desc.name, "search");
                assert_eq!(desc.alias.as_deref(), Some("s"));
                assert_eq!(desc.timeout_secs, 30);
                assert!(desc.include_history);
                assert!(desc.pipe_input);
                assert!(!desc.pipe_output);
            }
            other => panic!("expected Valid, got {other:?}"),
        }
    }

    /// Omitted optional fields take defaults
    #[test]
    fn test_validate_applies_defaults() {
        let specs = vec![RawToolSpec {
            name: Some("plain".to_string()),
            ..Default::default()
        }];

        match &validate_specs(&specs)[0] {
            ToolValidation::Valid(desc) => {
                assert_eq!(desc.timeout_secs, tools::validate::DEFAULT_TOOL_TIMEOUT_SECS);
                assert!(!desc.include_history);
                assert!(!desc.pipe_input);
                assert!(!desc.pipe_output);
                assert!(desc.alias.is_none());
            }
            other => panic!("expected Valid, got {other:?}"),
        }
    }

    /// A missing name rejects the spec with a reason
    #[test]
    fn test_validate_missing_name() {
        let results = validate_specs(&[RawToolSpec::default()]);
        match &results[0] {
            ToolValidation::Invalid { reasons, .. } => {
                assert!(reasons.iter().any(|r| r.contains("name")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    /// Duplicate names reject the later spec
    #[test]
    fn test_validate_duplicate_names() {
        let spec = |name: &str| RawToolSpec {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let results = validate_specs(&[spec("a"), spec("a")]);

        assert!(matches!(results[0], ToolValidation::Valid(_)));
        match &results[1] {
            ToolValidation::Invalid { reasons, .. } => {
                assert!(reasons.iter().any(|r| r.contains("duplicate")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    /// A zero timeout is rejected
    #[test]
    fn test_validate_zero_timeout() {
        let specs = vec![RawToolSpec {
            name: Some("t".to_string()),
            timeout_sec: Some(0),
            ..Default::default()
        }];
        assert!(matches!(
            validate_specs(&specs)[0],
            ToolValidation::Invalid { .. }
        ));
    }

    /// Arguments are assembled strictly from descriptor flags
    #[tokio::test]
    async fn test_invoke_builds_args_from_flags() {
        init_tracing();

        let history = vec![
            model::ChatMessage::system("sys"),
            model::ChatMessage::user("hi"),
        ];

        let mut desc = descriptor("echo");
        desc.include_history = true;
        desc.pipe_input = true;
        let tool = BoundTool::new(desc, Arc::new(EchoArgsTool));
        let outcome = invoke(&tool, Some(history.as_slice()), Some("question")).await;
        let value = outcome.result.unwrap();
        assert_eq!(value["history_len"], json!(2));
        assert_eq!(value["piped_input"], json!("question"));

        let tool = BoundTool::new(descriptor("echo"), Arc::new(EchoArgsTool));
        let outcome = invoke(&tool, Some(history.as_slice()), Some("question")).await;
        let value = outcome.result.unwrap();
        assert_eq!(value["history_len"], Value::Null);
        assert_eq!(value["piped_input"], Value::Null);
    }

    /// With pipe_input set but no question supplied, the tool still gets a
    /// (empty) piped input
    #[tokio::test]
    async fn test_invoke_pipe_input_defaults_empty() {
        init_tracing();

        let mut desc = descriptor("echo");
        desc.pipe_input = true;
        let tool = BoundTool::new(desc, Arc::new(EchoArgsTool));
        let outcome = invoke(&tool, None, None).await;
        assert_eq!(outcome.result.unwrap()["piped_input"], json!(""));
    }

    /// The deadline abandons a stuck call and reports the fixed error
    #[tokio::test]
    async fn test_invoke_timeout() {
        init_tracing();

        let mut desc = descriptor("slow");
        desc.timeout_secs = 1;
        desc.pipe_output = true;
        let tool = BoundTool::new(desc, Arc::new(SlowTool));

        let start = Instant::now();
        let outcome = invoke(&tool, None, None).await;

        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(outcome.result.is_none());
        assert_eq!(outcome.error.as_deref(), Some("Timed out the tool"));
        assert!(outcome.continue_chat);
    }

    /// Implementation errors become textual errors, never panics
    #[tokio::test]
    async fn test_invoke_converts_errors() {
        init_tracing();

        let tool = BoundTool::new(descriptor("fail"), Arc::new(FailingTool));
        let outcome = invoke(&tool, None, None).await;

        assert!(outcome.result.is_none());
        assert!(outcome.error.unwrap().contains("boom"));
        assert!(!outcome.continue_chat);
    }

    /// A panicking implementation is contained by the supervisor
    #[tokio::test]
    async fn test_invoke_contains_panics() {
        init_tracing();

        let tool = BoundTool::new(descriptor("panic"), Arc::new(PanickingTool));
        let outcome = invoke(&tool, None, None).await;

        assert!(outcome.result.is_none());
        assert!(outcome.error.is_some());
    }

    /// continue_chat mirrors the descriptor on success too
    #[tokio::test]
    async fn test_continue_chat_mirrors_descriptor() {
        init_tracing();

        let mut desc = descriptor("echo");
        desc.pipe_output = true;
        let tool = BoundTool::new(desc, Arc::new(EchoArgsTool));
        let outcome = invoke(&tool, None, None).await;
        assert!(outcome.continue_chat);
    }

    /// Registry lookup by name and alias; unknown keys error
    #[tokio::test]
    async fn test_supervisor_registry() {
        init_tracing();

        let mut desc = descriptor("echo");
        desc.alias = Some("e".to_string());

        let mut supervisor = Supervisor::new();
        supervisor.register(BoundTool::new(desc, Arc::new(EchoArgsTool)));

        assert!(supervisor.find("echo").is_some());
        assert!(supervisor.find("e").is_some());
        assert!(supervisor.find("missing").is_none());

        let result = supervisor.invoke_by_name("e", None, None).await;
        assert!(result.is_ok());

        let result = supervisor.invoke_by_name("missing", None, None).await;
        assert!(matches!(result, Err(tools::ToolError::UnknownTool(_))));
    }

    /// Descriptor files: missing path is empty, present path parses
    #[test]
    fn test_load_specs() {
        init_tracing();

        let missing = std::path::Path::new("/nonexistent/tools.toml");
        assert!(tools::config::load_specs(missing).unwrap().is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.toml");
        std::fs::write(
            &path,
            r#"
[[tool]]
name = "search"
timeout_sec = 30
pipe_input = true

[[tool]]
alias = "broken"
"#,
        )
        .unwrap();

        let specs = tools::config::load_specs(&path).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name.as_deref(), Some("search"));
        assert!(specs[1].name.is_none());
    }
}

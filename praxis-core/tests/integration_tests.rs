//! End-to-end tests for the discovery → routing → execution pipeline
//!
//! These wire the real registry, discovery, router, and executor together
//! with fake MCP services standing in for remote servers, so the full path
//! an agent-loop tool call takes is exercised without any network.

use async_trait::async_trait;
use praxis_core::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A scripted remote server: fixed tool list, fixed call response.
struct ScriptedServer {
    tools: Vec<McpTool>,
    response: ToolResult<ToolCallResult>,
    list_calls: Arc<AtomicUsize>,
    tool_calls: Arc<AtomicUsize>,
}

#[async_trait]
impl McpService for ScriptedServer {
    async fn list_tools(&self) -> ToolResult<Vec<McpTool>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        _name: &str,
        _arguments: Value,
        _cancel: Option<&CancellationToken>,
    ) -> ToolResult<ToolCallResult> {
        self.tool_calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

struct Harness {
    registry: Arc<ToolRegistry>,
    health: Arc<HealthTracker>,
    servers: Vec<McpServerConfig>,
    factory: McpClientFactory,
    list_calls: Arc<AtomicUsize>,
    tool_calls: Arc<AtomicUsize>,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl Harness {
    fn new(tools: Vec<McpTool>, response: ToolResult<ToolCallResult>) -> Self {
        init_tracing();
        let list_calls = Arc::new(AtomicUsize::new(0));
        let tool_calls = Arc::new(AtomicUsize::new(0));
        let (lists, calls) = (list_calls.clone(), tool_calls.clone());
        let factory: McpClientFactory = Arc::new(move |_config| {
            Arc::new(ScriptedServer {
                tools: tools.clone(),
                response: response.clone(),
                list_calls: lists.clone(),
                tool_calls: calls.clone(),
            }) as Arc<dyn McpService>
        });

        Self {
            registry: Arc::new(ToolRegistry::new()),
            health: Arc::new(HealthTracker::new()),
            servers: vec![McpServerConfig::new("server", "http://localhost:3001/rpc")],
            factory,
            list_calls,
            tool_calls,
        }
    }

    async fn discover(&self) -> ToolResult<usize> {
        let discovery = McpDiscovery::with_factory(
            self.registry.clone(),
            self.health.clone(),
            self.factory.clone(),
        );
        discovery.refresh(&self.servers).await
    }

    fn router(&self) -> Arc<Router> {
        Arc::new(Router::with_factory(
            self.registry.clone(),
            self.servers.clone(),
            self.health.clone(),
            self.factory.clone(),
        ))
    }

    async fn execute(&self, tool_name: &str, args: Value) -> ToolResult<String> {
        self.execute_with(tool_name, args, ExecuteOptions::default())
            .await
    }

    async fn execute_with(
        &self,
        tool_name: &str,
        args: Value,
        options: ExecuteOptions,
    ) -> ToolResult<String> {
        let router = self.router();
        execute(
            tool_name,
            "toolu_test",
            args,
            move |request| {
                let router = router.clone();
                async move { router.route(request).await }
            },
            options,
        )
        .await
    }
}

fn search_tool() -> McpTool {
    McpTool {
        name: "search".to_string(),
        description: Some("Search the docs".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        }),
    }
}

fn text_response(text: &str) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentBlock::text(text)],
        is_error: None,
    }
}

#[tokio::test]
async fn test_list_then_call_scenario() {
    let harness = Harness::new(vec![search_tool()], Ok(text_response("ok")));

    let registered = harness.discover().await.unwrap();
    assert_eq!(registered, 1);

    let tools = harness.registry.tools_for_model();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "server__search");
    assert_eq!(tools[0].input_schema["required"], json!(["query"]));

    let result = harness
        .execute("server__search", json!({"query": "hi"}))
        .await
        .unwrap();

    assert_eq!(result, "ok");
    assert_eq!(harness.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.tool_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_is_error_payload_surfaces_as_failure() {
    let mut response = text_response("bad");
    response.is_error = Some(true);
    let harness = Harness::new(vec![search_tool()], Ok(response));
    harness.discover().await.unwrap();

    let error = harness
        .execute_with(
            "server__search",
            json!({"query": "hi"}),
            ExecuteOptions::default().with_max_attempts(1),
        )
        .await
        .unwrap_err();

    assert_eq!(error.code, ToolErrorCode::ToolExecutionFailed);
    assert!(error.message.contains("bad"));
}

#[tokio::test]
async fn test_unknown_tool_skips_network() {
    let harness = Harness::new(vec![search_tool()], Ok(text_response("ok")));
    harness.discover().await.unwrap();

    let error = harness.execute("nonexistent", json!({})).await.unwrap_err();

    assert_eq!(error.code, ToolErrorCode::ToolNotFound);
    assert!(!error.retryable);
    assert_eq!(harness.tool_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_static_conflict_excluded_from_registration() {
    let harness = Harness::new(vec![search_tool()], Ok(text_response("ok")));
    harness.registry.register_static(
        ModelTool {
            name: "search".to_string(),
            description: Some("built-in search".to_string()),
            input_schema: json!({"type": "object"}),
        },
        Arc::new(FnHandler(|_| Ok(json!("builtin")))),
    );

    let registered = harness.discover().await.unwrap();

    assert_eq!(registered, 0);
    assert!(harness.registry.mcp_tool("server__search").is_none());
}

#[tokio::test]
async fn test_executor_never_panics_on_rejecting_route() {
    let result = execute(
        "anything",
        "toolu_reject",
        json!({}),
        |_request| async { Err(ToolError::execution_failed("immediate rejection", false)) },
        ExecuteOptions::default(),
    )
    .await;

    let error = result.unwrap_err();
    assert_eq!(error.code, ToolErrorCode::ToolExecutionFailed);
    assert!(error.message.contains("`anything`"));
}

#[tokio::test(start_paused = true)]
async fn test_executor_never_panics_on_hanging_route() {
    let result: ToolResult<String> = execute(
        "anything",
        "toolu_hang",
        json!({}),
        |_request| std::future::pending(),
        ExecuteOptions::default()
            .with_timeout(Duration::from_secs(1))
            .with_max_attempts(1),
    )
    .await;

    let error = result.unwrap_err();
    assert_eq!(error.code, ToolErrorCode::ToolExecutionFailed);
}

#[tokio::test]
async fn test_caller_cancellation_aborts_call() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = execute(
        "docs__search",
        "toolu_cancel",
        json!({}),
        |request| async move {
            // a well-behaved route observes the token it is handed
            if let Some(token) = request.cancel {
                token.cancelled().await;
            }
            Err(ToolError::unavailable("Request aborted", true))
        },
        ExecuteOptions::default()
            .with_max_attempts(1)
            .with_cancel(cancel),
    )
    .await;

    let error = result.unwrap_err();
    assert_eq!(error.code, ToolErrorCode::ToolUnavailable);
}

#[tokio::test]
async fn test_concurrent_calls_do_not_interfere() {
    let harness = Arc::new(Harness::new(vec![search_tool()], Ok(text_response("ok"))));
    harness.discover().await.unwrap();

    let good = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.execute("server__search", json!({"query": "a"})).await })
    };
    let missing = {
        let harness = harness.clone();
        tokio::spawn(async move { harness.execute("nope", json!({})).await })
    };

    let good = good.await.unwrap().unwrap();
    let missing = missing.await.unwrap().unwrap_err();

    assert_eq!(good, "ok");
    assert_eq!(missing.code, ToolErrorCode::ToolNotFound);
}

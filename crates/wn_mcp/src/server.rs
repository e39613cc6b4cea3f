use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use wn_core::prompts::PromptTemplates;
use wn_core::Result;
use wn_inference::NewsService;

use crate::protocol::{
    Request, Response, RpcError, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::tools::{self, ToolError};
use crate::{PROTOCOL_VERSION, SERVER_NAME};

pub struct ToolServer {
    service: NewsService,
}

impl ToolServer {
    pub fn new(service: NewsService) -> Self {
        Self { service }
    }

    /// Serves until the reader reaches EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("🔧 Tool server '{}' ready on stdio", SERVER_NAME);
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        info!("Tool server input closed, shutting down");
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout()).await
    }

    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding unparseable message: {}", e);
                return Some(Response::failure(Value::Null, RpcError::new(PARSE_ERROR, e.to_string())));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => return Some(Response::failure(id, RpcError::new(INVALID_REQUEST, e.to_string()))),
        };
        if !request.has_valid_version() {
            return Some(Response::failure(
                id,
                RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
            ));
        }
        self.handle(request).await
    }

    /// Returns `None` for notifications.
    pub async fn handle(&self, request: Request) -> Option<Response> {
        debug!("← {}", request.method);
        let outcome = self.dispatch(&request).await;
        if request.is_notification() {
            return None;
        }
        let id = request.id.unwrap_or_default();
        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    async fn dispatch(&self, request: &Request) -> std::result::Result<Value, RpcError> {
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {"listChanged": false}},
                "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
                "instructions": PromptTemplates::get().tool_guidance,
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::definitions() })),
            "tools/call" => self.call_tool(request.params.clone().unwrap_or(Value::Null)).await,
            method if method.starts_with("notifications/") => Ok(Value::Null),
            method => Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))),
        }
    }

    async fn call_tool(&self, params: Value) -> std::result::Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "tools/call requires a tool name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        info!("🔧 Calling tool {}", name);

        match tools::call(&self.service, name, arguments).await {
            Ok(output) => {
                let mut result = json!({
                    "content": [{"type": "text", "text": output.text}],
                    "isError": false,
                });
                if let Some(structured) = output.structured {
                    result["structuredContent"] = structured;
                }
                Ok(result)
            }
            Err(ToolError::UnknownTool(name)) => {
                Err(RpcError::new(INVALID_PARAMS, format!("Unknown tool: {}", name)))
            }
            Err(ToolError::InvalidArguments(msg)) => {
                Err(RpcError::new(INVALID_PARAMS, format!("Invalid arguments for {}: {}", name, msg)))
            }
            Err(ToolError::Failed(e)) => {
                warn!("Tool {} failed: {}", name, e);
                Ok(json!({
                    "content": [{"type": "text", "text": e.to_string()}],
                    "isError": true,
                }))
            }
        }
    }
}

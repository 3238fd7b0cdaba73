//! Terminal walkthroughs driven by the `alloy-mcp-client` binary
//!
//! Each command opens a session with `initialize` and then performs one or more
//! exchanges, rendering results as plain text.

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{
    handshake::ServerInfo,
    resources::{PromptDescriptor, ResourceContents, ResourceDescriptor},
    tools::{ToolDescriptor, ToolResult},
};
use crate::errors::RpcError;
use crate::mcp::{client::McpClient, rpc::METHOD_NOT_FOUND};

pub const CLIENT_NAME: &str = env!("CARGO_PKG_NAME");
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const LISTING_LIMIT: usize = 5;
const PREVIEW_CHARS: usize = 200;

pub async fn connect(client: &McpClient) -> Result<ServerInfo, RpcError> {
    let info = client.initialize(CLIENT_NAME, CLIENT_VERSION).await?;
    info!(
        server = %info.name,
        endpoint = %client.endpoint().host_str().unwrap_or_default(),
        "connected"
    );
    println!("Connected to {}", info.name);
    if let Some(instructions) = &info.instructions {
        println!("Server instructions: {instructions}");
    }
    Ok(info)
}

/// Runs a tool and folds any failure into an error result instead of returning it.
pub async fn execute_reporting(client: &McpClient, name: &str, arguments: Value) -> ToolResult {
    match client.execute_tool(name, arguments).await {
        Ok(result) => result,
        Err(err) => {
            warn!(tool = %name, kind = err.kind(), error = %err, "tool call failed");
            ToolResult::from_error(err.to_string())
        }
    }
}

/// A server that does not implement the method has nothing to list.
fn unless_unsupported<T: Default>(outcome: Result<T, RpcError>) -> Result<T, RpcError> {
    match outcome {
        Err(RpcError::Protocol {
            code: METHOD_NOT_FOUND,
            ..
        }) => Ok(T::default()),
        other => other,
    }
}

pub async fn run_demo(client: &McpClient) -> Result<(), RpcError> {
    connect(client).await?;

    let tools = client.list_tools().await?;
    println!("\nDiscovered {} tools", tools.len());
    print!("{}", render_tools(&tools, Some(LISTING_LIMIT)));

    match tools.first() {
        Some(tool) => {
            let arguments = Value::Object(Default::default());
            let result = execute_reporting(client, &tool.name, arguments).await;
            print!("{}", render_tool_result(&tool.name, &result));
        }
        None => println!("\nNo tools available for execution"),
    }

    let resources = unless_unsupported(client.list_resources().await)?;
    println!("\nAvailable resources:");
    print!("{}", render_resources(&resources, Some(LISTING_LIMIT)));

    if let Some(resource) = resources.first() {
        let contents = client.read_resource(&resource.uri).await?;
        println!("\nResource content preview: {}", preview(&contents));
    }

    println!("\nAll demonstrations completed");
    Ok(())
}

pub async fn show_tools(client: &McpClient) -> Result<(), RpcError> {
    connect(client).await?;
    let tools = client.list_tools().await?;
    print!("{}", render_tools(&tools, None));
    Ok(())
}

pub async fn show_resources(client: &McpClient) -> Result<(), RpcError> {
    connect(client).await?;
    let resources = client.list_resources().await?;
    print!("{}", render_resources(&resources, None));
    Ok(())
}

pub async fn show_prompts(client: &McpClient) -> Result<(), RpcError> {
    connect(client).await?;
    let prompts = client.list_prompts().await?;
    print!("{}", render_prompts(&prompts));
    Ok(())
}

/// Unlike the demo, a failing call here is returned so the process exits non-zero.
pub async fn call_tool(client: &McpClient, name: &str, arguments: Value) -> Result<(), RpcError> {
    connect(client).await?;
    let result = client.execute_tool(name, arguments).await?;
    print!("{}", render_tool_result(name, &result));
    Ok(())
}

pub async fn read_resource(client: &McpClient, uri: &str) -> Result<(), RpcError> {
    connect(client).await?;
    let contents = client.read_resource(uri).await?;
    println!("{}", pretty(&Value::Array(contents.contents)));
    Ok(())
}

pub fn render_tools(tools: &[ToolDescriptor], limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(tools.len());
    let mut out = String::new();
    for tool in tools.iter().take(shown) {
        match &tool.description {
            Some(description) => out.push_str(&format!("  - {}: {}\n", tool.name, description)),
            None => out.push_str(&format!("  - {}\n", tool.name)),
        }
    }
    if tools.len() > shown {
        out.push_str(&format!("  ... and {} more\n", tools.len() - shown));
    }
    out
}

pub fn render_resources(resources: &[ResourceDescriptor], limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(resources.len());
    let mut out = String::new();
    for resource in resources.iter().take(shown) {
        let name = if resource.name.is_empty() {
            resource.uri.as_str()
        } else {
            resource.name.as_str()
        };
        out.push_str(&format!("  - {}: {}\n", name, resource.uri));
    }
    if resources.is_empty() {
        out.push_str("  (none)\n");
    }
    out
}

pub fn render_prompts(prompts: &[PromptDescriptor]) -> String {
    let mut out = String::new();
    for prompt in prompts {
        out.push_str(&format!(
            "  - {} ({} arguments){}\n",
            prompt.name,
            prompt.arguments.len(),
            prompt
                .description
                .as_deref()
                .map(|description| format!(": {description}"))
                .unwrap_or_default()
        ));
    }
    if prompts.is_empty() {
        out.push_str("  (none)\n");
    }
    out
}

pub fn render_tool_result(name: &str, result: &ToolResult) -> String {
    let content = pretty(&Value::Array(result.content.clone()));
    if result.is_error {
        format!("\nTool execution failed: {name}\n{content}\n")
    } else {
        format!("\nTool execution successful: {name}\nResult: {content}\n")
    }
}

fn preview(contents: &ResourceContents) -> String {
    let text = match contents.first_text() {
        Some(text) => text.to_string(),
        None => Value::Array(contents.contents.clone()).to_string(),
    };
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

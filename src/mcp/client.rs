//! The RPC exchange client
//!
//! One `McpClient` owns an endpoint and a transport. Every operation is a single
//! buffered POST/response pair; nothing is retried and no session state is kept
//! beyond the request id counter.

use std::{
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
    time::Instant,
};

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::domain::{
    handshake::{InitializeParams, ServerInfo},
    resources::{
        prompts_from_result, read_params, resources_from_result, PromptDescriptor,
        ResourceContents, ResourceDescriptor,
    },
    tools::{call_params, tools_from_result, ToolDescriptor, ToolResult},
};
use crate::errors::RpcError;
use crate::http::transport::{HttpTransport, ReqwestTransport};
use crate::logging::record_exchange;
use crate::mcp::rpc::{decode_response, RequestEnvelope, ResponseEnvelope};

pub struct McpClient {
    endpoint: Url,
    transport: Arc<dyn HttpTransport>,
    next_id: AtomicI64,
}

impl McpClient {
    /// Validates the endpoint and builds a reqwest-backed client. No request is sent.
    pub fn new(config: ClientConfig) -> Result<Self, RpcError> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let transport = ReqwestTransport::new(config.timeout, config.headers)?;
        Ok(Self::from_parts(endpoint, Arc::new(transport)))
    }

    /// Like [`McpClient::new`] but over a caller-supplied transport; timeout and
    /// headers from `config` are the transport's business.
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, RpcError> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        Ok(Self::from_parts(endpoint, transport))
    }

    fn from_parts(endpoint: Url, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint,
            transport,
            next_id: AtomicI64::new(1),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn fresh_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends one request and returns the decoded envelope, which may carry a remote error.
    pub async fn exchange(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<ResponseEnvelope, RpcError> {
        let id = self.fresh_id();
        let started_at = Instant::now();
        let body = RequestEnvelope::new(id, method, params).to_body()?;

        let reply = match self.transport.post_json(&self.endpoint, body).await {
            Ok(reply) => reply,
            Err(err) => {
                record_exchange(method, id, err.status(), "", err.kind(), started_at);
                return Err(err);
            }
        };

        let status = reply.status();
        let content_type = reply.content_type().unwrap_or_default().to_string();

        if !status.is_success() {
            let err = RpcError::http_status(status.as_u16(), status.canonical_reason());
            record_exchange(
                method,
                id,
                Some(status.as_u16()),
                &content_type,
                err.kind(),
                started_at,
            );
            return Err(err);
        }

        let decoded = match reply.text().await {
            Ok(text) => decode_response(&content_type, &text),
            Err(err) => Err(err),
        };

        let outcome = match &decoded {
            Ok(envelope) if envelope.is_error() => "remote_error",
            Ok(_) => "success",
            Err(err) => err.kind(),
        };
        record_exchange(
            method,
            id,
            Some(status.as_u16()),
            &content_type,
            outcome,
            started_at,
        );

        decoded
    }

    /// Sends one request and returns its `result` unchanged.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
        self.exchange(method, params).await?.into_result()
    }

    pub async fn initialize(
        &self,
        client_name: &str,
        client_version: &str,
    ) -> Result<ServerInfo, RpcError> {
        let params = InitializeParams::new(client_name, client_version).to_value()?;
        let result = self.call("initialize", Some(params)).await?;
        let info = ServerInfo::from_result(result)?;

        debug!(
            server = %info.name,
            protocol_version = info.protocol_version.as_deref().unwrap_or_default(),
            "initialized mcp session"
        );
        Ok(info)
    }

    pub async fn ping(&self) -> Result<(), RpcError> {
        self.call("ping", None).await.map(|_| ())
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, RpcError> {
        let result = self.call("tools/list", None).await?;
        tools_from_result(&result)
    }

    pub async fn execute_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, RpcError> {
        let result = self
            .call("tools/call", Some(call_params(name, arguments)))
            .await?;
        ToolResult::from_result(&result)
    }

    pub async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>, RpcError> {
        let result = self.call("resources/list", None).await?;
        resources_from_result(&result)
    }

    pub async fn read_resource(&self, uri: &str) -> Result<ResourceContents, RpcError> {
        let result = self.call("resources/read", Some(read_params(uri))).await?;
        ResourceContents::from_result(&result)
    }

    pub async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>, RpcError> {
        let result = self.call("prompts/list", None).await?;
        prompts_from_result(&result)
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, RpcError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RpcError::configuration("endpoint must not be empty"));
    }

    Url::parse(trimmed)
        .map_err(|err| RpcError::configuration(format!("endpoint is not an absolute url: {err}")))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::http::transport::HttpReply;

    use super::*;

    struct CannedReply {
        status: StatusCode,
        content_type: Option<&'static str>,
        body: String,
        reads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HttpReply for CannedReply {
        fn status(&self) -> StatusCode {
            self.status
        }

        fn content_type(&self) -> Option<&str> {
            self.content_type
        }

        async fn text(self: Box<Self>) -> Result<String, RpcError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.body)
        }
    }

    struct MockTransport {
        status: StatusCode,
        content_type: Option<&'static str>,
        body: String,
        reads: Arc<AtomicUsize>,
        sent: Mutex<Vec<Value>>,
    }

    impl MockTransport {
        fn new(status: StatusCode, content_type: Option<&'static str>, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                content_type,
                body: body.to_string(),
                reads: Arc::new(AtomicUsize::new(0)),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn json(body: Value) -> Arc<Self> {
            Self::new(StatusCode::OK, Some("application/json"), &body.to_string())
        }

        fn sent(&self) -> Vec<Value> {
            self.sent.lock().expect("sent lock").clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn post_json(
            &self,
            _endpoint: &Url,
            body: Vec<u8>,
        ) -> Result<Box<dyn HttpReply>, RpcError> {
            let request: Value = serde_json::from_slice(&body).expect("request is json");
            self.sent.lock().expect("sent lock").push(request);

            Ok(Box::new(CannedReply {
                status: self.status,
                content_type: self.content_type,
                body: self.body.clone(),
                reads: self.reads.clone(),
            }))
        }
    }

    struct UnreachableTransport;

    #[async_trait]
    impl HttpTransport for UnreachableTransport {
        async fn post_json(
            &self,
            _endpoint: &Url,
            _body: Vec<u8>,
        ) -> Result<Box<dyn HttpReply>, RpcError> {
            Err(RpcError::transport("connection refused"))
        }
    }

    fn client(transport: Arc<dyn HttpTransport>) -> McpClient {
        let config = ClientConfig::new("https://mcp.example.com/mcp/token-123");
        McpClient::with_transport(&config, transport).expect("valid endpoint")
    }

    #[test]
    fn empty_endpoint_is_a_configuration_error() {
        let err = McpClient::new(ClientConfig::new("  ")).err().expect("empty endpoint");
        assert!(matches!(err, RpcError::Configuration { .. }));

        let transport = MockTransport::json(json!({}));
        let err = McpClient::with_transport(&ClientConfig::new(""), transport.clone())
            .err()
            .expect("empty endpoint");
        assert!(matches!(err, RpcError::Configuration { .. }));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn relative_endpoint_is_a_configuration_error() {
        let err = McpClient::new(ClientConfig::new("/mcp")).err().expect("relative endpoint");
        assert!(matches!(err, RpcError::Configuration { .. }));
    }

    #[tokio::test]
    async fn json_result_is_returned_unchanged() {
        let transport = MockTransport::json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"nested": {"values": [1, 2, 3]}, "flag": null}
        }));
        let result = client(transport)
            .call("custom/method", Some(json!({"a": 1})))
            .await
            .expect("call succeeds");

        assert_eq!(result, json!({"nested": {"values": [1, 2, 3]}, "flag": null}));
    }

    #[tokio::test]
    async fn event_stream_result_matches_json_mode() {
        let transport = MockTransport::new(
            StatusCode::OK,
            Some("text/event-stream"),
            "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"ok\":true}}\n\n",
        );
        let result = client(transport).call("tools/list", None).await.expect("call succeeds");
        assert_eq!(result, json!({"ok": true}));
    }

    #[tokio::test]
    async fn remote_error_is_a_protocol_error() {
        let transport = MockTransport::json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Method not found"}
        }));
        let client = client(transport);

        let envelope = client.exchange("nope", None).await.expect("exchange decodes");
        assert!(envelope.is_error());

        let err = client.call("nope", None).await.expect_err("protocol error");
        match err {
            RpcError::Protocol { code, message, .. } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_short_circuits_before_body() {
        for status in [StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let transport = MockTransport::new(status, Some("application/json"), "not even json");
            let err = client(transport.clone())
                .call("tools/list", None)
                .await
                .expect_err("status error");

            assert!(matches!(err, RpcError::Transport { .. }));
            assert_eq!(err.status(), Some(status.as_u16()));
            assert_eq!(transport.reads.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let err = client(Arc::new(UnreachableTransport))
            .list_tools()
            .await
            .expect_err("transport error");
        assert!(matches!(err, RpcError::Transport { status: None, .. }));
    }

    #[tokio::test]
    async fn omitted_params_are_not_serialized() {
        let transport = MockTransport::json(json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
        client(transport.clone())
            .call("tools/list", None)
            .await
            .expect("call succeeds");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["jsonrpc"], "2.0");
        assert_eq!(sent[0]["method"], "tools/list");
        assert!(sent[0].as_object().expect("object").get("params").is_none());
    }

    #[tokio::test]
    async fn execute_tool_unwraps_content() {
        let transport = MockTransport::json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "..."}]}
        }));
        let result = client(transport.clone())
            .execute_tool("list_connectors_alloy", json!({}))
            .await
            .expect("tool succeeds");

        assert_eq!(result.content, vec![json!({"type": "text", "text": "..."})]);
        assert!(!result.is_error);

        let sent = transport.sent();
        assert_eq!(sent[0]["method"], "tools/call");
        assert_eq!(
            sent[0]["params"],
            json!({"name": "list_connectors_alloy", "arguments": {}})
        );
    }

    #[tokio::test]
    async fn execute_tool_without_content_is_empty() {
        let transport = MockTransport::json(json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
        let result = client(transport)
            .execute_tool("noop", json!({}))
            .await
            .expect("tool succeeds");
        assert!(result.content.is_empty());
    }

    #[tokio::test]
    async fn ids_increase_per_request() {
        let transport = MockTransport::json(json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
        let client = client(transport.clone());

        client.ping().await.expect("ping");
        client.list_tools().await.expect("tools");
        client.list_prompts().await.expect("prompts");

        let ids: Vec<i64> = transport
            .sent()
            .iter()
            .map(|request| request["id"].as_i64().expect("integer id"))
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn initialize_sends_handshake_params() {
        let transport = MockTransport::json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"protocolVersion": "2024-11-05", "capabilities": {}}
        }));
        let info = client(transport.clone())
            .initialize("alloy-mcp-client", "0.1.0")
            .await
            .expect("initialize");

        assert_eq!(info.name, "Unknown");
        let sent = transport.sent();
        assert_eq!(sent[0]["method"], "initialize");
        assert_eq!(sent[0]["params"]["protocolVersion"], "2024-11-05");
        assert_eq!(sent[0]["params"]["clientInfo"]["name"], "alloy-mcp-client");
    }

    #[tokio::test]
    async fn read_resource_sends_uri() {
        let transport = MockTransport::json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"contents": [{"uri": "alloy://integrations", "text": "catalog"}]}
        }));
        let contents = client(transport.clone())
            .read_resource("alloy://integrations")
            .await
            .expect("read");

        assert_eq!(contents.first_text(), Some("catalog"));
        assert_eq!(transport.sent()[0]["params"], json!({"uri": "alloy://integrations"}));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let transport =
            MockTransport::new(StatusCode::OK, Some("application/json"), "{\"jsonrpc\":");
        let err = client(transport).list_resources().await.expect_err("decode error");
        assert!(matches!(err, RpcError::Decode { .. }));
    }
}

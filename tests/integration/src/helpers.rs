//! Test helpers for integration tests
//!
//! Spawns test servers, makes HTTP requests and speaks the gateway protocol.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use chill_common::AppConfig;
use chill_db::PoolConfig;
use chill_gateway::GatewayState;
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::fixtures::TEST_JWT_SECRET;

/// How long to wait for a gateway frame
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind an ephemeral local port
async fn local_listener() -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

// ============================================================================
// REST API
// ============================================================================

/// Running API server
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start an API server with the test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start an API server with a custom configuration
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = chill_api::create_app_state(config).await?;
        let app = chill_api::create_app(state)?;

        let (listener, addr) = local_listener().await?;
        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body and optional bearer token
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Make a DELETE request with bearer token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).bearer_auth(token).send().await?)
    }

    /// Upload a file in the `image` multipart field
    pub async fn upload(
        &self,
        token: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("image", part);
        let url = format!("{}/api/v1/upload/image", self.base_url());
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?)
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// Running gateway server
pub struct TestGateway {
    pub addr: SocketAddr,
    pub state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Start a gateway with the test configuration
    pub async fn start() -> Result<Self> {
        let config = test_config()?;

        // The gateway never migrates on its own
        let pool = chill_db::create_pool(&PoolConfig::from(&config.database)).await?;
        chill_db::run_migrations(&pool, &config.database.migrations_dir).await?;
        pool.close().await;

        let state = chill_gateway::create_gateway_state(config).await?;
        let app = chill_gateway::create_app(state.clone());

        let (listener, addr) = local_listener().await?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Open a client connection and consume Hello
    pub async fn connect(&self) -> Result<GatewayClient> {
        GatewayClient::connect(self.addr).await
    }
}

/// Minimal gateway protocol client
pub struct GatewayClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_nonce: u64,
    /// Dispatches that arrived while waiting for an ack
    pending: VecDeque<Value>,
    /// Heartbeat interval announced by Hello
    pub heartbeat_interval: u64,
}

impl GatewayClient {
    /// Connect and read the Hello frame
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (ws, _) = connect_async(format!("ws://{addr}/gateway")).await?;
        let mut client = Self {
            ws,
            next_nonce: 1,
            pending: VecDeque::new(),
            heartbeat_interval: 0,
        };

        let hello = client.next_frame().await?;
        if hello["op"] != 10 {
            bail!("expected Hello, got {hello}");
        }
        client.heartbeat_interval = hello["d"]["heartbeat_interval"]
            .as_u64()
            .ok_or_else(|| anyhow!("Hello without heartbeat_interval"))?;
        Ok(client)
    }

    /// Send a raw frame
    pub async fn send(&mut self, frame: Value) -> Result<()> {
        self.ws.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Send op 1 and wait for op 11
    pub async fn heartbeat(&mut self) -> Result<()> {
        self.send(json!({ "op": 1 })).await?;
        loop {
            let frame = self.next_frame().await?;
            match frame["op"].as_u64() {
                Some(11) => return Ok(()),
                Some(0) => self.pending.push_back(frame),
                _ => bail!("unexpected frame {frame}"),
            }
        }
    }

    /// Send a Request and return the data of its Ack
    pub async fn request(&mut self, operation: &str, data: Value) -> Result<Value> {
        let nonce = self.next_nonce;
        self.next_nonce += 1;
        self.send(json!({ "op": 2, "t": operation, "n": nonce, "d": data }))
            .await?;

        loop {
            let frame = self.next_frame().await?;
            match frame["op"].as_u64() {
                Some(3) if frame["n"] == nonce => return Ok(frame["d"].clone()),
                Some(0) => self.pending.push_back(frame),
                _ => {}
            }
        }
    }

    /// Wait for the next dispatch named `event`, skipping others
    pub async fn next_event(&mut self, event: &str) -> Result<Value> {
        while let Some(frame) = self.pending.pop_front() {
            if frame["t"] == event {
                return Ok(frame["d"].clone());
            }
        }
        loop {
            let frame = self.next_frame().await?;
            if frame["op"] == 0 && frame["t"] == event {
                return Ok(frame["d"].clone());
            }
        }
    }

    /// Read frames until the server closes, returning the close code
    pub async fn expect_close(&mut self) -> Result<Option<u16>> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for close"))?;
            match msg {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| u16::from(f.code))),
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Ok(None),
            }
        }
    }

    /// Close the socket from the client side
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Value> {
        loop {
            let msg = tokio::time::timeout(FRAME_TIMEOUT, self.ws.next())
                .await
                .map_err(|_| anyhow!("timed out waiting for a frame"))?
                .ok_or_else(|| anyhow!("connection closed"))??;
            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(frame) => bail!("connection closed: {frame:?}"),
                _ => {}
            }
        }
    }
}

// ============================================================================
// Environment and assertions
// ============================================================================

/// Configuration from the environment with test overrides
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow!("Config error: {e}"))?;
    config.jwt.secret = Some(TEST_JWT_SECRET.to_string());
    config.rate_limit.burst = 10_000;
    config.storage.upload_dir = None;
    config.storage.public_base_url = None;
    Ok(config)
}

/// True when a database is available for end-to-end tests
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

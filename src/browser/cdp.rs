use crate::browser::launcher::{build_command, LaunchOptions};
use crate::error::{Result, SuiteError};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

type WsSink = futures::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    WsMessage,
>;

type PendingResponses = Arc<Mutex<HashMap<u32, oneshot::Sender<Value>>>>;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_RETRIES: u32 = 30;

/// Set on the current document before navigating; a fresh document does not carry it.
const NAV_MARKER: &str = "window.__periplusNavigating";

/// CDP client over a raw WebSocket to the first page target of a Chrome we launched.
pub struct CDPClient {
    ws_tx: Option<Arc<Mutex<WsSink>>>,
    responses: PendingResponses,
    msg_id: Arc<Mutex<u32>>,
    chrome: Option<Child>,
    user_data_dir: Option<PathBuf>,
    cdp_port: u16,
}

impl CDPClient {
    /// Launch Chrome with remote debugging enabled and connect to its page target.
    pub async fn launch(chrome_path: &Path, options: &LaunchOptions) -> Result<Self> {
        std::fs::create_dir_all(&options.user_data_dir)?;

        let mut cmd = build_command(chrome_path, options);
        tracing::info!("Launching Chrome: {:?}", cmd);
        let child = cmd
            .spawn()
            .map_err(|e| SuiteError::Browser(format!("Failed to launch Chrome: {}", e)))?;

        let mut client = Self {
            ws_tx: None,
            responses: Arc::new(Mutex::new(HashMap::new())),
            msg_id: Arc::new(Mutex::new(1)),
            chrome: Some(child),
            user_data_dir: Some(options.user_data_dir.clone()),
            cdp_port: options.cdp_port,
        };

        if let Err(e) = client.connect().await {
            let _ = client.close().await;
            return Err(e);
        }
        Ok(client)
    }

    /// Poll `/json/list` until a page target shows up, then attach to it.
    async fn connect(&mut self) -> Result<()> {
        let list_url = format!("http://127.0.0.1:{}/json/list", self.cdp_port);
        let mut last_error = String::new();

        for attempt in 1..=CONNECT_RETRIES {
            tokio::time::sleep(Duration::from_millis(500)).await;

            match self.page_target_ws_url(&list_url).await {
                Ok(ws_url) => {
                    tracing::info!("Connecting to page target WebSocket: {}", ws_url);
                    match connect_async(ws_url.as_str()).await {
                        Ok((ws_stream, _)) => {
                            let (tx, rx) = ws_stream.split();
                            self.ws_tx = Some(Arc::new(Mutex::new(tx)));
                            spawn_reader(rx, Arc::clone(&self.responses));

                            self.send_command("Page.enable", json!({})).await?;
                            self.send_command("Runtime.enable", json!({})).await?;
                            tracing::info!("CDP client connected on port {}", self.cdp_port);
                            return Ok(());
                        }
                        Err(e) => last_error = format!("Failed to connect WebSocket: {}", e),
                    }
                }
                Err(e) => last_error = e,
            }

            tracing::debug!("Retry {}/{}: {}", attempt, CONNECT_RETRIES, last_error);
        }

        Err(SuiteError::Browser(format!(
            "Failed to connect to Chrome after {} retries: {}",
            CONNECT_RETRIES, last_error
        )))
    }

    async fn page_target_ws_url(&self, list_url: &str) -> std::result::Result<String, String> {
        let response = reqwest::get(list_url)
            .await
            .map_err(|e| format!("Connection error: {}", e))?;
        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()));
        }
        let targets: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse targets response: {}", e))?;

        targets
            .as_array()
            .and_then(|arr| {
                arr.iter()
                    .find(|t| t.get("type").and_then(Value::as_str) == Some("page"))
            })
            .ok_or_else(|| "No page target found".to_string())?
            .get("webSocketDebuggerUrl")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| "No webSocketDebuggerUrl in page target".to_string())
    }

    /// Send a CDP command and return its `result` object.
    pub async fn send_command(&self, method: &str, params: Value) -> Result<Value> {
        let tx = self
            .ws_tx
            .as_ref()
            .ok_or_else(|| SuiteError::Browser("WebSocket not connected".to_string()))?;

        let (id, rx) = {
            let mut msg_id = self.msg_id.lock().await;
            let id = *msg_id;
            *msg_id += 1;

            let (tx, rx) = oneshot::channel();
            self.responses.lock().await.insert(id, tx);
            (id, rx)
        };

        let command = json!({
            "id": id,
            "method": method,
            "params": params
        });

        let sent = tx
            .lock()
            .await
            .send(WsMessage::Text(command.to_string()))
            .await;
        if let Err(e) = sent {
            self.responses.lock().await.remove(&id);
            return Err(SuiteError::Browser(format!("Failed to send {}: {}", method, e)));
        }

        let response = match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                return Err(SuiteError::Browser("Response channel closed".to_string()));
            }
            Err(_) => {
                self.responses.lock().await.remove(&id);
                return Err(SuiteError::Browser(format!("Command timeout: {}", method)));
            }
        };

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(SuiteError::Cdp(format!("{}: {}", method, message)));
        }

        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Evaluate a JS expression in the page and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value> {
        let result = self
            .send_command(
                "Runtime.evaluate",
                json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true
                }),
            )
            .await?;

        if let Some(details) = result.get("exceptionDetails") {
            let text = details
                .get("exception")
                .and_then(|e| e.get("description"))
                .and_then(Value::as_str)
                .or_else(|| details.get("text").and_then(Value::as_str))
                .unwrap_or("exception");
            return Err(SuiteError::Cdp(format!("JavaScript error: {}", text)));
        }

        Ok(result
            .get("result")
            .and_then(|r| r.get("value"))
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Navigate to a URL and wait until the new document has finished loading.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        match self.evaluate(&format!("{} = true", NAV_MARKER)).await {
            Ok(_) => {}
            // No context to mark: the old document is already being replaced
            Err(SuiteError::Cdp(e)) => tracing::debug!("Navigation marker not set: {}", e),
            Err(e) => return Err(e),
        }

        let result = self
            .send_command("Page.navigate", json!({ "url": url }))
            .await?;
        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            return Err(SuiteError::Browser(format!(
                "Navigation to {} failed: {}",
                url, error
            )));
        }

        let ready = format!(
            "!{} && document.readyState === 'complete'",
            NAV_MARKER
        );
        let start = Instant::now();
        loop {
            // The execution context is torn down mid-navigation; treat errors as "not yet".
            match self.evaluate(&ready).await {
                Ok(Value::Bool(true)) => break,
                Ok(_) => {}
                Err(SuiteError::Cdp(e)) => tracing::trace!("Page not ready: {}", e),
                Err(e) => return Err(e),
            }
            if start.elapsed() > PAGE_LOAD_TIMEOUT {
                return Err(SuiteError::Timeout(format!("page load of {}", url)));
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tracing::info!("Navigated to: {}", url);
        Ok(())
    }

    /// Capture the viewport as base64-encoded PNG.
    pub async fn screenshot(&self) -> Result<String> {
        let result = self
            .send_command("Page.captureScreenshot", json!({ "format": "png" }))
            .await?;

        result
            .get("data")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SuiteError::Cdp("Failed to capture screenshot".to_string()))
    }

    /// Close the connection, stop Chrome and remove its profile directory.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(tx) = self.ws_tx.take() {
            let _ = tx.lock().await.close().await;
        }
        self.shutdown_process();
        tracing::info!("CDP client closed on port {}", self.cdp_port);
        Ok(())
    }

    fn shutdown_process(&mut self) {
        if let Some(mut child) = self.chrome.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(dir) = self.user_data_dir.take() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

impl Drop for CDPClient {
    fn drop(&mut self) {
        // Chrome must not outlive a suite that panicked before close()
        self.shutdown_process();
    }
}

/// Route responses from the WebSocket to the callers waiting on them.
fn spawn_reader<S>(mut rx: S, responses: PendingResponses)
where
    S: futures::Stream<Item = std::result::Result<WsMessage, tokio_tungstenite::tungstenite::Error>>
        + Unpin
        + Send
        + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => {
                    tracing::trace!("WS received: {}", text.chars().take(100).collect::<String>());
                    let Ok(json) = serde_json::from_str::<Value>(&text) else {
                        continue;
                    };
                    // Events carry no id and are not awaited by anyone
                    if let Some(id) = json.get("id").and_then(Value::as_u64) {
                        if let Some(sender) = responses.lock().await.remove(&(id as u32)) {
                            let _ = sender.send(json);
                        }
                    }
                }
                Ok(WsMessage::Close(_)) => {
                    tracing::debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    tracing::debug!("WebSocket error: {:?}", e);
                    break;
                }
                _ => {}
            }
        }
        // Fail every pending command instead of letting it run into the timeout
        responses.lock().await.clear();
    });
}

//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashboard_client::auth::MemoryTokenStore;
use dashboard_client::config::ApiConfig;
use dashboard_client::http::{
    ApiClient, RawResponse, RequestDescriptor, Transport, TransportError, TransportErrorKind,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Semaphore};
use url::Url;

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Start a programmable backend on an ephemeral port.
///
/// `f` decides `(status, body)` for each request. Every request is also
/// forwarded on the returned channel.
pub async fn start_programmable_backend<F, Fut>(
    f: F,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>)
where
    F: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let _ = tx.send(request.clone());
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            204 => "204 No Content",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            501 => "501 Not Implemented",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    Some(CapturedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// What a transport double answers for one path.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(u16, String),
    Fail(TransportErrorKind, String),
}

/// Transport double that answers per path.
///
/// The first `open_calls` calls resolve immediately; later calls wait
/// until `release()` is called. Unrouted paths answer 404.
pub struct GatedTransport {
    routes: std::sync::Mutex<HashMap<String, Reply>>,
    open_calls: usize,
    calls: AtomicUsize,
    blocked: AtomicUsize,
    gate: Semaphore,
}

impl GatedTransport {
    pub fn new(open_calls: usize) -> Arc<Self> {
        Arc::new(Self {
            routes: std::sync::Mutex::new(HashMap::new()),
            open_calls,
            calls: AtomicUsize::new(0),
            blocked: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        })
    }

    /// Never blocks.
    pub fn open() -> Arc<Self> {
        Self::new(usize::MAX)
    }

    pub fn route(&self, path: &str, reply: Reply) {
        self.routes.lock().unwrap().insert(path.to_string(), reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn blocked(&self) -> usize {
        self.blocked.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        self.gate.add_permits(1024);
    }

    /// Wait until `n` calls are parked at the gate.
    pub async fn wait_blocked(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.blocked() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("calls never reached the gate");
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn execute(
        &self,
        url: Url,
        _request: &RequestDescriptor,
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n >= self.open_calls {
            self.blocked.fetch_add(1, Ordering::SeqCst);
            let _permit = self.gate.acquire().await;
        }

        let reply = self.routes.lock().unwrap().get(url.path()).cloned();
        match reply {
            Some(Reply::Respond(status, body)) => Ok(RawResponse { status, body }),
            Some(Reply::Fail(kind, message)) => Err(TransportError::new(kind, message)),
            None => Ok(RawResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Client over a transport double, with an in-memory credential store.
pub fn client_with(transport: Arc<dyn Transport>) -> ApiClient {
    let config = ApiConfig {
        base_url: "http://status.test".into(),
        ..ApiConfig::default()
    };
    ApiClient::new(&config, false, Arc::new(MemoryTokenStore::new()), transport).unwrap()
}

/// Client over real HTTP to `addr`.
pub fn http_client(addr: SocketAddr, tokens: Arc<dyn dashboard_client::auth::TokenStore>) -> ApiClient {
    let config = ApiConfig {
        base_url: format!("http://{}", addr),
        timeout_ms: 2_000,
        client_name: "integration-tests".into(),
        ..ApiConfig::default()
    };
    ApiClient::new(
        &config,
        true,
        tokens,
        Arc::new(dashboard_client::http::ReqwestTransport::new()),
    )
    .unwrap()
}

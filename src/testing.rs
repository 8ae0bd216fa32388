// src/testing.rs

//! In-memory collaborators for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Notice, Snapshot};
use crate::services::{NoticeFeed, WebhookResponse, WebhookTransport};
use crate::storage::SnapshotStore;

/// A notice with a predictable url and date.
pub fn notice(id: &str, title: &str) -> Notice {
    Notice::new(
        id,
        title,
        format!("https://maplestory.nexon.com/News/Notice/{id}"),
        "2024-05-01T10:00+09:00",
    )
}

pub fn status(code: u16) -> WebhookResponse {
    WebhookResponse {
        status: code,
        body: format!("status {code}"),
    }
}

/// Replies with scripted responses in order (204 once exhausted) and
/// records every body.
#[derive(Default)]
pub struct ScriptedWebhook {
    replies: Mutex<Vec<Result<WebhookResponse>>>,
    bodies: Mutex<Vec<String>>,
}

impl ScriptedWebhook {
    pub fn replying(replies: Vec<Result<WebhookResponse>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            bodies: Mutex::default(),
        })
    }

    /// Every posted body, parsed.
    pub fn bodies(&self) -> Vec<serde_json::Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .map(|b| serde_json::from_str(b).unwrap())
            .collect()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedWebhook {
    async fn post(&self, body: String) -> Result<WebhookResponse> {
        self.bodies.lock().unwrap().push(body);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(status(204))
        } else {
            replies.remove(0)
        }
    }
}

/// Feed returning a fixed snapshot, or a fetch error.
pub struct StaticFeed {
    snapshot: Option<Snapshot>,
}

impl StaticFeed {
    pub fn with(notices: Vec<Notice>) -> Arc<Self> {
        Arc::new(Self {
            snapshot: Some(Snapshot::new(notices)),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { snapshot: None })
    }
}

#[async_trait]
impl NoticeFeed for StaticFeed {
    async fn fetch(&self) -> Result<Snapshot> {
        self.snapshot
            .clone()
            .ok_or_else(|| AppError::fetch("API request failed: 503 Service Unavailable"))
    }
}

/// Snapshot store held in memory, with optional write failure.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
    saves: Mutex<usize>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(notices: Vec<Notice>) -> Arc<Self> {
        Arc::new(Self {
            snapshot: Mutex::new(Some(Snapshot::new(notices))),
            ..Self::default()
        })
    }

    pub fn read_only(notices: Vec<Notice>) -> Arc<Self> {
        Arc::new(Self {
            snapshot: Mutex::new(Some(Snapshot::new(notices))),
            fail_saves: true,
            ..Self::default()
        })
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_saves {
            return Err(AppError::persistence("memory", "read-only"));
        }
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Local HTTP endpoint that answers every request with one canned response
/// and records the raw requests it received.
pub struct CannedServer {
    pub url: Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// `status` is a status line tail such as `"503 Service Unavailable"`.
    pub async fn start(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                seen.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: text/plain; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            url: Url::parse(&format!("http://{addr}/")).unwrap(),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one request: headers plus a `content-length` body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

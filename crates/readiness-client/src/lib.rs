//! Readiness Client Library
//!
//! Talks to the readiness daemon over its Unix socket. Calls are one-shot
//! connections unless [`ReadinessClient::subscribe_notifications`] has opened a
//! persistent connection, in which case requests share it.

pub mod protocol;

pub use protocol::{Notification, Request, RequestId, Response, ResponseError};

use anyhow::Result;
use protocol::Incoming;
use readiness_core::models::{
    AnalysisRequest, AnalysisResult, Assignment, Config, PanelSnapshot, Settings,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, WriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{Mutex, RwLock, mpsc};

type PendingResponses = Arc<RwLock<HashMap<i64, mpsc::Sender<Response>>>>;

/// Persistent connection state
struct PersistentConnection {
    writer: Arc<Mutex<BufWriter<WriteHalf<UnixStream>>>>,
    pending_responses: PendingResponses,
}

/// Readiness daemon client
pub struct ReadinessClient {
    socket_path: String,
    request_counter: AtomicI64,
    persistent_conn: Arc<Mutex<Option<PersistentConnection>>>,
}

impl ReadinessClient {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
            request_counter: AtomicI64::new(1),
            persistent_conn: Arc::new(Mutex::new(None)),
        }
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    /// Open a persistent connection and return a receiver for daemon notifications
    pub async fn subscribe_notifications(&self) -> Result<mpsc::Receiver<Notification>> {
        let mut conn_lock = self.persistent_conn.lock().await;

        if conn_lock.is_some() {
            anyhow::bail!("Already subscribed to notifications");
        }

        let stream = self.connect().await?;
        let (read_half, write_half) = tokio::io::split(stream);
        let writer = Arc::new(Mutex::new(BufWriter::new(write_half)));

        let (notif_tx, notif_rx) = mpsc::channel::<Notification>(100);
        let pending_responses: PendingResponses = Arc::new(RwLock::new(HashMap::new()));

        // Background reader: routes notifications to the channel, responses to their caller
        let pending = pending_responses.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => match Incoming::parse(&line) {
                        Some(Incoming::Notification(notification)) => {
                            let _ = notif_tx.send(notification).await;
                        }
                        Some(Incoming::Response(response)) => {
                            if let RequestId::Number(id) = response.id {
                                let pending = pending.read().await;
                                if let Some(tx) = pending.get(&id) {
                                    let _ = tx.send(response).await;
                                }
                            }
                        }
                        None => tracing::debug!("Ignoring unparseable line from daemon"),
                    },
                }
            }
            tracing::debug!("Persistent connection closed");
        });

        *conn_lock = Some(PersistentConnection {
            writer,
            pending_responses,
        });

        Ok(notif_rx)
    }

    /// Send a request and receive its result.
    ///
    /// Uses the persistent connection when one is open; otherwise creates a one-shot connection.
    pub async fn call(&self, method: impl Into<String>, params: Option<Value>) -> Result<Value> {
        let conn_lock = self.persistent_conn.lock().await;

        if let Some(conn) = conn_lock.as_ref() {
            let id = self.next_id();
            let request = Request::new(method, params, RequestId::Number(id));

            let (tx, mut rx) = mpsc::channel::<Response>(1);
            conn.pending_responses.write().await.insert(id, tx);

            {
                let mut writer = conn.writer.lock().await;
                write_frame(&mut *writer, &request).await?;
            }

            let response = rx.recv().await;
            conn.pending_responses.write().await.remove(&id);

            return response
                .ok_or_else(|| anyhow::anyhow!("No response received"))?
                .into_result();
        }

        drop(conn_lock);
        self.call_oneshot(method, params).await
    }

    async fn call_oneshot(&self, method: impl Into<String>, params: Option<Value>) -> Result<Value> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = tokio::io::split(stream);

        let request = Request::new(method, params, RequestId::Number(self.next_id()));
        write_frame(&mut write_half, &request).await?;

        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            anyhow::bail!("Daemon closed the connection without responding");
        }

        let response: Response = serde_json::from_str(&line)?;
        response.into_result()
    }

    async fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Option<Value>) -> Result<T> {
        let value = self.call(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn connect(&self) -> Result<UnixStream> {
        Ok(UnixStream::connect(&self.socket_path).await?)
    }

    fn next_id(&self) -> i64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst)
    }

    // Settings methods

    pub async fn settings_get(&self) -> Result<Settings> {
        self.call_typed("settings.get", None).await
    }

    /// Replace the stored settings wholesale
    pub async fn settings_save(&self, settings: &Settings) -> Result<Settings> {
        self.call_typed("settings.save", Some(serde_json::to_value(settings)?))
            .await
    }

    // Issue methods

    /// Fetch the issue fresh and evaluate it against the current settings
    pub async fn issue_evaluate(&self, issue_id: &str) -> Result<PanelSnapshot> {
        self.call_typed("issue.evaluate", Some(json!({ "issue_id": issue_id })))
            .await
    }

    pub async fn issue_analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.call_typed("issue.analyze", Some(serde_json::to_value(request)?))
            .await
    }

    pub async fn issue_assign_self(&self, issue_id: &str) -> Result<Assignment> {
        self.call_typed("issue.assign_self", Some(json!({ "issue_id": issue_id })))
            .await
    }

    // Config methods

    pub async fn config_get(&self) -> Result<Config> {
        self.call_typed("config.get", None).await
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, request: &Request) -> Result<()> {
    let json = serde_json::to_string(request)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, ReadHalf, WriteHalf};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;

use super::protocol::{JsonRpcError, Notification, Request, RequestId, Response};
use crate::api::ApiHandler;
use crate::events::DaemonEvent;
use readiness_core::IssueSource;

#[derive(Debug, thiserror::Error)]
pub enum IpcServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, IpcServerError>;

type Reader = BufReader<ReadHalf<UnixStream>>;
type Writer = BufWriter<WriteHalf<UnixStream>>;

/// Newline-delimited JSON-RPC server on a Unix socket
pub struct IpcServer<S> {
    socket_path: String,
    api_handler: Arc<ApiHandler<S>>,
}

impl<S: IssueSource + 'static> IpcServer<S> {
    pub fn new(socket_path: String, api_handler: Arc<ApiHandler<S>>) -> Self {
        Self {
            socket_path,
            api_handler,
        }
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    pub async fn start(self: Arc<Self>) -> Result<()> {
        let path = Path::new(&self.socket_path);
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("IPC server listening on {}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let server = self.clone();
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    async fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        tracing::debug!("New client connected");

        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = BufReader::new(read_half);
        let mut writer = BufWriter::new(write_half);

        let event_rx = self.api_handler.subscribe_events();
        let (notif_tx, mut notif_rx) = mpsc::channel::<Notification>(100);
        let forwarder = tokio::spawn(forward_events(event_rx, notif_tx));

        loop {
            tokio::select! {
                result = Self::read_line_from(&mut reader) => {
                    match result {
                        Ok(line) => {
                            let response = self.respond(&line).await;
                            if let Err(e) = Self::write_frame(&mut writer, &response).await {
                                tracing::error!("Failed to write response: {}", e);
                                break;
                            }
                        }
                        Err(IpcServerError::Closed) => {
                            tracing::debug!("Client disconnected");
                            break;
                        }
                        Err(e) => {
                            tracing::error!("Failed to read request: {}", e);
                            break;
                        }
                    }
                }
                Some(notification) = notif_rx.recv() => {
                    tracing::debug!("IPC: Sending notification to client: {}", notification.method);
                    if let Err(e) = Self::write_frame(&mut writer, &notification).await {
                        tracing::warn!("Failed to send notification: {}", e);
                        break;
                    }
                }
            }
        }

        forwarder.abort();
        Ok(())
    }

    async fn read_line_from(reader: &mut Reader) -> Result<String> {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Err(IpcServerError::Closed);
        }
        Ok(line)
    }

    async fn write_frame<T: serde::Serialize>(writer: &mut Writer, frame: &T) -> Result<()> {
        let json = serde_json::to_string(frame)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Turn one request line into a response; malformed input gets a parse error
    async fn respond(&self, line: &str) -> Response {
        match Request::parse(line) {
            Ok(request) => {
                tracing::info!("handler: received request: {}", request.method);
                self.handle_request(request).await
            }
            Err(error) => {
                tracing::warn!("Malformed request: {}", error.message);
                Response::error(error, RequestId::Null)
            }
        }
    }

    async fn handle_request(&self, request: Request) -> Response {
        match self
            .api_handler
            .handle(&request.method, request.params)
            .await
        {
            Ok(result) => Response::success(result, request.id),
            Err(error) => Response::error(JsonRpcError::from(&error), request.id),
        }
    }
}

/// Relay broadcast events to one client until either side goes away
async fn forward_events(
    mut event_rx: broadcast::Receiver<DaemonEvent>,
    notif_tx: mpsc::Sender<Notification>,
) {
    loop {
        let event = match event_rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("IPC: Client lagging, dropped {} events", skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let notification = match Notification::from_event(&event) {
            Ok(notification) => notification,
            Err(e) => {
                tracing::error!("Failed to encode {} event: {}", event.method(), e);
                continue;
            }
        };

        if notif_tx.send(notification).await.is_err() {
            tracing::debug!("IPC: Event forwarder stopping - client disconnected");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::IssueEvent;

    #[tokio::test]
    async fn test_malformed_line_gets_parse_error() {
        let fixture = crate::api::test_support::fixture();
        let server = IpcServer::new(
            "/tmp/unused.sock".to_string(),
            Arc::new(fixture.handler),
        );

        let response = server.respond("{not json").await;
        assert_eq!(response.error.unwrap().code, -32700);
        assert_eq!(response.id, RequestId::Null);

        let response = server
            .respond(r#"{"jsonrpc":"2.0","method":"settings.get","id":3}"#)
            .await;
        assert_eq!(response.id, RequestId::Number(3));
        assert_eq!(response.result.unwrap()["checkAssignee"], true);
    }

    #[tokio::test]
    async fn test_forwarder_survives_lag() {
        let (event_tx, event_rx) = broadcast::channel(2);
        let (notif_tx, mut notif_rx) = mpsc::channel(10);

        // Overflow the receiver before the forwarder starts reading
        for n in 0..5 {
            event_tx
                .send(DaemonEvent::Issue(IssueEvent::assigned(
                    format!("1000{n}"),
                    "acc-1".to_string(),
                )))
                .unwrap();
        }
        let forwarder = tokio::spawn(forward_events(event_rx, notif_tx));

        let first = notif_rx.recv().await.unwrap();
        assert_eq!(first.params["issue_id"], "10003");
        let second = notif_rx.recv().await.unwrap();
        assert_eq!(second.params["issue_id"], "10004");

        event_tx
            .send(DaemonEvent::Issue(IssueEvent::assigned(
                "20000".to_string(),
                "acc-1".to_string(),
            )))
            .unwrap();
        let later = notif_rx.recv().await.unwrap();
        assert_eq!(later.method, "issue.event");
        assert_eq!(later.params["issue_id"], "20000");

        drop(event_tx);
        forwarder.await.unwrap();
    }
}

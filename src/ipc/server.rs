//! Unix domain socket server for IPC
//!
//! Provides request-response communication with the mounted page and pushes
//! feedback events to subscribed clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::app::App;
use crate::events::{EventSender, FeedbackEvent};

use super::protocol::{DaemonStatus, Notification, Request, Response, MAX_FRAME_LEN};

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    state: Arc<ServerState>,
    shutdown_tx: broadcast::Sender<()>,
}

/// Shared server state
struct ServerState {
    app: Mutex<App>,
    start_time: std::time::Instant,
    /// Source of push notifications for subscribed clients
    events: EventSender,
}

impl Server {
    /// Create a new IPC server driving `app`
    pub fn new(socket_path: &Path, app: App, events: EventSender) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Set socket permissions to owner-only (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        let state = Arc::new(ServerState {
            app: Mutex::new(app),
            start_time: std::time::Instant::now(),
            events,
        });

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener: Some(listener),
            state,
            shutdown_tx,
        })
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        let listener = self.listener.as_ref().context("server not initialized")?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let state = Arc::clone(&self.state);
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, state) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    async fn handle_client(stream: UnixStream, state: Arc<ServerState>) -> Result<()> {
        let (mut reader, mut writer) = stream.into_split();

        // Frames are read on their own task so a partial read is never
        // cancelled by a notification becoming ready
        let (frame_tx, mut frames) = mpsc::channel::<Result<Vec<u8>>>(8);
        let reader_task = tokio::spawn(async move {
            loop {
                let frame = read_frame(&mut reader).await.transpose();
                let Some(frame) = frame else { break };
                let failed = frame.is_err();
                if frame_tx.send(frame).await.is_err() || failed {
                    break;
                }
            }
        });

        let mut notifications: Option<broadcast::Receiver<FeedbackEvent>> = None;

        let result = loop {
            tokio::select! {
                frame = frames.recv() => {
                    let msg_buf = match frame {
                        Some(Ok(buf)) => buf,
                        Some(Err(e)) => break Err(e),
                        None => {
                            debug!("client disconnected");
                            break Ok(());
                        }
                    };

                    let response = match serde_json::from_slice::<Request>(&msg_buf) {
                        Ok(request) => {
                            debug!(?request, "received request");
                            let (response, subscribe) =
                                Self::process_request(request, &state).await;
                            if subscribe && notifications.is_none() {
                                notifications = Some(state.events.subscribe());
                                debug!("client subscribed to notifications");
                            }
                            response
                        }
                        Err(e) => {
                            warn!(?e, "failed to parse request");
                            Response::error("bad_request", e.to_string())
                        }
                    };

                    if let Err(e) = write_frame(&mut writer, &response).await {
                        break Err(e);
                    }
                }

                event = next_notification(&mut notifications) => {
                    match event {
                        Ok(event) => {
                            let notification = Notification::Feedback(event);
                            if let Err(e) = write_frame(&mut writer, &notification).await {
                                break Err(e);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "notification receiver lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            notifications = None;
                        }
                    }
                }
            }
        };

        reader_task.abort();
        result
    }

    /// Process a request and return a response
    /// Returns (Response, should_subscribe)
    async fn process_request(request: Request, state: &ServerState) -> (Response, bool) {
        let mut app = state.app.lock().await;

        let response = match request {
            Request::Ping => Response::Pong,

            Request::GetStatus => Response::Status(DaemonStatus {
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime_secs: state.start_time.elapsed().as_secs(),
                page: app.snapshot(),
                pending_announcements: app.feedback().announcer.pending(),
                speaking: app.feedback().announcer.is_speaking(),
                audio_enabled: app.feedback().audio.is_enabled(),
            }),

            Request::Navigate { path } => match app.navigate(&path) {
                Ok(route) => Response::Navigated {
                    route,
                    page: app.snapshot(),
                },
                Err(e) => Response::error(e.code(), e.to_string()),
            },

            Request::Dispatch { event } => match app.dispatch(event) {
                Ok(outcome) => Response::Snapshot {
                    outcome,
                    page: app.snapshot(),
                },
                Err(e) => Response::error(e.code(), e.to_string()),
            },

            Request::Hover { description } => {
                let spoken = app.hover(&description);
                Response::Accessibility {
                    settings: app.feedback().announcer.settings(),
                    spoken,
                }
            }

            Request::ToggleScreenReader => {
                let settings = app.toggle_screen_reader();
                info!(enabled = settings.screen_reader, "screen reader toggled via IPC");
                Response::Accessibility {
                    settings,
                    spoken: settings.screen_reader,
                }
            }

            Request::ToggleHoverAnnouncements => {
                let settings = app.toggle_hover_announcements();
                Response::Accessibility {
                    settings,
                    spoken: settings.screen_reader,
                }
            }

            Request::ToggleAudio => {
                let enabled = app.toggle_audio();
                Response::Audio { enabled }
            }

            Request::Subscribe => return (Response::Subscribed, true),
        };

        (response, false)
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        // Remove socket file
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}

/// Wait for the next event, or forever if the client never subscribed
async fn next_notification(
    rx: &mut Option<broadcast::Receiver<FeedbackEvent>>,
) -> Result<FeedbackEvent, broadcast::error::RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Read one length-prefixed frame. `None` on a clean disconnect.
async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];

    // Read message length (4-byte little-endian)
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        bail!("message too large ({} bytes)", len);
    }

    // Read message body
    let mut msg_buf = vec![0u8; len];
    reader.read_exact(&mut msg_buf).await?;
    Ok(Some(msg_buf))
}

/// Send a length-prefixed JSON message
async fn write_frame<W, T>(writer: &mut W, msg: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let msg_bytes = serde_json::to_vec(msg)?;
    let msg_len = u32::try_from(msg_bytes.len())
        .context("message too large")?
        .to_le_bytes();

    writer.write_all(&msg_len).await?;
    writer.write_all(&msg_bytes).await?;

    Ok(())
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Sender, TrySendError};
use futures::StreamExt;
use log::{debug, error, info, log_enabled, warn, Level};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::decoder::{decode_frame, encode_sample, Frame};
use crate::telemetry::{SessionWriter, TelemetryState};

type TelemetryStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

impl ConnectionPhase {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionPhase::Disconnected => "Disconnected",
            ConnectionPhase::Connecting => "Connecting",
            ConnectionPhase::Connected => "Connected",
            ConnectionPhase::Closing => "Closing",
        }
    }
}

/// Lifecycle notifications for the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Connected { endpoint: String },
    Failed { endpoint: String, reason: String },
    Lost { reason: String },
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Invalid URL {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme {scheme:?}, only ws:// endpoints are accepted")]
    UnsupportedScheme { scheme: String },
    #[error("Connection is {}, disconnect first", .0.label())]
    AlreadyActive(ConnectionPhase),
}

/// Validates an endpoint string without touching the network.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ConnectionError> {
    let url = Url::parse(endpoint).map_err(|source| ConnectionError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;
    match url.scheme() {
        "ws" => Ok(url),
        scheme => Err(ConnectionError::UnsupportedScheme {
            scheme: scheme.to_string(),
        }),
    }
}

struct Link {
    phase: watch::Sender<ConnectionPhase>,
    owner: Option<u64>,
    next_id: u64,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// Owns the single telemetry connection and its receive task.
///
/// `connect` and `disconnect` return immediately and are safe to call from
/// the UI thread; the handshake and the receive loop run on `runtime`.
#[derive(Clone)]
pub struct ConnectionManager {
    runtime: Handle,
    telemetry: TelemetryState,
    events: Sender<ConnectionEvent>,
    link: Arc<Mutex<Link>>,
}

impl ConnectionManager {
    pub fn new(runtime: Handle, telemetry: TelemetryState, events: Sender<ConnectionEvent>) -> Self {
        let (phase, _) = watch::channel(ConnectionPhase::Disconnected);
        Self {
            runtime,
            telemetry,
            events,
            link: Arc::new(Mutex::new(Link {
                phase,
                owner: None,
                next_id: 0,
                shutdown: None,
                task: None,
            })),
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        *lock_link(&self.link).phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<ConnectionPhase> {
        lock_link(&self.link).phase.subscribe()
    }

    pub fn connect(&self, endpoint: &str) -> Result<(), ConnectionError> {
        let mut link = lock_link(&self.link);

        let phase = *link.phase.borrow();
        if phase != ConnectionPhase::Disconnected {
            warn!("Connect to {} ignored, connection is {}", endpoint, phase.label());
            return Err(ConnectionError::AlreadyActive(phase));
        }

        let url = match parse_endpoint(endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!("Rejected endpoint: {}", e);
                return Err(e);
            }
        };

        let id = link.next_id;
        link.next_id += 1;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        link.owner = Some(id);
        link.shutdown = Some(shutdown_tx);
        link.phase.send_replace(ConnectionPhase::Connecting);
        info!("Connecting to {}", url);

        let session = Session {
            id,
            url,
            writer: self.telemetry.begin_session(),
            shutdown: shutdown_rx,
            link: Arc::clone(&self.link),
            events: self.events.clone(),
        };
        link.task = Some(self.runtime.spawn(session.run()));
        Ok(())
    }

    /// Cancels the active connection. The connectivity flag is cleared and
    /// the session invalidated before this returns; the returned handle
    /// completes once the socket is closed. `None` if nothing was active.
    pub fn disconnect(&self) -> Option<JoinHandle<()>> {
        let mut link = lock_link(&self.link);
        let shutdown = link.shutdown.take()?;

        link.phase.send_replace(ConnectionPhase::Closing);
        self.telemetry.end_session();
        // the task may already be on its way out, in which case nobody listens
        let _ = shutdown.send(());
        info!("Disconnect requested");

        self.log_window();
        link.task.take()
    }

    fn log_window(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let snapshot = self.telemetry.read();
        debug!("Motion data window ({} samples):", snapshot.samples.len());
        for sample in &snapshot.samples {
            match encode_sample(sample) {
                Ok(line) => debug!("{}", line),
                Err(e) => warn!("Failed to encode sample {}: {}", sample.id(), e),
            }
        }
    }
}

fn lock_link(link: &Mutex<Link>) -> MutexGuard<'_, Link> {
    link.lock().unwrap_or_else(PoisonError::into_inner)
}

fn send_event(events: &Sender<ConnectionEvent>, event: ConnectionEvent) {
    match events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => debug!("Event channel full, dropping {:?}", event),
        Err(TrySendError::Disconnected(_)) => debug!("Event receiver gone"),
    }
}

enum Outcome {
    Cancelled,
    Failed(String),
    Lost(String),
}

enum Next {
    Shutdown,
    Message(Option<Result<Message, tungstenite::Error>>),
}

/// State moved into the spawned connection task.
struct Session {
    id: u64,
    url: Url,
    writer: SessionWriter,
    shutdown: oneshot::Receiver<()>,
    link: Arc<Mutex<Link>>,
    events: Sender<ConnectionEvent>,
}

impl Session {
    async fn run(mut self) {
        let connected = tokio::select! {
            biased;
            _ = &mut self.shutdown => None,
            result = connect_async(self.url.as_str()) => Some(result),
        };

        let outcome = match connected {
            None => Outcome::Cancelled,
            Some(Err(e)) => {
                error!("WebSocket connection to {} failed: {}", self.url, e);
                Outcome::Failed(e.to_string())
            }
            Some(Ok((stream, _response))) => {
                self.enter_connected();
                self.receive(stream).await
            }
        };

        self.finish(outcome);
    }

    fn enter_connected(&self) {
        let link = lock_link(&self.link);
        if link.owner != Some(self.id) || *link.phase.borrow() != ConnectionPhase::Connecting {
            return;
        }
        link.phase.send_replace(ConnectionPhase::Connected);
        drop(link);

        self.writer.mark_connected();
        info!("Connected to {}", self.url);
        send_event(
            &self.events,
            ConnectionEvent::Connected {
                endpoint: self.url.to_string(),
            },
        );
    }

    async fn receive(&mut self, mut stream: TelemetryStream) -> Outcome {
        loop {
            // shutdown is polled first so a cancelled session never reads again
            let next = tokio::select! {
                biased;
                _ = &mut self.shutdown => Next::Shutdown,
                message = stream.next() => Next::Message(message),
            };

            match next {
                Next::Shutdown => {
                    if let Err(e) = stream.close(None).await {
                        debug!("Close handshake with {} failed: {}", self.url, e);
                    }
                    return Outcome::Cancelled;
                }
                Next::Message(Some(Ok(Message::Text(text)))) => self.handle(Frame::Text(&text)),
                Next::Message(Some(Ok(Message::Binary(data)))) => self.handle(Frame::Binary(&data)),
                Next::Message(Some(Ok(Message::Close(frame)))) => {
                    info!("Peer closed the connection: {:?}", frame);
                    return Outcome::Lost("peer closed the connection".to_string());
                }
                Next::Message(Some(Ok(_))) => {}
                Next::Message(Some(Err(e))) => {
                    error!("WebSocket receiving error: {}", e);
                    return Outcome::Lost(e.to_string());
                }
                Next::Message(None) => {
                    error!("WebSocket stream from {} ended", self.url);
                    return Outcome::Lost("stream ended".to_string());
                }
            }
        }
    }

    fn handle(&self, frame: Frame<'_>) {
        match decode_frame(frame) {
            Ok(sample) => {
                if !self.writer.update(sample) {
                    debug!("Session ended, dropping frame");
                }
            }
            Err(e) => warn!("Dropping telemetry frame: {}", e),
        }
    }

    fn finish(self, outcome: Outcome) {
        self.writer.mark_disconnected();

        let event = match outcome {
            Outcome::Cancelled => {
                info!("Disconnected from {}", self.url);
                ConnectionEvent::Closed
            }
            Outcome::Failed(reason) => ConnectionEvent::Failed {
                endpoint: self.url.to_string(),
                reason,
            },
            Outcome::Lost(reason) => ConnectionEvent::Lost { reason },
        };
        send_event(&self.events, event);

        // last step: once the phase reads Disconnected a new connect may start
        let mut link = lock_link(&self.link);
        if link.owner == Some(self.id) {
            link.owner = None;
            link.shutdown = None;
            link.task = None;
            link.phase.send_replace(ConnectionPhase::Disconnected);
        }
    }
}

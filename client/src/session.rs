use std::sync::Arc;

use log::{debug, info, warn};
use shared::{
    models::pixel::pixel_colour::PixelColour,
    networking::{
        error::NetworkingError,
        messages::{ServerMessage, DEFAULT_MAX_UPDATES},
    },
};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::transport::{Frame, SocketConnector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub url: String,
    pub origin: Option<String>,
    pub max_updates: u64,
}

impl SessionOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            origin: None,
            max_updates: DEFAULT_MAX_UPDATES,
        }
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    Open,
    PixelColours(Vec<PixelColour>),
    /// Terminal. Sent at most once and never after the owner closes.
    Closed(NetworkingError),
}

/// One live-update connection running on its own task.
///
/// Events arrive on the receiver returned by [`StreamingSession::open`]. The
/// session ends after a `Closed` event or when the owner calls
/// [`StreamingSession::close`] (or drops it).
pub struct StreamingSession {
    id: Uuid,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StreamingSession {
    pub fn open(
        connector: Arc<dyn SocketConnector>,
        options: SessionOptions,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let id = Uuid::new_v4();
        // One in-flight batch; the socket is not read while it is pending
        let (events_tx, events_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(run_session(id, connector, options, events_tx, shutdown_rx));

        let session = Self {
            id,
            shutdown: Some(shutdown_tx),
        };
        (session, events_rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }


    /// Idempotent.
    pub fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            debug!("[{}] Closing session", self.id);
            let _ = shutdown.send(());
        }
    }
}

impl Drop for StreamingSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_session(
    id: Uuid,
    connector: Arc<dyn SocketConnector>,
    options: SessionOptions,
    events: mpsc::Sender<SessionEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    debug!("[{}] Connecting to {}", id, options.url);

    let connected = tokio::select! {
        connected = connector.connect(&options.url, options.origin.as_deref()) => connected,
        _ = &mut shutdown => return,
    };

    let mut stream = match connected {
        Ok(stream) => stream,
        Err(e) => {
            warn!("[{}] Failed to connect: {}", id, e);
            forward(&events, &mut shutdown, SessionEvent::Closed(e)).await;
            return;
        }
    };

    info!("[{}] Websocket open", id);
    if !forward(&events, &mut shutdown, SessionEvent::Open).await {
        stream.close().await;
        return;
    }

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => {
                stream.close().await;
                return;
            }
            frame = stream.next_frame() => match handle_frame(frame, options.max_updates) {
                Ok(Some(colours)) => {
                    let event = SessionEvent::PixelColours(colours);
                    if !forward(&events, &mut shutdown, event).await {
                        stream.close().await;
                        return;
                    }
                }
                Ok(None) => {}
                Err(reason) => break reason,
            },
        }
    };

    warn!("[{}] Websocket closed: {}", id, reason);
    stream.close().await;
    forward(&events, &mut shutdown, SessionEvent::Closed(reason)).await;
}

/// Waits for room for `event`. `false` once the owner closed or stopped
/// listening, after which `shutdown` must not be polled again.
async fn forward(
    events: &mpsc::Sender<SessionEvent>,
    shutdown: &mut oneshot::Receiver<()>,
    event: SessionEvent,
) -> bool {
    tokio::select! {
        sent = events.send(event) => sent.is_ok(),
        _ = shutdown => false,
    }
}

/// `Ok(None)` for frames that carry no updates.
fn handle_frame(
    frame: Option<Result<Frame, NetworkingError>>,
    max_updates: u64,
) -> Result<Option<Vec<PixelColour>>, NetworkingError> {
    match frame {
        None => Err(NetworkingError::Closed("connection ended".into())),
        Some(Err(e)) => Err(e),
        Some(Ok(Frame::Close(reason))) => Err(NetworkingError::Closed(
            reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "closed by peer".into()),
        )),
        Some(Ok(Frame::Text(_))) => Err(NetworkingError::NonBinaryFrame),
        Some(Ok(Frame::Binary(bytes))) => match ServerMessage::decode(&bytes, max_updates)? {
            ServerMessage::UpdateColours(colours) => {
                debug!("Received {} updated colours", colours.len());
                Ok(Some(colours))
            }
            ServerMessage::Unknown(_) => Ok(None),
        },
    }
}

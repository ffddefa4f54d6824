use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, OptionFuture};
use log::{debug, info, warn};
use shared::{
    address::PixelAddrGenerator,
    graphics::canvas::Canvas,
    models::pixel::{pixel_colour::PixelColour, pixel_coord::PixelCoord, pixel_data::PixelData},
    networking::{error::NetworkingError, result::NetworkingResult},
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{sleep, Instant},
};

use crate::{
    config::ClientConfig,
    http_client::CanvasHttpClient,
    listener::{CanvasListener, ListenerSlot},
    session::{SessionEvent, SessionOptions, StreamingSession},
    transport::{BinaryHttp, BinaryRequest, SocketConnector, Transports},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Connecting,
    /// Socket open, snapshot downloading, updates buffered.
    Bootstrapping,
    Live,
    /// Waiting out the reconnect delay after a failure.
    Reconnecting,
    Closed,
}

/// Keeps a canvas in sync with the server: bootstraps a snapshot, reconciles
/// it with updates that raced the download, streams live updates, and
/// reconnects after any failure.
pub struct CanvasClient {
    config: Arc<ClientConfig>,
    transports: Transports,
    http: Arc<CanvasHttpClient>,
    addr_gen: Arc<dyn PixelAddrGenerator>,
    listener: Arc<ListenerSlot>,
    state: Arc<watch::Sender<SyncState>>,
    shutdown: watch::Sender<bool>,
    driver: Option<JoinHandle<()>>,
}

impl CanvasClient {
    /// Uses the native transports and the burn address generator from `config`.
    pub fn new(config: ClientConfig, listener: impl CanvasListener) -> NetworkingResult<Self> {
        let addr_gen = Arc::new(config.address.generator()?);
        Self::with_transports(config, Transports::native()?, addr_gen, listener)
    }

    pub fn with_transports(
        config: ClientConfig,
        transports: Transports,
        addr_gen: Arc<dyn PixelAddrGenerator>,
        listener: impl CanvasListener,
    ) -> NetworkingResult<Self> {
        config.validate()?;

        let http = Arc::new(CanvasHttpClient::new(
            transports.http.clone(),
            &config.http_url,
            config.http_rate_limit(),
            config.http_timeout(),
            config.http_origin.clone(),
        ));
        let (state, _) = watch::channel(SyncState::Idle);
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config: Arc::new(config),
            transports,
            http,
            addr_gen,
            listener: Arc::new(ListenerSlot::new(Box::new(listener))),
            state: Arc::new(state),
            shutdown,
            driver: None,
        })
    }

    /// Starts the connection cycle. A no-op once started or after [`close`].
    ///
    /// [`close`]: CanvasClient::close
    pub fn start(&mut self) {
        if self.is_closed() || self.driver.is_some() {
            return;
        }

        let driver = Driver {
            config: self.config.clone(),
            http: self.transports.http.clone(),
            sockets: self.transports.sockets.clone(),
            listener: self.listener.clone(),
            state: self.state.clone(),
            shutdown: self.shutdown.subscribe(),
        };
        self.driver = Some(tokio::spawn(driver.run()));
    }

    /// Stops delivery for good. Safe to call from any state, and more than once.
    pub fn close(&self) {
        if self.is_closed() {
            return;
        }
        info!("Closing canvas client");
        self.listener.close();
        self.shutdown.send_replace(true);
        self.state.send_replace(SyncState::Closed);
    }

    pub fn is_closed(&self) -> bool {
        self.listener.is_closed()
    }

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Balances of `coord` with the address of every colour. Independent of
    /// the connection state.
    pub async fn pixel(&self, coord: PixelCoord) -> NetworkingResult<PixelData> {
        let balances = self.http.pixel_balances(coord).await?;
        Ok(PixelData::new(coord, balances, self.addr_gen.as_ref())?)
    }
}

impl Drop for CanvasClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolves once the client is closed or dropped.
async fn closed(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|closed| *closed).await;
}

struct Driver {
    config: Arc<ClientConfig>,
    http: Arc<dyn BinaryHttp>,
    sockets: Arc<dyn SocketConnector>,
    listener: Arc<ListenerSlot>,
    state: Arc<watch::Sender<SyncState>>,
    shutdown: watch::Receiver<bool>,
}

impl Driver {
    async fn run(self) {
        while let Some(failure) = self.cycle().await {
            if self.listener.is_closed() {
                break;
            }

            self.set_state(SyncState::Reconnecting);
            warn!(
                "Canvas connection failed: {}. Reconnecting in {:?}",
                failure,
                self.config.reconnect_delay()
            );
            self.listener.error(failure);

            tokio::select! {
                _ = sleep(self.config.reconnect_delay()) => {}
                _ = closed(self.shutdown.clone()) => break,
            }
            if self.listener.is_closed() {
                break;
            }
        }

        debug!("Canvas driver stopped");
        self.listener.release();
        self.state.send_replace(SyncState::Closed);
    }

    fn set_state(&self, state: SyncState) {
        if !self.listener.is_closed() {
            self.state.send_replace(state);
        }
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            url: self.config.ws_url.clone(),
            origin: self.config.ws_origin.clone(),
            max_updates: self.config.max_updates,
        }
    }

    fn download_snapshot(&self) -> BoxFuture<'static, NetworkingResult<Vec<u8>>> {
        let http = self.http.clone();
        let request = BinaryRequest::new(
            self.config.bitmap_url.clone(),
            self.config.bitmap_len(),
            self.config.bitmap_timeout(),
        )
        .header("Cache-Control", "no-cache")
        .origin(self.config.bitmap_origin.as_deref());

        async move { http.get(&request).await }.boxed()
    }

    /// One connect/bootstrap/live cycle. Returns the failure that ended it, or
    /// `None` when the client was closed.
    async fn cycle(&self) -> Option<NetworkingError> {
        self.set_state(SyncState::Connecting);

        let (mut session, mut events) =
            StreamingSession::open(self.sockets.clone(), self.session_options());
        debug!("Connecting with session {}", session.id());
        let shutdown = closed(self.shutdown.clone());
        tokio::pin!(shutdown);

        let mut waiting_for_snapshot = true;
        let mut buffer: Vec<PixelColour> = Vec::new();
        let mut snapshot: Option<BoxFuture<'static, NetworkingResult<Vec<u8>>>> = None;
        let mut snapshot_started = Instant::now();

        let outcome = loop {
            tokio::select! {
                _ = &mut shutdown => break None,

                event = events.recv() => match event {
                    Some(SessionEvent::Open) => {
                        info!("Downloading {} byte canvas snapshot", self.config.bitmap_len());
                        self.set_state(SyncState::Bootstrapping);
                        snapshot_started = Instant::now();
                        snapshot = Some(self.download_snapshot());
                    }
                    Some(SessionEvent::PixelColours(colours)) => {
                        if waiting_for_snapshot {
                            debug!("Buffering {} updates until the snapshot arrives", colours.len());
                            buffer.extend(colours);
                        } else {
                            self.listener.updated_pixels(colours);
                        }
                    }
                    Some(SessionEvent::Closed(reason)) => break Some(reason),
                    None => break Some(NetworkingError::Closed("session ended".into())),
                },

                Some(result) = OptionFuture::from(snapshot.as_mut()), if snapshot.is_some() => {
                    snapshot = None;
                    let mut canvas = match result.and_then(|raw| {
                        Canvas::new(self.config.x_len, self.config.y_len, raw)
                    }) {
                        Ok(canvas) => canvas,
                        Err(e) => break Some(e),
                    };

                    info!(
                        "Snapshot received in {:?}, replaying {} buffered updates",
                        snapshot_started.elapsed(),
                        buffer.len()
                    );
                    for pixel in buffer.drain(..) {
                        canvas.update_pixel(&pixel);
                    }
                    waiting_for_snapshot = false;
                    self.set_state(SyncState::Live);
                    self.listener.full_canvas(canvas);
                }
            }
        };

        session.close();
        outcome
    }
}

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use client::{
    config::{AddressConfig, ClientConfig},
    transport::{BinaryHttp, BinaryRequest, Frame, FrameStream, SocketConnector, Transports},
    CanvasClient, CanvasEvent, ChannelListener,
};
use shared::{
    address::pixel_burn_address::PixelBurnAddrGenerator,
    graphics::{
        canvas::Canvas,
        palette::{ColourId, NUM_COLOURS},
    },
    models::pixel::{pixel_colour::PixelColour, pixel_coord::PixelCoord},
    networking::{error::NetworkingError, result::NetworkingResult},
};
use tokio::{
    sync::mpsc,
    time::{sleep, timeout, Instant},
};

pub const WS_URL: &str = "wss://canvas.test/ws";
pub const HTTP_URL: &str = "https://canvas.test/api";
pub const BITMAP_URL: &str = "https://canvas.test/bitmap";
pub const BURN_PREFIX: [u8; 5] = [0xc7, 0x66, 0xce, 0xc1, 0xef];
pub const X_LEN: u32 = 10;
pub const Y_LEN: u32 = 10;
pub const RATE_LIMIT: Duration = Duration::from_millis(300);
pub const RECONNECT: Duration = Duration::from_millis(200);

pub fn config() -> ClientConfig {
    ClientConfig {
        x_len: X_LEN,
        y_len: Y_LEN,
        ws_url: WS_URL.into(),
        http_url: HTTP_URL.into(),
        bitmap_url: BITMAP_URL.into(),
        ws_origin: None,
        http_origin: None,
        bitmap_origin: Some("https://canvas.test".into()),
        http_rate_limit_ms: RATE_LIMIT.as_millis() as u64,
        http_timeout_ms: 1000,
        bitmap_timeout_ms: 1000,
        reconnect_ms: RECONNECT.as_millis() as u64,
        max_updates: 1000,
        address: AddressConfig {
            bech32_prefix: "tpc".into(),
            burn_prefix: BURN_PREFIX.to_vec(),
        },
    }
}

pub fn pixel(x: u16, y: u16, colour: u8) -> PixelColour {
    PixelColour::new(PixelCoord::new(x, y), ColourId::new(colour).unwrap())
}

/// Pixel `i` in row-major order has colour `i % 16`.
pub fn cycling_canvas() -> Canvas {
    let mut canvas = Canvas::blank(X_LEN, Y_LEN);
    for y in 0..Y_LEN as u16 {
        for x in 0..X_LEN as u16 {
            let i = usize::from(y) * X_LEN as usize + usize::from(x);
            canvas.update_pixel(&pixel(x, y, (i % NUM_COLOURS) as u8));
        }
    }
    canvas
}

pub fn bitmap() -> Vec<u8> {
    cycling_canvas().raw().to_vec()
}

/// Active colour 15, balance `i` for colour `i` except colour 15.
pub fn balances_body() -> Vec<u8> {
    let mut body = vec![15u8];
    for i in 0..15u64 {
        body.extend_from_slice(&i.to_be_bytes());
    }
    body.extend_from_slice(&0x1122334455667788u64.to_be_bytes());
    body
}

/// An update-colours frame. Counts stay below the varint markers.
pub fn update_frame(pixels: &[PixelColour]) -> Frame {
    let mut bytes = vec![0u8, pixels.len() as u8];
    for pixel in pixels {
        bytes.extend_from_slice(&pixel.to_bytes());
    }
    Frame::Binary(bytes)
}

pub struct MockResponse {
    pub delay: Duration,
    pub result: NetworkingResult<Vec<u8>>,
}

impl MockResponse {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(body),
        }
    }

    pub fn err(error: NetworkingError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = dyn Fn(&BinaryRequest) -> MockResponse + Send + Sync;

/// Answers requests from a handler and records when each one started.
pub struct MockHttp {
    handler: Box<Handler>,
    requests: Mutex<Vec<(Instant, BinaryRequest)>>,
}

impl MockHttp {
    pub fn new(handler: impl Fn(&BinaryRequest) -> MockResponse + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serves the cycling bitmap after `delay` and valid balances.
    pub fn canvas(delay: Duration) -> Self {
        Self::new(move |request| {
            if request.url == BITMAP_URL {
                MockResponse::ok(bitmap()).after(delay)
            } else {
                MockResponse::ok(balances_body())
            }
        })
    }

    pub fn requests(&self) -> Vec<(Instant, BinaryRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BinaryHttp for MockHttp {
    async fn get(&self, request: &BinaryRequest) -> NetworkingResult<Vec<u8>> {
        self.requests
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));
        let response = (self.handler)(request);
        sleep(response.delay).await;
        response.result
    }
}

/// The server end of one mock connection. Dropping it ends the stream.
pub struct ServerSide {
    pub url: String,
    pub origin: Option<String>,
    frames: mpsc::UnboundedSender<NetworkingResult<Frame>>,
    closed: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
}

impl ServerSide {
    pub fn send(&self, frame: Frame) {
        let _ = self.frames.send(Ok(frame));
    }

    pub fn fail(&self, error: NetworkingError) {
        let _ = self.frames.send(Err(error));
    }

    /// Whether the client closed its end.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Frames the client has taken off the connection so far.
    pub fn frames_read(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

pub struct MockConnector {
    refuse: AtomicBool,
    connections: mpsc::UnboundedSender<ServerSide>,
}

impl MockConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ServerSide>) {
        let (connections, rx) = mpsc::unbounded_channel();
        let connector = Self {
            refuse: AtomicBool::new(false),
            connections,
        };
        (Arc::new(connector), rx)
    }

    pub fn refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

#[async_trait]
impl SocketConnector for MockConnector {
    async fn connect(
        &self,
        url: &str,
        origin: Option<&str>,
    ) -> NetworkingResult<Box<dyn FrameStream>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(NetworkingError::Closed("connection refused".into()));
        }

        let (frames, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let reads = Arc::new(AtomicUsize::new(0));
        let _ = self.connections.send(ServerSide {
            url: url.to_owned(),
            origin: origin.map(str::to_owned),
            frames,
            closed: closed.clone(),
            reads: reads.clone(),
        });
        Ok(Box::new(MockStream {
            frames: rx,
            closed,
            reads,
        }))
    }
}

struct MockStream {
    frames: mpsc::UnboundedReceiver<NetworkingResult<Frame>>,
    closed: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameStream for MockStream {
    async fn next_frame(&mut self) -> Option<NetworkingResult<Frame>> {
        let frame = self.frames.recv().await;
        if frame.is_some() {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
        frame
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub client: CanvasClient,
    pub events: mpsc::UnboundedReceiver<CanvasEvent>,
    pub http: Arc<MockHttp>,
    pub connector: Arc<MockConnector>,
    pub connections: mpsc::UnboundedReceiver<ServerSide>,
}

pub fn harness(http: MockHttp) -> Harness {
    let http = Arc::new(http);
    let (connector, connections) = MockConnector::new();
    let (listener, events) = ChannelListener::new();

    let transports = Transports {
        http: http.clone(),
        sockets: connector.clone(),
    };
    let generator = Arc::new(PixelBurnAddrGenerator::new("tpc", &BURN_PREFIX).unwrap());
    let client = CanvasClient::with_transports(config(), transports, generator, listener).unwrap();

    Harness {
        client,
        events,
        http,
        connector,
        connections,
    }
}

impl Harness {
    pub async fn next_event(&mut self) -> CanvasEvent {
        timeout(Duration::from_secs(10), self.events.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("listener dropped")
    }

    pub async fn next_connection(&mut self) -> ServerSide {
        timeout(Duration::from_secs(10), self.connections.recv())
            .await
            .expect("timed out waiting for a connection")
            .expect("connector dropped")
    }

    /// Fails if any event is delivered within `window`. A dropped listener
    /// counts as quiet.
    pub async fn assert_quiet(&mut self, window: Duration) {
        if let Ok(Some(event)) = timeout(window, self.events.recv()).await {
            panic!("unexpected event {event:?}");
        }
    }
}

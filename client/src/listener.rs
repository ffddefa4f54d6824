use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use shared::{
    graphics::canvas::Canvas, models::pixel::pixel_colour::PixelColour,
    networking::error::NetworkingError,
};
use tokio::sync::mpsc;

/// Receives the output of a [`crate::CanvasClient`].
///
/// Callbacks run on the client's driver task, one at a time.
pub trait CanvasListener: Send + 'static {
    /// A freshly bootstrapped canvas, with every update received during the
    /// download already applied.
    fn on_full_canvas(&mut self, canvas: Canvas);

    /// Live updates, to be applied on top of the last full canvas.
    fn on_updated_pixels(&mut self, pixels: Vec<PixelColour>);

    /// The connection failed. A reconnect follows after the configured delay.
    fn on_error(&mut self, error: NetworkingError);
}

pub struct NoopListener;

impl CanvasListener for NoopListener {
    fn on_full_canvas(&mut self, _canvas: Canvas) {}

    fn on_updated_pixels(&mut self, _pixels: Vec<PixelColour>) {}

    fn on_error(&mut self, _error: NetworkingError) {}
}

#[derive(Debug)]
pub enum CanvasEvent {
    FullCanvas(Canvas),
    UpdatedPixels(Vec<PixelColour>),
    Error(NetworkingError),
}

/// Forwards every callback to an unbounded channel.
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<CanvasEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CanvasEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CanvasListener for ChannelListener {
    fn on_full_canvas(&mut self, canvas: Canvas) {
        let _ = self.tx.send(CanvasEvent::FullCanvas(canvas));
    }

    fn on_updated_pixels(&mut self, pixels: Vec<PixelColour>) {
        let _ = self.tx.send(CanvasEvent::UpdatedPixels(pixels));
    }

    fn on_error(&mut self, error: NetworkingError) {
        let _ = self.tx.send(CanvasEvent::Error(error));
    }
}

/// Holds the user's listener until the client closes.
///
/// After [`ListenerSlot::close`] returns no callback starts.
pub(crate) struct ListenerSlot {
    closed: AtomicBool,
    listener: Mutex<Box<dyn CanvasListener>>,
}

impl ListenerSlot {
    pub(crate) fn new(listener: Box<dyn CanvasListener>) -> Self {
        Self {
            closed: AtomicBool::new(false),
            listener: Mutex::new(listener),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn deliver(&self, f: impl FnOnce(&mut dyn CanvasListener)) {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return;
        }
        f(listener.as_mut());
    }

    pub(crate) fn full_canvas(&self, canvas: Canvas) {
        self.deliver(|l| l.on_full_canvas(canvas));
    }

    pub(crate) fn updated_pixels(&self, pixels: Vec<PixelColour>) {
        self.deliver(|l| l.on_updated_pixels(pixels));
    }

    pub(crate) fn error(&self, error: NetworkingError) {
        self.deliver(|l| l.on_error(error));
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        // Busy means a callback is running, possibly the caller itself; the
        // closed flag already stops the next one and the driver drops the
        // listener when it exits.
        if let Ok(mut listener) = self.listener.try_lock() {
            *listener = Box::new(NoopListener);
        }
    }

    pub(crate) fn release(&self) {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        *listener = Box::new(NoopListener);
    }
}

//! Capability seams for the two transports the client needs: a bounded binary
//! HTTP GET and a framed WebSocket connection.

pub mod http;
pub mod ws;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::networking::result::NetworkingResult;

pub use self::{http::ReqwestHttp, ws::TungsteniteConnector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRequest {
    pub url: String,
    /// Larger bodies fail with `ContentTooLong`.
    pub max_length: usize,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl BinaryRequest {
    pub fn new(url: impl Into<String>, max_length: usize, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            max_length,
            headers: Vec::new(),
            timeout,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn origin(self, origin: Option<&str>) -> Self {
        match origin {
            Some(origin) => self.header("Origin", origin),
            None => self,
        }
    }
}

/// `GET` returning the body of a `200` response.
#[async_trait]
pub trait BinaryHttp: Send + Sync {
    async fn get(&self, request: &BinaryRequest) -> NetworkingResult<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Binary(Vec<u8>),
    Text(String),
    /// Close frame from the peer, with its reason if one was given.
    Close(Option<String>),
}

#[async_trait]
pub trait FrameStream: Send {
    /// `None` once the connection has ended.
    async fn next_frame(&mut self) -> Option<NetworkingResult<Frame>>;

    async fn close(&mut self);
}

#[async_trait]
pub trait SocketConnector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
        origin: Option<&str>,
    ) -> NetworkingResult<Box<dyn FrameStream>>;
}

/// The transports used by a [`crate::CanvasClient`].
#[derive(Clone)]
pub struct Transports {
    pub http: Arc<dyn BinaryHttp>,
    pub sockets: Arc<dyn SocketConnector>,
}

impl Transports {
    pub fn native() -> NetworkingResult<Self> {
        Ok(Self {
            http: Arc::new(ReqwestHttp::new()?),
            sockets: Arc::new(TungsteniteConnector),
        })
    }
}

use async_trait::async_trait;
use futures_util::StreamExt;
use log::debug;
use shared::networking::{error::NetworkingError, result::NetworkingResult};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::{header::ORIGIN, HeaderValue},
        Message,
    },
    MaybeTlsStream, WebSocketStream,
};

use super::{Frame, FrameStream, SocketConnector};

#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl SocketConnector for TungsteniteConnector {
    async fn connect(
        &self,
        url: &str,
        origin: Option<&str>,
    ) -> NetworkingResult<Box<dyn FrameStream>> {
        let mut request = url
            .into_client_request()
            .map_err(NetworkingError::transport)?;
        if let Some(origin) = origin {
            let value = HeaderValue::from_str(origin).map_err(|e| {
                NetworkingError::Configuration(format!("invalid origin {origin:?}: {e}"))
            })?;
            request.headers_mut().insert(ORIGIN, value);
        }

        let (stream, response) = connect_async(request)
            .await
            .map_err(NetworkingError::transport)?;
        debug!("Websocket handshake with {} returned {}", url, response.status());

        Ok(Box::new(TungsteniteStream { inner: stream }))
    }
}

struct TungsteniteStream {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FrameStream for TungsteniteStream {
    async fn next_frame(&mut self) -> Option<NetworkingResult<Frame>> {
        loop {
            let message = match self.inner.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(NetworkingError::transport(e))),
            };

            let frame = match message {
                Message::Binary(data) => Frame::Binary(data),
                Message::Text(text) => Frame::Text(text),
                Message::Close(close) => Frame::Close(close.map(|c| c.reason.into_owned())),
                // Pongs are queued by tungstenite itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };
            return Some(Ok(frame));
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.inner.close(None).await {
            debug!("Websocket close failed: {}", e);
        }
    }
}

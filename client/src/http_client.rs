use std::{sync::Arc, time::Duration};

use log::debug;
use shared::{
    models::pixel::{
        pixel_balances::{PixelBalances, PIXEL_BALANCES_LEN},
        pixel_coord::PixelCoord,
    },
    networking::{deserialiser::Deserialiser, error::NetworkingError, result::NetworkingResult},
};

use crate::{
    rate_limit::RequestGate,
    transport::{BinaryHttp, BinaryRequest},
};

/// Client for the HTTP balance API, throttled through a [`RequestGate`].
pub struct CanvasHttpClient {
    http: Arc<dyn BinaryHttp>,
    url: String,
    timeout: Duration,
    origin: Option<String>,
    gate: RequestGate,
}

impl CanvasHttpClient {
    pub fn new(
        http: Arc<dyn BinaryHttp>,
        url: &str,
        rate_limit: Duration,
        timeout: Duration,
        origin: Option<String>,
    ) -> Self {
        let url = if url.ends_with('/') {
            url.to_owned()
        } else {
            format!("{url}/")
        };

        Self {
            http,
            url,
            timeout,
            origin,
            gate: RequestGate::new(rate_limit),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches `path` under the API url and checks the body is exactly
    /// `expected_length` bytes.
    pub async fn request(&self, path: &str, expected_length: usize) -> NetworkingResult<Vec<u8>> {
        let request = BinaryRequest::new(format!("{}{}", self.url, path), expected_length, self.timeout)
            .origin(self.origin.as_deref());

        let body = self.gate.run(|| self.http.get(&request)).await?;
        if body.len() != expected_length {
            return Err(NetworkingError::UnexpectedLength {
                expected: expected_length,
                actual: body.len(),
            });
        }
        Ok(body)
    }

    pub async fn pixel_balances(&self, coord: PixelCoord) -> NetworkingResult<PixelBalances> {
        let body = self
            .request(&format!("balances/{}/{}", coord.x, coord.y), PIXEL_BALANCES_LEN)
            .await?;
        let balances = PixelBalances::deserialise(&mut Deserialiser::new(&body))?;
        debug!("Balances for {}: active colour {}", coord, balances.active.name);
        Ok(balances)
    }
}

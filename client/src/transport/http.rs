use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use shared::networking::{error::NetworkingError, result::NetworkingResult};

use super::{BinaryHttp, BinaryRequest};

#[derive(Debug, Clone)]
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    pub fn new() -> NetworkingResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(NetworkingError::transport)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn map_reqwest(err: reqwest::Error) -> NetworkingError {
    if err.is_timeout() {
        NetworkingError::Timeout
    } else {
        NetworkingError::transport(err)
    }
}

#[async_trait]
impl BinaryHttp for ReqwestHttp {
    async fn get(&self, request: &BinaryRequest) -> NetworkingResult<Vec<u8>> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("GET {}", request.url);
        let mut response = builder.send().await.map_err(map_reqwest)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(NetworkingError::HttpStatus(status.as_u16()));
        }

        let too_long = NetworkingError::ContentTooLong {
            max: request.max_length,
        };
        if let Some(length) = response.content_length() {
            if length > request.max_length as u64 {
                return Err(too_long);
            }
        }

        // Chunked bodies carry no length up front; stop reading once over
        let mut body = Vec::with_capacity(request.max_length);
        while let Some(chunk) = response.chunk().await.map_err(map_reqwest)? {
            if body.len() + chunk.len() > request.max_length {
                return Err(too_long);
            }
            body.extend_from_slice(&chunk);
        }

        debug!("GET {} returned {} bytes", request.url, body.len());
        Ok(body)
    }
}

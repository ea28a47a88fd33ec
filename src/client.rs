//! HTTP client that opens the server push stream.
//!
//! [`PushClient::connect`] performs the HTTP handshake and hands the response
//! body to a fresh [`EventStream`]; everything after that is transport
//! agnostic.

use futures_util::StreamExt;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::adapters::{BoxByteStream, ByteStreamLines};
use crate::config::PushConfig;
use crate::decoder::EventDecoder;
use crate::error::{StreamError, StreamResult, TransportError};
use crate::stream::EventStream;

/// Line source over a reqwest response body.
pub type HttpLines = ByteStreamLines<BoxByteStream<reqwest::Error>>;

/// Event stream backed by an HTTP response.
pub type HttpEventStream = EventStream<HttpLines>;

/// Client for the server push endpoint.
#[derive(Debug, Clone)]
pub struct PushClient {
    config: PushConfig,
    /// Reusable HTTP client
    client: Client,
    decoder: EventDecoder,
}

impl PushClient {
    /// Create a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the HTTP client cannot be built
    /// (for example, the TLS backend failed to initialize).
    pub fn new(config: PushConfig) -> StreamResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self {
            config,
            client,
            decoder: EventDecoder::new(),
        })
    }

    /// Replace the decoder handed to every opened stream.
    pub fn with_decoder(mut self, decoder: EventDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Open the event stream.
    ///
    /// The returned stream is not listening yet; call
    /// [`EventStream::begin_listening`].
    ///
    /// # Errors
    ///
    /// - [`StreamError::InvalidUrl`] if the configured server URL is unusable
    /// - [`StreamError::Transport`] if the request could not be sent
    /// - [`StreamError::ServerError`] for a non-2xx response
    pub async fn connect(&self) -> StreamResult<HttpEventStream> {
        let url = self.events_url()?;
        debug!("Opening event stream: {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("Event stream request rejected: {} {}", status, message);
            return Err(StreamError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        info!("Event stream connected ({})", status);

        let body: BoxByteStream<reqwest::Error> = response.bytes_stream().boxed();
        Ok(EventStream::with_decoder(
            ByteStreamLines::new(body),
            self.decoder.clone(),
            self.config.event_buffer,
        ))
    }

    fn events_url(&self) -> StreamResult<Url> {
        let raw = self.config.events_url();
        Url::parse(&raw).map_err(|err| StreamError::InvalidUrl {
            url: raw,
            message: err.to_string(),
        })
    }
}

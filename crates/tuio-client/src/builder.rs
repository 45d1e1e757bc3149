//! Client builder pattern

use std::sync::Arc;
use tuio_core::{FixedViewport, Viewport};

use crate::config::TuioConfig;
use crate::{Result, TuioClient};

/// Builder for TuioClient
pub struct TuioClientBuilder {
    config: TuioConfig,
    viewport: Arc<dyn Viewport>,
}

impl TuioClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: TuioConfig::default(),
            viewport: Arc::new(FixedViewport::default()),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: TuioConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the UDP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the interface to listen on
    pub fn bind_addr(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Set the stale frame tolerance
    pub fn past_frame_threshold(mut self, threshold: i32) -> Self {
        self.config.past_frame_threshold = threshold;
        self
    }

    /// Set the surface touches are scaled to
    pub fn viewport(mut self, viewport: Arc<dyn Viewport>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Build a disconnected client
    pub fn build(self) -> TuioClient {
        TuioClient::with_config(self.config, self.viewport)
    }

    /// Build and connect on the configured port
    pub async fn connect(self) -> Result<TuioClient> {
        let port = self.config.port;
        let client = self.build();
        client.connect(port).await?;
        Ok(client)
    }
}

impl Default for TuioClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

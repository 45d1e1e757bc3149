//! Client configuration

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tuio_core::{DEFAULT_PAST_FRAME_THRESHOLD, DEFAULT_TUIO_PORT};
use tuio_transport::UdpConfig;

use crate::error::{ClientError, Result};

/// TUIO client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuioConfig {
    /// Interface to listen on (default: "0.0.0.0")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// UDP port used by `TuioClientBuilder::connect` (default: 3333)
    #[serde(default = "default_port")]
    pub port: u16,
    /// How far back a frame number may jump before it counts as a sender
    /// restart; negative values are treated as 0
    #[serde(default = "default_past_frame_threshold")]
    pub past_frame_threshold: i32,
    /// Receive buffer per datagram, in bytes; never below the largest UDP payload
    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_TUIO_PORT
}

fn default_past_frame_threshold() -> i32 {
    DEFAULT_PAST_FRAME_THRESHOLD
}

fn default_recv_buffer_size() -> usize {
    65536
}

impl Default for TuioConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            past_frame_threshold: default_past_frame_threshold(),
            recv_buffer_size: default_recv_buffer_size(),
        }
    }
}

impl TuioConfig {
    pub(crate) fn listen_addr(&self, port: u16) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_addr.parse().map_err(|_| {
            ClientError::ConnectionFailed(format!("invalid bind address: {}", self.bind_addr))
        })?;
        Ok(SocketAddr::new(ip, port))
    }

    pub(crate) fn udp_config(&self) -> UdpConfig {
        UdpConfig {
            recv_buffer_size: self.recv_buffer_size,
            ..UdpConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        let config = TuioConfig::default();
        assert_eq!(config.listen_addr(3333).unwrap().to_string(), "0.0.0.0:3333");

        let v6 = TuioConfig {
            bind_addr: "::1".into(),
            ..Default::default()
        };
        assert_eq!(v6.listen_addr(4000).unwrap().to_string(), "[::1]:4000");

        let bad = TuioConfig {
            bind_addr: "localhost".into(),
            ..Default::default()
        };
        assert!(matches!(
            bad.listen_addr(1),
            Err(ClientError::ConnectionFailed(_))
        ));
    }
}

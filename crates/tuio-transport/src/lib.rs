//! TUIO Transport Layer
//!
//! UDP plumbing for TUIO clients:
//! - [`UdpListener`] receives datagrams on a tokio task, decodes OSC (flattening
//!   bundles) and hands each message to a [`PacketHandler`]
//! - [`UdpSender`] encodes and sends OSC packets, used by simulators and tests

pub mod error;
pub mod osc;
pub mod traits;
pub mod udp;

pub use error::{Result, TransportError};
pub use traits::PacketHandler;
pub use udp::{UdpConfig, UdpListener, UdpSender};

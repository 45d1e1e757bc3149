//! Transport traits

use rosc::OscMessage;
use std::net::SocketAddr;

/// Receives every OSC message the listener decodes, in arrival order
///
/// Called on the listener task. Bundles are flattened before delivery, so a
/// handler only ever sees plain messages.
pub trait PacketHandler: Send + Sync {
    fn handle_message(&self, from: SocketAddr, msg: OscMessage);
}

impl<F> PacketHandler for F
where
    F: Fn(SocketAddr, OscMessage) + Send + Sync,
{
    fn handle_message(&self, from: SocketAddr, msg: OscMessage) {
        self(from, msg)
    }
}

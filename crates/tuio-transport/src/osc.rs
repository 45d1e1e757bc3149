//! OSC datagram helpers

use rosc::{OscMessage, OscPacket};

use crate::error::{Result, TransportError};

/// Decode one UDP datagram into its messages, bundles flattened depth-first
pub fn decode_datagram(data: &[u8]) -> Result<Vec<OscMessage>> {
    let (_, packet) = rosc::decoder::decode_udp(data)?;
    let mut messages = Vec::new();
    flatten(packet, &mut messages);
    Ok(messages)
}

/// Append the messages of `packet` to `out` in wire order
pub fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(msg),
        OscPacket::Bundle(bundle) => {
            for packet in bundle.content {
                flatten(packet, out);
            }
        }
    }
}

pub fn encode(packet: &OscPacket) -> Result<Vec<u8>> {
    rosc::encoder::encode(packet).map_err(|e| TransportError::Encode(format!("{:?}", e)))
}

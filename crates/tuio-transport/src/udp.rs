//! UDP listener and sender

use parking_lot::Mutex;
use rosc::OscPacket;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{Result, TransportError};
use crate::osc;
use crate::traits::PacketHandler;

/// UDP configuration
#[derive(Debug, Clone)]
pub struct UdpConfig {
    /// Buffer size for receiving
    pub recv_buffer_size: usize,
    /// Maximum packet size
    pub max_packet_size: usize,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            recv_buffer_size: 65536,
            max_packet_size: 65507, // Max UDP payload
        }
    }
}

impl UdpConfig {
    /// Receive buffer length; never smaller than `max_packet_size` so
    /// datagrams are not truncated
    pub fn recv_buffer_len(&self) -> usize {
        self.recv_buffer_size.max(self.max_packet_size)
    }
}

/// Receives OSC datagrams on a background task and hands each decoded
/// message to a [`PacketHandler`]
///
/// The listener runs until [`UdpListener::shutdown`] is awaited or the
/// listener is dropped. Undecodable datagrams are logged and skipped.
pub struct UdpListener {
    local_addr: SocketAddr,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl UdpListener {
    /// Bind to `addr` and start receiving
    ///
    /// Must be called from within a tokio runtime.
    pub async fn bind(
        addr: &str,
        config: UdpConfig,
        handler: Arc<dyn PacketHandler>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| TransportError::BindFailed {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;
        let local_addr = socket.local_addr()?;

        info!("UDP listener bound to {}", local_addr);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(receive_loop(
            socket,
            config.recv_buffer_len(),
            handler,
            shutdown_rx,
        ));

        Ok(Self {
            local_addr,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            task: Mutex::new(Some(task)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// False once shut down, or after a handler panic ended the receive task
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Stop receiving and wait for the receive task to exit
    ///
    /// When this returns the handler will not be called again.
    pub async fn shutdown(&self) -> Result<()> {
        let task = self.task.lock().take();
        let Some(task) = task else {
            return Err(TransportError::AlreadyStopped);
        };

        if let Some(tx) = self.shutdown_tx.lock().take() {
            let _ = tx.send(());
        }

        task.await
            .map_err(|e| TransportError::Other(format!("receive task failed: {}", e)))?;

        info!("UDP listener on {} stopped", self.local_addr);
        Ok(())
    }
}

impl Drop for UdpListener {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for UdpListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpListener")
            .field("local_addr", &self.local_addr)
            .field("running", &self.is_running())
            .finish()
    }
}

async fn receive_loop(
    socket: UdpSocket,
    buffer_size: usize,
    handler: Arc<dyn PacketHandler>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut buf = vec![0u8; buffer_size];

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                debug!("UDP receive task stopping");
                break;
            }
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, from)) => {
                    debug!("UDP received {} bytes from {}", len, from);
                    match osc::decode_datagram(&buf[..len]) {
                        Ok(messages) => {
                            for msg in messages {
                                let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
                                    handler.handle_message(from, msg)
                                }));
                                if delivered.is_err() {
                                    error!(
                                        "packet handler panicked on message from {}; receive task exiting",
                                        from
                                    );
                                    return;
                                }
                            }
                        }
                        Err(e) => warn!("dropping datagram from {}: {}", from, e),
                    }
                }
                Err(e) => {
                    // ICMP port-unreachable and friends surface here on some platforms
                    error!("UDP receive error: {}", e);
                }
            },
        }
    }
}

/// Sends OSC packets from an ephemeral or fixed local port
pub struct UdpSender {
    socket: UdpSocket,
    config: UdpConfig,
}

impl UdpSender {
    pub async fn bind(addr: &str) -> Result<Self> {
        Self::bind_with_config(addr, UdpConfig::default()).await
    }

    pub async fn bind_with_config(addr: &str, config: UdpConfig) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| TransportError::BindFailed {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { socket, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(TransportError::Io)
    }

    /// Send to a specific address
    pub async fn send_to(&self, data: &[u8], target: SocketAddr) -> Result<()> {
        if data.len() > self.config.max_packet_size {
            return Err(TransportError::SendFailed(format!(
                "packet of {} bytes exceeds limit of {}",
                data.len(),
                self.config.max_packet_size
            )));
        }

        self.socket
            .send_to(data, target)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        Ok(())
    }

    /// Encode and send one OSC packet
    pub async fn send_packet(&self, packet: &OscPacket, target: SocketAddr) -> Result<()> {
        let bytes = osc::encode(packet)?;
        self.send_to(&bytes, target).await?;
        debug!("sent {} byte OSC packet to {}", bytes.len(), target);
        Ok(())
    }
}

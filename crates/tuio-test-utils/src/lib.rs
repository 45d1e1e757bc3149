//! Common test helpers and utilities for TUIO tests
//!
//! This crate provides:
//! - A TUIO sender simulator speaking real OSC over UDP
//! - Condition-based waiting (no hardcoded sleeps)
//! - Event collectors for callback testing
//! - Assertion helpers returning `Result` for the test-suite runner

pub mod messages;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::time::timeout;
use tuio_client::TuioClient;
use tuio_core::{OscMessage, ProfileKind};
use tuio_transport::{TransportError, UdpSender};

use rosc::{OscBundle, OscPacket, OscTime};

/// Default test timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default condition check interval
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Port Allocation
// ============================================================================

/// Find an available UDP port for testing
pub fn find_available_udp_port() -> u16 {
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

// ============================================================================
// Condition-Based Waiting
// ============================================================================

/// Wait for a condition with timeout - condition-based, not time-based
pub async fn wait_for<F, Fut>(check: F, interval: Duration, max_wait: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = Instant::now();
    while start.elapsed() < max_wait {
        if check().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }
    false
}

/// Wait for an atomic counter to reach a target value
pub async fn wait_for_count(counter: &AtomicU32, target: u32, max_wait: Duration) -> bool {
    wait_for(
        || async { counter.load(Ordering::SeqCst) >= target },
        DEFAULT_CHECK_INTERVAL,
        max_wait,
    )
    .await
}

/// Wait for a boolean flag to become true
pub async fn wait_for_flag(flag: &AtomicBool, max_wait: Duration) -> bool {
    wait_for(
        || async { flag.load(Ordering::SeqCst) },
        DEFAULT_CHECK_INTERVAL,
        max_wait,
    )
    .await
}

/// Wait with notification - more efficient than polling
pub async fn wait_with_notify(notify: &Notify, max_wait: Duration) -> bool {
    timeout(max_wait, notify.notified()).await.is_ok()
}

/// Wait until `source` has committed `frame` on the 2D cursor profile
pub async fn wait_for_frame(client: &TuioClient, source: &str, frame: i32, max_wait: Duration) -> bool {
    wait_for(
        move || async move {
            client
                .reconciler::<tuio_core::Cursor2d>()
                .previous_frame(source)
                == Some(frame)
        },
        DEFAULT_CHECK_INTERVAL,
        max_wait,
    )
    .await
}

// ============================================================================
// TUIO Sender Simulator
// ============================================================================

/// Plays the role of a tracker: sends TUIO frames to a client over UDP
pub struct TuioSender {
    socket: UdpSender,
    target: SocketAddr,
}

impl TuioSender {
    /// Bind an ephemeral local port and aim at `target`
    pub async fn new(target: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSender::bind("127.0.0.1:0").await?;
        Ok(Self { socket, target })
    }

    /// Aim at a connected client
    pub async fn to_client(client: &TuioClient) -> Result<Self, TransportError> {
        let port = client
            .local_addr()
            .map(|a| a.port())
            .ok_or_else(|| TransportError::Other("client is not connected".into()))?;
        Self::new(SocketAddr::from(([127, 0, 0, 1], port))).await
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.socket
            .local_addr()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 0)))
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send one message in its own datagram
    pub async fn send(&self, msg: OscMessage) -> Result<(), TransportError> {
        self.socket
            .send_packet(&OscPacket::Message(msg), self.target)
            .await
    }

    /// Send several messages as one bundle datagram
    pub async fn send_bundle(&self, msgs: Vec<OscMessage>) -> Result<(), TransportError> {
        let bundle = OscPacket::Bundle(OscBundle {
            timetag: OscTime::from((0, 1)),
            content: msgs.into_iter().map(OscPacket::Message).collect(),
        });
        self.socket.send_packet(&bundle, self.target).await
    }

    /// Send raw bytes
    pub async fn send_raw(&self, data: &[u8]) -> Result<(), TransportError> {
        self.socket.send_to(data, self.target).await
    }

    /// Send a complete frame (sets, alive, fseq) as one bundle
    pub async fn send_frame(
        &self,
        kind: ProfileKind,
        sets: Vec<OscMessage>,
        alive: &[i32],
        frame: i32,
    ) -> Result<(), TransportError> {
        let mut msgs = sets;
        msgs.push(messages::alive(kind, alive));
        msgs.push(messages::fseq(kind, frame));
        self.send_bundle(msgs).await
    }

    /// Send a 2D cursor frame where each entry is (session id, x, y)
    pub async fn send_cursor_frame(
        &self,
        cursors: &[(i32, f32, f32)],
        frame: i32,
    ) -> Result<(), TransportError> {
        let sets = cursors
            .iter()
            .map(|(id, x, y)| messages::cursor2d(*id, *x, *y))
            .collect();
        let ids: Vec<i32> = cursors.iter().map(|(id, _, _)| *id).collect();
        self.send_frame(ProfileKind::Cursor2d, sets, &ids, frame).await
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that two values are approximately equal (for floating point)
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64, msg: &str) -> Result<(), String> {
    if (actual - expected).abs() < epsilon {
        Ok(())
    } else {
        Err(format!(
            "{}: expected {} +/- {}, got {}",
            msg, expected, epsilon, actual
        ))
    }
}

/// Assert a condition with a custom message
pub fn assert_that(condition: bool, msg: &str) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(msg.to_string())
    }
}

/// Assert that a Result is Ok and return the value
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, msg: &str) -> Result<T, String> {
    result.map_err(|e| format!("{}: {:?}", msg, e))
}

// ============================================================================
// Event Collectors - for verifying callback delivery
// ============================================================================

/// Collector for callback payloads with thread-safe access
pub struct EventCollector<T> {
    values: Arc<parking_lot::Mutex<Vec<T>>>,
    notify: Arc<Notify>,
    count: Arc<AtomicU32>,
}

impl<T> Clone for EventCollector<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            notify: self.notify.clone(),
            count: self.count.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> EventCollector<T> {
    pub fn new() -> Self {
        Self {
            values: Arc::new(parking_lot::Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Create a callback suitable for any `register_*` method
    pub fn callback(&self) -> impl Fn(&T) + Send + Sync + 'static {
        let values = self.values.clone();
        let notify = self.notify.clone();
        let count = self.count.clone();

        move |value: &T| {
            values.lock().push(value.clone());
            count.fetch_add(1, Ordering::SeqCst);
            notify.notify_waiters();
        }
    }

    /// Get the count of received values
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }

    /// Wait for at least n values to be received
    pub async fn wait_for_count(&self, n: u32, max_wait: Duration) -> bool {
        wait_for_count(&self.count, n, max_wait).await
    }

    /// Get all collected values
    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    /// Get the last value received
    pub fn last(&self) -> Option<T> {
        self.values.lock().last().cloned()
    }

    /// Clear all collected values
    pub fn clear(&self) {
        self.values.lock().clear();
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<T: Clone + Send + 'static> Default for EventCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

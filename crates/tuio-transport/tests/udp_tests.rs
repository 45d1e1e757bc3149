//! UDP Transport Tests (tuio-transport)
//!
//! Tests for the UDP listener including:
//! - Binding and bind failures
//! - Message and bundle delivery
//! - Garbage datagram tolerance
//! - Shutdown semantics

use parking_lot::Mutex;
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tuio_transport::{TransportError, UdpConfig, UdpListener, UdpSender};

#[derive(Default)]
struct Collector {
    messages: Mutex<Vec<(SocketAddr, OscMessage)>>,
    count: AtomicU32,
    notify: Notify,
}

impl Collector {
    fn handler(self: &Arc<Self>) -> Arc<dyn tuio_transport::PacketHandler> {
        let this = self.clone();
        Arc::new(move |from: SocketAddr, msg: OscMessage| {
            this.messages.lock().push((from, msg));
            this.count.fetch_add(1, Ordering::SeqCst);
            this.notify.notify_waiters();
        })
    }

    async fn wait_for(&self, n: u32, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count.load(Ordering::SeqCst) >= n {
                return true;
            }
            let notified = self.notify.notified();
            if self.count.load(Ordering::SeqCst) >= n {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.count.load(Ordering::SeqCst) >= n;
            }
        }
    }
}

fn tuio(cmd: &str, extra: Vec<OscType>) -> OscMessage {
    let mut args = vec![OscType::String(cmd.to_string())];
    args.extend(extra);
    OscMessage {
        addr: "/tuio/2Dcur".to_string(),
        args,
    }
}

// ============================================================================
// Binding Tests
// ============================================================================

#[tokio::test]
async fn test_bind_ephemeral_port() {
    let collector = Arc::new(Collector::default());
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .expect("Bind should succeed");

    assert!(listener.local_addr().port() > 0, "Port should be > 0");
}

#[tokio::test]
async fn test_bind_port_in_use_fails() {
    let collector = Arc::new(Collector::default());
    let first = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .unwrap();
    let taken = first.local_addr().to_string();

    let result = UdpListener::bind(&taken, UdpConfig::default(), collector.handler()).await;

    match result {
        Err(TransportError::BindFailed { addr, .. }) => assert_eq!(addr, taken),
        other => panic!("Expected BindFailed, got {:?}", other.map(|l| l.local_addr())),
    }
}

#[tokio::test]
async fn test_bind_invalid_address_fails() {
    let collector = Arc::new(Collector::default());
    let result = UdpListener::bind("not-an-address", UdpConfig::default(), collector.handler()).await;
    assert!(matches!(result, Err(TransportError::BindFailed { .. })));
}

// ============================================================================
// Delivery Tests
// ============================================================================

#[tokio::test]
async fn test_messages_delivered_in_order() {
    let collector = Arc::new(Collector::default());
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .unwrap();
    let sender = UdpSender::bind("127.0.0.1:0").await.unwrap();

    let frame = OscPacket::Bundle(OscBundle {
        timetag: OscTime::from((0, 1)),
        content: vec![
            OscPacket::Message(tuio("alive", vec![OscType::Int(1)])),
            OscPacket::Message(tuio("fseq", vec![OscType::Int(1)])),
        ],
    });
    sender
        .send_packet(&frame, listener.local_addr())
        .await
        .unwrap();

    assert!(collector.wait_for(2, Duration::from_secs(2)).await);
    let messages = collector.messages.lock();
    assert_eq!(messages[0].1.args[0], OscType::String("alive".into()));
    assert_eq!(messages[1].1.args[0], OscType::String("fseq".into()));
    assert_eq!(messages[0].0, sender.local_addr().unwrap());
}

#[tokio::test]
async fn test_garbage_datagram_is_skipped() {
    let collector = Arc::new(Collector::default());
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .unwrap();
    let sender = UdpSender::bind("127.0.0.1:0").await.unwrap();

    sender
        .send_to(b"\x00\x01garbage", listener.local_addr())
        .await
        .unwrap();
    sender
        .send_packet(
            &OscPacket::Message(tuio("fseq", vec![OscType::Int(3)])),
            listener.local_addr(),
        )
        .await
        .unwrap();

    assert!(collector.wait_for(1, Duration::from_secs(2)).await);
    assert_eq!(collector.count.load(Ordering::SeqCst), 1);
    assert!(listener.is_running());
}

#[tokio::test]
async fn test_oversized_send_rejected() {
    let config = UdpConfig {
        recv_buffer_size: 1024,
        max_packet_size: 16,
    };
    let sender = UdpSender::bind_with_config("127.0.0.1:0", config)
        .await
        .unwrap();
    let target: SocketAddr = "127.0.0.1:9".parse().unwrap();

    let result = sender.send_to(&[0u8; 64], target).await;
    assert!(matches!(result, Err(TransportError::SendFailed(_))));
}

#[tokio::test]
async fn test_small_recv_buffer_does_not_truncate() {
    let collector = Arc::new(Collector::default());
    let config = UdpConfig {
        recv_buffer_size: 8,
        ..Default::default()
    };
    let listener = UdpListener::bind("127.0.0.1:0", config, collector.handler())
        .await
        .unwrap();

    let msg = tuio(
        "set",
        vec![
            OscType::Int(1),
            OscType::Float(0.5),
            OscType::Float(0.5),
            OscType::Float(0.0),
            OscType::Float(0.0),
            OscType::Float(0.0),
        ],
    );
    let sender = UdpSender::bind("127.0.0.1:0").await.unwrap();
    sender
        .send_packet(&OscPacket::Message(msg.clone()), listener.local_addr())
        .await
        .unwrap();

    assert!(collector.wait_for(1, Duration::from_secs(2)).await);
    assert_eq!(collector.messages.lock()[0].1, msg);
}

// ============================================================================
// Shutdown Tests
// ============================================================================

#[tokio::test]
async fn test_panicking_handler_stops_listener() {
    let handler: Arc<dyn tuio_transport::PacketHandler> =
        Arc::new(|_: SocketAddr, _: OscMessage| panic!("handler failure"));
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), handler)
        .await
        .unwrap();
    assert!(listener.is_running());

    let sender = UdpSender::bind("127.0.0.1:0").await.unwrap();
    sender
        .send_packet(
            &OscPacket::Message(tuio("fseq", vec![OscType::Int(1)])),
            listener.local_addr(),
        )
        .await
        .unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while listener.is_running() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!listener.is_running());
    assert!(listener.shutdown().await.is_ok());
}

#[tokio::test]
async fn test_no_delivery_after_shutdown() {
    let collector = Arc::new(Collector::default());
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .unwrap();
    let addr = listener.local_addr();

    listener.shutdown().await.expect("Shutdown should succeed");
    assert!(!listener.is_running());

    let sender = UdpSender::bind("127.0.0.1:0").await.unwrap();
    let _ = sender
        .send_packet(&OscPacket::Message(tuio("fseq", vec![OscType::Int(1)])), addr)
        .await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(collector.count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_double_shutdown() {
    let collector = Arc::new(Collector::default());
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .unwrap();

    listener.shutdown().await.unwrap();
    let second = listener.shutdown().await;
    assert!(matches!(second, Err(TransportError::AlreadyStopped)));
}

#[tokio::test]
async fn test_port_reusable_after_shutdown() {
    let collector = Arc::new(Collector::default());
    let listener = UdpListener::bind("127.0.0.1:0", UdpConfig::default(), collector.handler())
        .await
        .unwrap();
    let addr = listener.local_addr().to_string();
    listener.shutdown().await.unwrap();

    let again = UdpListener::bind(&addr, UdpConfig::default(), collector.handler()).await;
    assert!(again.is_ok(), "Socket should be released after shutdown");
}

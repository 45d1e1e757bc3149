//! Main TUIO client implementation

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tuio_core::{
    CallbackId, CallbackList, Cursor25d, Cursor2d, FixedViewport, Object2d, OscMessage,
    ProfileKind, Reconciler, Touch, TouchEvent, Viewport,
};
use tuio_transport::{PacketHandler, UdpListener};

use crate::builder::TuioClientBuilder;
use crate::config::TuioConfig;
use crate::error::{ClientError, Result};
use crate::profiles::{ReconcilerSet, Tracked};

/// An OSC message whose address is not a TUIO profile
#[derive(Debug, Clone)]
pub struct UnrecognizedMessage {
    /// Sender IP address
    pub source: String,
    pub message: OscMessage,
}

/// Routes decoded OSC messages to the reconciler for their address
struct Dispatcher {
    reconcilers: ReconcilerSet,
    unrecognized: CallbackList<UnrecognizedMessage>,
    /// IP of every sender heard from, whatever the address
    senders: Mutex<BTreeSet<String>>,
}

impl PacketHandler for Dispatcher {
    fn handle_message(&self, from: SocketAddr, msg: OscMessage) {
        let sender = from.ip().to_string();
        {
            let mut senders = self.senders.lock();
            if !senders.contains(&sender) {
                senders.insert(sender.clone());
            }
        }

        match ProfileKind::from_address(&msg.addr) {
            Some(kind) => self.reconcilers.route(kind).handle_message(&sender, &msg),
            None if self.unrecognized.is_empty() => {
                debug!("Dropping unrecognized message {} from {}", msg.addr, sender);
            }
            None => self.unrecognized.call(&UnrecognizedMessage {
                source: sender,
                message: msg,
            }),
        }
    }
}

/// A TUIO client
///
/// Tracks cursors, objects and blobs from any number of TUIO senders. State
/// is only updated at frame boundaries, so every snapshot is a complete frame.
///
/// Callbacks run on the listener task while a reconciler lock is held. They
/// must return quickly and must not call back into the client.
pub struct TuioClient {
    config: TuioConfig,
    dispatcher: Arc<Dispatcher>,
    viewport: Arc<dyn Viewport>,
    listener: Mutex<Option<UdpListener>>,
}

impl TuioClient {
    /// Create a disconnected client with default configuration
    pub fn new() -> Self {
        Self::with_config(TuioConfig::default(), Arc::new(FixedViewport::default()))
    }

    pub fn with_config(config: TuioConfig, viewport: Arc<dyn Viewport>) -> Self {
        let reconcilers = ReconcilerSet::new(viewport.clone(), config.past_frame_threshold);
        Self {
            config,
            dispatcher: Arc::new(Dispatcher {
                reconcilers,
                unrecognized: CallbackList::new(),
                senders: Mutex::new(BTreeSet::new()),
            }),
            viewport,
            listener: Mutex::new(None),
        }
    }

    /// Create a builder
    pub fn builder() -> TuioClientBuilder {
        TuioClientBuilder::new()
    }

    pub fn config(&self) -> &TuioConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Arc<dyn Viewport> {
        &self.viewport
    }

    /// Bind a UDP listener on `port` and start tracking
    ///
    /// Port 0 binds an ephemeral port; see [`TuioClient::local_addr`].
    pub async fn connect(&self, port: u16) -> Result<()> {
        {
            let mut slot = self.listener.lock();
            match slot.as_ref().map(|l| l.is_running()) {
                Some(true) => return Err(ClientError::AlreadyConnected),
                Some(false) => {
                    if let Some(stopped) = slot.take() {
                        warn!("Replacing stopped listener on {}", stopped.local_addr());
                    }
                }
                None => {}
            }
        }

        let addr = self.config.listen_addr(port)?;
        let handler: Arc<dyn PacketHandler> = self.dispatcher.clone();
        let listener =
            UdpListener::bind(&addr.to_string(), self.config.udp_config(), handler).await?;
        let local = listener.local_addr();

        {
            let mut slot = self.listener.lock();
            if slot.is_none() {
                *slot = Some(listener);
                info!("TUIO client listening on {}", local);
                return Ok(());
            }
        }

        // lost a race with a concurrent connect
        listener.shutdown().await?;
        Err(ClientError::AlreadyConnected)
    }

    /// Stop the listener
    ///
    /// Waits for in-flight messages to finish, so no callback fires after this
    /// returns. Tracked state is kept.
    pub async fn disconnect(&self) -> Result<()> {
        let listener = self.listener.lock().take();
        let Some(listener) = listener else {
            return Err(ClientError::NotConnected);
        };

        listener.shutdown().await?;
        info!("TUIO client on {} disconnected", listener.local_addr());
        Ok(())
    }

    /// True while the listener is receiving; false after `disconnect` or
    /// after a panicking callback stopped the listener
    pub fn is_connected(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .map(|l| l.is_running())
            .unwrap_or(false)
    }

    /// Bound listener address, if connected
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.lock().as_ref().map(|l| l.local_addr())
    }

    pub fn past_frame_threshold(&self) -> i32 {
        self.reconcilers().get::<Cursor2d>().past_frame_threshold()
    }

    pub fn set_past_frame_threshold(&self, threshold: i32) {
        self.reconcilers().set_past_frame_threshold(threshold);
    }

    /// Drop all tracked state from every source
    pub fn reset(&self) {
        self.reconcilers().reset();
        self.dispatcher.senders.lock().clear();
    }

    pub fn reconcilers(&self) -> &ReconcilerSet {
        &self.dispatcher.reconcilers
    }

    pub fn reconciler<P: Tracked>(&self) -> &Reconciler<P> {
        self.reconcilers().get::<P>()
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Committed instances of `P`; `None` aggregates all sources
    pub fn instances<P: Tracked>(&self, source: Option<&str>) -> Vec<P> {
        self.reconciler::<P>().instances(source)
    }

    pub fn cursors(&self, source: Option<&str>) -> Vec<Cursor2d> {
        self.instances(source)
    }

    pub fn cursors25d(&self, source: Option<&str>) -> Vec<Cursor25d> {
        self.instances(source)
    }

    pub fn objects(&self, source: Option<&str>) -> Vec<Object2d> {
        self.instances(source)
    }

    /// Every sender IP heard from on any address, plus names announced by
    /// "source" messages
    pub fn sources(&self) -> BTreeSet<String> {
        let mut all = self.reconcilers().sources();
        all.extend(self.dispatcher.senders.lock().iter().cloned());
        all
    }

    /// Current 2D cursors as touches on the viewport
    pub fn active_touches(&self, source: Option<&str>) -> Vec<Touch> {
        self.reconciler::<Cursor2d>().active_touches(source)
    }

    // =========================================================================
    // Generic subscriptions
    // =========================================================================

    pub fn on_added<P: Tracked, F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.reconciler::<P>().added().register(callback)
    }

    pub fn on_updated<P: Tracked, F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.reconciler::<P>().updated().register(callback)
    }

    pub fn on_removed<P: Tracked, F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.reconciler::<P>().removed().register(callback)
    }

    pub fn unregister_added<P: Tracked>(&self, id: CallbackId) -> bool {
        self.reconciler::<P>().added().unregister(id)
    }

    pub fn unregister_updated<P: Tracked>(&self, id: CallbackId) -> bool {
        self.reconciler::<P>().updated().unregister(id)
    }

    pub fn unregister_removed<P: Tracked>(&self, id: CallbackId) -> bool {
        self.reconciler::<P>().removed().unregister(id)
    }

    /// Subscribe to OSC messages on addresses that are not TUIO profiles
    pub fn on_unrecognized<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&UnrecognizedMessage) + Send + Sync + 'static,
    {
        self.dispatcher.unrecognized.register(callback)
    }

    pub fn unregister_unrecognized(&self, id: CallbackId) -> bool {
        self.dispatcher.unrecognized.unregister(id)
    }

    // =========================================================================
    // Cursors
    // =========================================================================

    pub fn register_cursor_added<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Cursor2d) + Send + Sync + 'static,
    {
        self.on_added::<Cursor2d, F>(callback)
    }

    pub fn register_cursor_updated<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Cursor2d) + Send + Sync + 'static,
    {
        self.on_updated::<Cursor2d, F>(callback)
    }

    pub fn register_cursor_removed<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Cursor2d) + Send + Sync + 'static,
    {
        self.on_removed::<Cursor2d, F>(callback)
    }

    pub fn unregister_cursor_added(&self, id: CallbackId) -> bool {
        self.unregister_added::<Cursor2d>(id)
    }

    pub fn unregister_cursor_updated(&self, id: CallbackId) -> bool {
        self.unregister_updated::<Cursor2d>(id)
    }

    pub fn unregister_cursor_removed(&self, id: CallbackId) -> bool {
        self.unregister_removed::<Cursor2d>(id)
    }

    // =========================================================================
    // 2.5D Cursors
    // =========================================================================

    pub fn register_cursor25d_added<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Cursor25d) + Send + Sync + 'static,
    {
        self.on_added::<Cursor25d, F>(callback)
    }

    pub fn register_cursor25d_updated<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Cursor25d) + Send + Sync + 'static,
    {
        self.on_updated::<Cursor25d, F>(callback)
    }

    pub fn register_cursor25d_removed<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Cursor25d) + Send + Sync + 'static,
    {
        self.on_removed::<Cursor25d, F>(callback)
    }

    pub fn unregister_cursor25d_added(&self, id: CallbackId) -> bool {
        self.unregister_added::<Cursor25d>(id)
    }

    pub fn unregister_cursor25d_updated(&self, id: CallbackId) -> bool {
        self.unregister_updated::<Cursor25d>(id)
    }

    pub fn unregister_cursor25d_removed(&self, id: CallbackId) -> bool {
        self.unregister_removed::<Cursor25d>(id)
    }

    // =========================================================================
    // Objects
    // =========================================================================

    pub fn register_object_added<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Object2d) + Send + Sync + 'static,
    {
        self.on_added::<Object2d, F>(callback)
    }

    pub fn register_object_updated<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Object2d) + Send + Sync + 'static,
    {
        self.on_updated::<Object2d, F>(callback)
    }

    pub fn register_object_removed<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&Object2d) + Send + Sync + 'static,
    {
        self.on_removed::<Object2d, F>(callback)
    }

    pub fn unregister_object_added(&self, id: CallbackId) -> bool {
        self.unregister_added::<Object2d>(id)
    }

    pub fn unregister_object_updated(&self, id: CallbackId) -> bool {
        self.unregister_updated::<Object2d>(id)
    }

    pub fn unregister_object_removed(&self, id: CallbackId) -> bool {
        self.unregister_removed::<Object2d>(id)
    }

    // =========================================================================
    // Touches (2D cursors)
    // =========================================================================

    pub fn register_touches_began<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&TouchEvent) + Send + Sync + 'static,
    {
        self.reconciler::<Cursor2d>().touches_began().register(callback)
    }

    pub fn register_touches_moved<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&TouchEvent) + Send + Sync + 'static,
    {
        self.reconciler::<Cursor2d>().touches_moved().register(callback)
    }

    pub fn register_touches_ended<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&TouchEvent) + Send + Sync + 'static,
    {
        self.reconciler::<Cursor2d>().touches_ended().register(callback)
    }

    pub fn unregister_touches_began(&self, id: CallbackId) -> bool {
        self.reconciler::<Cursor2d>().touches_began().unregister(id)
    }

    pub fn unregister_touches_moved(&self, id: CallbackId) -> bool {
        self.reconciler::<Cursor2d>().touches_moved().unregister(id)
    }

    pub fn unregister_touches_ended(&self, id: CallbackId) -> bool {
        self.reconciler::<Cursor2d>().touches_ended().unregister(id)
    }
}

impl Default for TuioClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TuioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuioClient")
            .field("config", &self.config)
            .field("local_addr", &self.local_addr())
            .finish_non_exhaustive()
    }
}

//! TUIO Core
//!
//! Protocol primitives for TUIO 1.1 (multi-touch and tangible object tracking
//! over OSC).
//!
//! This crate provides:
//! - Profile value types for cursors, objects and blobs ([`Profile`])
//! - Positional decoding of "set"/"alive"/"fseq"/"source" messages ([`decode`])
//! - Frame reconciliation with stale-frame rejection ([`Reconciler`])
//! - Touch synthesis scaled to a host viewport ([`Touch`], [`Viewport`])
//! - Ordered callback lists with removable handles ([`CallbackList`])
//!
//! Nothing here touches the network; see `tuio-transport` and `tuio-client`.

pub mod address;
pub mod callback;
pub mod decode;
pub mod error;
pub mod profile;
pub mod reconciler;
pub mod touch;

pub use address::{Command, ProfileKind};
pub use callback::{CallbackId, CallbackList};
pub use error::{Error, Result};
pub use profile::{
    Blob25d, Blob2d, Blob3d, Cursor25d, Cursor2d, Cursor3d, Object25d, Object2d, Object3d,
    Profile, INVALID_SESSION_ID,
};
pub use reconciler::{
    MessageHandler, PendingCounts, Reconciler, DEFAULT_PAST_FRAME_THRESHOLD, UPDATE_FRAME,
};
pub use touch::{DynamicViewport, FixedViewport, NativeEvent, Touch, TouchEvent, Viewport};

pub use rosc::{OscMessage, OscType};

/// Default TUIO UDP port
pub const DEFAULT_TUIO_PORT: u16 = 3333;

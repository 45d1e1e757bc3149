//! TUIO Client Library
//!
//! Receives TUIO 1.1 over OSC/UDP and keeps a frame-consistent view of every
//! cursor, object and blob each sender reports.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tuio_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = TuioClient::builder()
//!         .port(3333)
//!         .viewport(Arc::new(FixedViewport::new(1920.0, 1080.0)))
//!         .connect()
//!         .await?;
//!
//!     client.register_touches_began(|event| {
//!         println!("{} touches began from {}", event.len(), event.source);
//!     });
//!
//!     for cursor in client.cursors(None) {
//!         println!("{} at {:?}", cursor.session_id, cursor.position);
//!     }
//!
//!     client.disconnect().await
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod profiles;
pub mod shared;

pub use builder::TuioClientBuilder;
pub use client::{TuioClient, UnrecognizedMessage};
pub use config::TuioConfig;
pub use error::{ClientError, Result};
pub use profiles::{ReconcilerSet, Tracked};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::builder::TuioClientBuilder;
    pub use crate::client::{TuioClient, UnrecognizedMessage};
    pub use crate::config::TuioConfig;
    pub use crate::error::{ClientError, Result};
    pub use tuio_core::{
        Blob25d, Blob2d, Blob3d, CallbackId, Cursor25d, Cursor2d, Cursor3d, DynamicViewport,
        FixedViewport, Object25d, Object2d, Object3d, Profile, Touch, TouchEvent, Viewport,
    };
}

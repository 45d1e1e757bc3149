//! Process-wide default client
//!
//! For applications that want one TUIO client without threading it through
//! their own state. The client is created on first use and lives until
//! [`shutdown`] is called.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::client::TuioClient;
use crate::error::ClientError;
use crate::Result;

static DEFAULT_CLIENT: Mutex<Option<Arc<TuioClient>>> = Mutex::new(None);

/// The shared client, created disconnected with default settings if needed
pub fn default_client() -> Arc<TuioClient> {
    let mut slot = DEFAULT_CLIENT.lock();
    slot.get_or_insert_with(|| {
        debug!("Creating shared TUIO client");
        Arc::new(TuioClient::new())
    })
    .clone()
}

/// Install `client` as the shared instance, returning the previous one
pub fn set_default_client(client: Arc<TuioClient>) -> Option<Arc<TuioClient>> {
    DEFAULT_CLIENT.lock().replace(client)
}

/// Disconnect and drop the shared client
///
/// A later [`default_client`] call creates a fresh one.
pub async fn shutdown() -> Result<()> {
    let client = DEFAULT_CLIENT.lock().take();
    if let Some(client) = client {
        match client.disconnect().await {
            Ok(()) | Err(ClientError::NotConnected) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

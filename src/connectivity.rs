//! Network connectivity abstraction and bounded reconnect

use crate::{clock::Clock, error::FetchError};
use async_trait::async_trait;

/// Link to the network (WiFi station, ethernet, ...)
#[async_trait]
pub trait Connectivity: Send + Sync {
    /// Whether the link is up right now
    fn is_connected(&self) -> bool;

    /// Starts (re)joining the network
    ///
    /// Must return promptly. Returns true if the link is already up when the
    /// call completes; otherwise the caller polls [`Connectivity::is_connected`].
    async fn reconnect(&self) -> bool;
}

/// Connectivity for hosted builds where the OS owns the network
///
/// Always reports connected; failures show up as transport errors instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostNetwork;

#[async_trait]
impl Connectivity for HostNetwork {
    fn is_connected(&self) -> bool {
        true
    }

    async fn reconnect(&self) -> bool {
        true
    }
}

/// Makes sure the link is up, waiting at most `window_ms`
///
/// Issues one reconnect, then polls every `poll_ms` on `clock`. Returns
/// [`FetchError::Disconnected`] once the window has elapsed without a link.
pub async fn ensure_connected(
    connectivity: &dyn Connectivity,
    clock: &dyn Clock,
    window_ms: u32,
    poll_ms: u32,
) -> Result<(), FetchError> {
    if connectivity.is_connected() {
        return Ok(());
    }

    let started = clock.now();
    tracing::info!(window_ms, "Network down, reconnecting");

    if connectivity.reconnect().await {
        tracing::info!("Reconnected");
        return Ok(());
    }

    loop {
        let waited = clock.now().wrapping_since(started);
        if waited >= window_ms {
            tracing::warn!(waited_ms = waited, "Reconnect window expired");
            return Err(FetchError::Disconnected);
        }

        clock.sleep(poll_ms.min(window_ms - waited)).await;

        if connectivity.is_connected() {
            tracing::info!(
                waited_ms = clock.now().wrapping_since(started),
                "Reconnected"
            );
            return Ok(());
        }
    }
}

//! Host bridge abstraction
//!
//! The bridge is the channel between the SDK and the mini app host. The SDK
//! only ever posts method calls outward and listens for named events; the
//! transport behind it (postMessage, webview handler, test harness) is up to
//! the implementor.

pub mod local;
pub mod methods;

use crate::error::BridgeError;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub use local::{LocalBridge, OutboundEvent};
pub use methods::{SetupMainButtonParams, MAIN_BUTTON_FIELDS, SETUP_MAIN_BUTTON};

/// Event emitted by the host when the user taps the main button
pub const MAIN_BUTTON_PRESSED: &str = "main_button_pressed";

/// Listener for inbound host events
///
/// Listeners are compared by pointer identity, so keep the `Arc` around if
/// you intend to remove it with [`Bridge::off`].
pub type EventListener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Wrap a closure into an [`EventListener`]
pub fn listener<F>(f: F) -> EventListener
where
    F: Fn(&Value) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Transport to the mini app host
///
/// All methods are synchronous. Implementations must not call back into the
/// SDK while holding internal locks.
pub trait Bridge: Send + Sync {
    /// Send a method call to the host
    fn post_event(&self, method: &str, params: Option<Value>) -> Result<(), BridgeError>;

    /// Register a listener for a host event
    fn on(&self, event: &str, listener: EventListener);

    /// Remove a previously registered listener; returns whether it was found
    fn off(&self, event: &str, listener: &EventListener) -> bool;
}

/// Serialize `params` and post them as `method`
pub fn post_method<P>(bridge: &dyn Bridge, method: &str, params: &P) -> Result<(), BridgeError>
where
    P: Serialize + ?Sized,
{
    let payload = serde_json::to_value(params).map_err(|source| BridgeError::Payload {
        method: method.to_string(),
        source,
    })?;

    debug!(method, payload = %payload, "Posting bridge event");
    bridge.post_event(method, Some(payload))
}

/// Removes a bridge listener when invoked
///
/// Dropping the handle without calling [`Unsubscribe::unsubscribe`] leaves
/// the listener registered.
pub struct Unsubscribe(Option<Box<dyn FnOnce() + Send + Sync>>);

impl Unsubscribe {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self(Some(Box::new(f)))
    }

    /// Remove the listener this handle was created for
    pub fn unsubscribe(mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Unsubscribe")
            .field(&if self.0.is_some() { "pending" } else { "done" })
            .finish()
    }
}

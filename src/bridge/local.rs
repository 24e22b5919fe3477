//! LocalBridge - in-process bridge for tests and the playground
//!
//! Keeps a listener registry per event name, records every outbound call and
//! forwards it to optional sinks (e.g. a console printer). Host failures can
//! be simulated by closing the bridge or rejecting single methods.

use super::{Bridge, EventListener};
use crate::error::BridgeError;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

type OutboundSink = Arc<dyn Fn(&OutboundEvent) + Send + Sync>;

/// A method call posted to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEvent {
    pub method: String,
    pub params: Option<Value>,
    /// Milliseconds since epoch
    pub ts: u64,
}

/// In-process [`Bridge`] implementation
#[derive(Default)]
pub struct LocalBridge {
    listeners: RwLock<HashMap<String, Vec<EventListener>>>,
    sinks: RwLock<Vec<OutboundSink>>,
    sent: RwLock<Vec<OutboundEvent>>,
    /// Methods the simulated host refuses, with the refusal reason
    rejected: RwLock<HashMap<String, String>>,
    closed: AtomicBool,
}

impl LocalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every outbound event to `sink` as well as recording it
    pub fn add_sink<F>(&self, sink: F)
    where
        F: Fn(&OutboundEvent) + Send + Sync + 'static,
    {
        self.sinks.write().push(Arc::new(sink));
    }

    /// Deliver a host event to registered listeners
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, event: &str, payload: Value) -> usize {
        let listeners: Vec<EventListener> = self
            .listeners
            .read()
            .get(event)
            .cloned()
            .unwrap_or_default();

        trace!(event, listeners = listeners.len(), "Dispatching host event");
        for listener in &listeners {
            listener(&payload);
        }
        listeners.len()
    }

    /// Number of listeners registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }

    /// All outbound events recorded so far
    pub fn sent_events(&self) -> Vec<OutboundEvent> {
        self.sent.read().clone()
    }

    /// Drain recorded outbound events
    pub fn take_sent(&self) -> Vec<OutboundEvent> {
        std::mem::take(&mut *self.sent.write())
    }

    /// Simulate the host going away; subsequent posts fail
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Make the simulated host refuse `method` until [`LocalBridge::accept`]
    pub fn reject(&self, method: &str, reason: impl Into<String>) {
        self.rejected.write().insert(method.to_string(), reason.into());
    }

    /// Stop refusing `method`
    pub fn accept(&self, method: &str) {
        self.rejected.write().remove(method);
    }
}

impl Bridge for LocalBridge {
    fn post_event(&self, method: &str, params: Option<Value>) -> Result<(), BridgeError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BridgeError::Closed);
        }
        if let Some(reason) = self.rejected.read().get(method) {
            return Err(BridgeError::Rejected {
                method: method.to_string(),
                reason: reason.clone(),
            });
        }

        let event = OutboundEvent {
            method: method.to_string(),
            params,
            ts: chrono::Utc::now().timestamp_millis() as u64,
        };

        self.sent.write().push(event.clone());

        let sinks: Vec<OutboundSink> = self.sinks.read().clone();
        for sink in sinks {
            sink(&event);
        }

        debug!(method, "Outbound event recorded");
        Ok(())
    }

    fn on(&self, event: &str, listener: EventListener) {
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    fn off(&self, event: &str, listener: &EventListener) -> bool {
        let mut listeners = self.listeners.write();
        let Some(registered) = listeners.get_mut(event) else {
            return false;
        };

        match registered.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(index) => {
                registered.remove(index);
                if registered.is_empty() {
                    listeners.remove(event);
                }
                true
            }
            None => false,
        }
    }
}

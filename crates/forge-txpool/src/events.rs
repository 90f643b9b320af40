//! Pool event bus
//!
//! Synchronous broadcast to registered handlers. The pool collects events
//! while holding its internal lock and drains them afterwards, so handlers
//! observe index mutations that are already visible. Handlers must not call
//! back into mutating pool operations.

use forge_primitives::H256;
use parking_lot::RwLock;

/// Why a transaction left the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveReason {
    /// Displaced by capacity arbitration (global or per-account)
    PoolFull,
    /// Exceeded the configured expiry age
    Expired,
    /// Removed by an external caller, e.g. after block inclusion
    Explicit,
    /// Displaced by a same-nonce replacement
    Replaced,
}

/// A pool state change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolEvent {
    /// A transaction entered the pool
    Added {
        /// Transaction id
        id: H256,
    },
    /// A transaction left the pool
    Removed {
        /// Transaction id
        id: H256,
        /// Why it left
        reason: RemoveReason,
    },
}

type EventHandler = Box<dyn Fn(&PoolEvent) + Send + Sync>;

/// Synchronous observer channel for pool events
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<EventHandler>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for all future events
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&PoolEvent) + Send + Sync + 'static,
    {
        self.handlers.write().push(Box::new(handler));
    }

    /// Broadcast a single event to every handler
    pub fn emit(&self, event: &PoolEvent) {
        for handler in self.handlers.read().iter() {
            handler(event);
        }
    }

    /// Broadcast a batch of events in order
    pub fn emit_all(&self, events: &[PoolEvent]) {
        if events.is_empty() {
            return;
        }
        let handlers = self.handlers.read();
        for event in events {
            for handler in handlers.iter() {
                handler(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_subscribe_and_emit() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(move |event| sink.lock().push(*event));

        let id = H256::from_bytes([1u8; 32]);
        bus.emit(&PoolEvent::Added { id });
        bus.emit(&PoolEvent::Removed {
            id,
            reason: RemoveReason::Explicit,
        });

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], PoolEvent::Added { id });
    }

    #[test]
    fn test_emit_all_preserves_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(move |event| sink.lock().push(*event));

        let a = H256::from_bytes([1u8; 32]);
        let b = H256::from_bytes([2u8; 32]);
        bus.emit_all(&[
            PoolEvent::Removed {
                id: a,
                reason: RemoveReason::PoolFull,
            },
            PoolEvent::Added { id: b },
        ]);

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], PoolEvent::Removed { .. }));
        assert!(matches!(seen[1], PoolEvent::Added { .. }));
    }

    #[test]
    fn test_no_handlers_is_noop() {
        let bus = EventBus::new();
        bus.emit(&PoolEvent::Added {
            id: H256::ZERO,
        });
    }
}

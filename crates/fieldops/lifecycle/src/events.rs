//! Dispatch events - explicit notification instead of coupled side effects
//!
//! Collaborators that used to be mutated inline (technician availability,
//! the review/invoicing desk) subscribe to these events instead.

use fieldops_types::{TechnicianId, WorkOrderId};
use std::sync::Mutex;

/// An event raised by a lifecycle command after it has been persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A technician was assigned (or reassigned) to an order
    OrderAssigned {
        order_id: WorkOrderId,
        technician_id: TechnicianId,
    },
    /// Site work finished; the order is ready for review and invoicing
    OrderCompleted { order_id: WorkOrderId },
    /// The order was cancelled before completion
    OrderCancelled { order_id: WorkOrderId },
}

/// Observer for dispatch events
pub trait DispatchNotifier: Send + Sync {
    fn notify(&self, event: DispatchEvent);
}

/// Discards all events
#[derive(Default)]
pub struct NullNotifier;

impl DispatchNotifier for NullNotifier {
    fn notify(&self, _event: DispatchEvent) {}
}

/// Records events for inspection in tests
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<DispatchEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl DispatchNotifier for RecordingNotifier {
    fn notify(&self, event: DispatchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

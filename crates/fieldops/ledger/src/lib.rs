//! Tracking ledger - append-only event history for a work order
//!
//! The ledger records immutable, timestamped facts: check-ins, check-outs,
//! location updates, status changes and system notices. It performs no
//! validation of its own - deciding whether an event may happen is the
//! lifecycle engine's job. Under the single-writer model, insertion order
//! equals chronological order for a single work order, and no API exists to
//! edit or remove an entry once appended.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use fieldops_types::{GeoPoint, LogId, TrackingEvent, TrackingLog, WorkOrder};

/// Append an event to a work order's tracking history.
///
/// Returns the identifier of the new entry. The entry's position in
/// `tracking_logs` is final.
pub fn append(
    order: &mut WorkOrder,
    event: TrackingEvent,
    location: Option<GeoPoint>,
    note: Option<String>,
    at: DateTime<Utc>,
) -> LogId {
    let entry = TrackingLog {
        id: fieldops_sequencer::tracking_log_id(at),
        timestamp: at,
        event,
        location,
        note,
    };
    let id = entry.id.clone();
    order.tracking_logs.push(entry);
    id
}

/// Audit check: entries are in non-decreasing timestamp order matching
/// append order.
pub fn is_chronological(order: &WorkOrder) -> bool {
    order
        .tracking_logs
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
}

/// Entries of a given kind, in append order.
pub fn entries_of<'a>(order: &'a WorkOrder, event: TrackingEvent) -> Vec<&'a TrackingLog> {
    order
        .tracking_logs
        .iter()
        .filter(|log| log.event == event)
        .collect()
}

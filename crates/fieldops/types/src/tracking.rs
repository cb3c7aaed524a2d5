//! Tracking logs: immutable facts about a work order's history
//!
//! A tracking log entry is created only as a side effect of a lifecycle
//! operation and is owned by its parent work order. Once appended it is
//! never edited or removed.

use crate::{GeoPoint, LogId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of event recorded in a tracking log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingEvent {
    #[serde(rename = "CHECK_IN")]
    CheckIn,
    #[serde(rename = "CHECK_OUT")]
    CheckOut,
    #[serde(rename = "LOCATION_UPDATE")]
    LocationUpdate,
    #[serde(rename = "STATUS_CHANGE")]
    StatusChange,
    #[serde(rename = "SYSTEM_AUTO")]
    SystemAuto,
}

/// An immutable entry in a work order's tracking history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingLog {
    pub id: LogId,
    pub timestamp: DateTime<Utc>,
    pub event: TrackingEvent,
    /// Captured position, when the device supplied one
    pub location: Option<GeoPoint>,
    pub note: Option<String>,
}

/// Format a duration in whole seconds as an `HH:MM:SS` clock string.
pub fn format_clock_seconds(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

//! Work orders: the unit of dispatched work
//!
//! A work order is created in `Pending`, assigned to a technician, driven
//! through the on-site check-in/check-out protocol, completed, handed over
//! and finally invoiced. Cancellation is a terminal status, never a removal.

use crate::{ClientId, ContractId, TechnicianId, TrackingLog, WorkOrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job scope categories offered by the service company
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobScope {
    #[serde(rename = "Card Access Systems")]
    CardAccess,
    #[serde(rename = "CCTV Systems")]
    Cctv,
    #[serde(rename = "Intercom Systems")]
    Intercom,
    #[serde(rename = "Biometrics")]
    Biometrics,
    #[serde(rename = "ANPR Integration")]
    Anpr,
    #[serde(rename = "Barrier Systems")]
    Barrier,
    #[serde(rename = "Others")]
    Others,
}

impl fmt::Display for JobScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobScope::CardAccess => "Card Access Systems",
            JobScope::Cctv => "CCTV Systems",
            JobScope::Intercom => "Intercom Systems",
            JobScope::Biometrics => "Biometrics",
            JobScope::Anpr => "ANPR Integration",
            JobScope::Barrier => "Barrier Systems",
            JobScope::Others => "Others",
        };
        write!(f, "{}", label)
    }
}

/// Dispatch priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderPriority {
    #[serde(rename = "Low")]
    Low,
    #[default]
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Urgent")]
    Urgent,
}

/// Work order status - a closed enumeration with an explicit transition table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Assigned")]
    Assigned,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Handover")]
    Handover,
    #[serde(rename = "Invoiced")]
    Invoiced,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl WorkOrderStatus {
    /// Transition allow-list keyed by (current, requested).
    ///
    /// `Assigned -> Assigned` is permitted: reassignment to another
    /// technician. `Invoiced` and `Cancelled` are terminal. Anything outside
    /// this table requires the administrator override, which is always
    /// logged.
    pub fn can_transition(self, to: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        matches!(
            (self, to),
            (Pending, Assigned)
                | (Pending, Cancelled)
                | (Assigned, Assigned)
                | (Assigned, Completed)
                | (Assigned, Cancelled)
                | (Completed, Handover)
                | (Completed, Invoiced)
                | (Handover, Invoiced)
        )
    }

    /// Position in the forward ordering. Used only to label administrator
    /// overrides that move a work order backward.
    pub fn rank(self) -> u8 {
        match self {
            WorkOrderStatus::Pending => 0,
            WorkOrderStatus::Assigned => 1,
            WorkOrderStatus::Completed => 2,
            WorkOrderStatus::Handover => 3,
            WorkOrderStatus::Invoiced => 4,
            WorkOrderStatus::Cancelled => 5,
        }
    }

    /// Terminal statuses accept no further transitions outside the
    /// administrator override.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkOrderStatus::Invoiced | WorkOrderStatus::Cancelled)
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkOrderStatus::Pending => "Pending",
            WorkOrderStatus::Assigned => "Assigned",
            WorkOrderStatus::Completed => "Completed",
            WorkOrderStatus::Handover => "Handover",
            WorkOrderStatus::Invoiced => "Invoiced",
            WorkOrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

/// How the work order entered the system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSource {
    #[serde(rename = "AD_HOC")]
    AdHoc,
    #[serde(rename = "MAINTENANCE")]
    Maintenance,
    #[serde(rename = "CLIENT_PORTAL")]
    ClientPortal,
}

/// A geographic coordinate reported by a technician's device
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A note on the internal thread of a work order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InternalNote {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A single dispatched job, tracked from request to invoicing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Immutable identifier, allocated at creation
    pub id: WorkOrderId,
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub client_address: String,
    pub client_contact: String,
    pub client_email: String,
    pub job_scope: JobScope,
    pub priority: WorkOrderPriority,
    pub description: String,
    pub status: WorkOrderStatus,
    /// Display name of the assigned technician
    pub assigned_technician: Option<String>,
    pub assigned_technician_id: Option<TechnicianId>,
    pub created_at: DateTime<Utc>,
    pub source: OrderSource,
    /// Originating contract, for maintenance-generated orders
    pub contract_id: Option<ContractId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_notes: Vec<InternalNote>,
    /// Set once, at check-in
    pub check_in_time: Option<DateTime<Utc>>,
    /// Set once, at check-out; requires `check_in_time`
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_location: Option<GeoPoint>,
    pub check_out_location: Option<GeoPoint>,
    /// Present only while checked in and not yet checked out
    pub current_location: Option<GeoPoint>,
    /// Frozen at check-out: floor((check_out - check_in) / 1s), never negative
    pub total_duration_seconds: Option<u64>,
    /// Append-only history; insertion order equals chronological order
    #[serde(default)]
    pub tracking_logs: Vec<TrackingLog>,
}

impl WorkOrder {
    /// A visit is live between check-in and check-out.
    pub fn is_on_site(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_none()
    }

    pub fn has_checked_in(&self) -> bool {
        self.check_in_time.is_some()
    }

    pub fn has_checked_out(&self) -> bool {
        self.check_out_time.is_some()
    }
}

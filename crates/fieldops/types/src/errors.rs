//! Error types for dispatch operations

use crate::{ContractId, TechnicianId, WorkOrderId, WorkOrderStatus};

/// Errors that can occur in dispatch operations
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Work order not found: {0}")]
    OrderNotFound(WorkOrderId),

    #[error("Maintenance contract not found: {0}")]
    ContractNotFound(ContractId),

    #[error("Technician not found: {0}")]
    TechnicianNotFound(TechnicianId),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: WorkOrderStatus,
        to: WorkOrderStatus,
    },

    #[error("Work order {0} must be assigned before check-in")]
    NotAssigned(WorkOrderId),

    #[error("Work order {0} is already checked in; check out before checking in again")]
    AlreadyCheckedIn(WorkOrderId),

    #[error("Work order {0} has no check-in; cannot compute a visit duration")]
    NotCheckedIn(WorkOrderId),

    #[error("Work order {0} is already checked out")]
    AlreadyCheckedOut(WorkOrderId),

    #[error("Work order {0} must be checked out before completion")]
    NotCheckedOut(WorkOrderId),

    #[error("Live tracking is closed for work order {0}")]
    TrackingClosed(WorkOrderId),

    #[error("Work order {id} is in terminal status {status}")]
    Terminal {
        id: WorkOrderId,
        status: WorkOrderStatus,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

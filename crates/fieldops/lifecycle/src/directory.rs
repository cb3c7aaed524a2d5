//! Technician directory boundary
//!
//! The directory is an external collaborator: this core only needs to
//! resolve a technician reference when assigning an order. Availability
//! bookkeeping happens on the collaborator's side, driven by dispatch
//! events.

use fieldops_types::TechnicianId;
use std::collections::HashMap;

/// A resolved technician reference
#[derive(Clone, Debug)]
pub struct TechnicianRef {
    pub id: TechnicianId,
    pub name: String,
}

/// Lookup interface the engine uses to validate assignments
pub trait TechnicianDirectory: Send + Sync {
    fn lookup(&self, id: &TechnicianId) -> Option<TechnicianRef>;
}

/// A fixed roster, suitable for tests and single-process deployments
#[derive(Default)]
pub struct StaticDirectory {
    roster: HashMap<TechnicianId, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_technician(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.roster.insert(TechnicianId::new(id), name.into());
        self
    }
}

impl TechnicianDirectory for StaticDirectory {
    fn lookup(&self, id: &TechnicianId) -> Option<TechnicianRef> {
        self.roster.get(id).map(|name| TechnicianRef {
            id: id.clone(),
            name: name.clone(),
        })
    }
}

//! Site handover: the signed record produced after a completed job

use crate::{HandoverId, WorkOrderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Items confirmed with the client at handover
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct HandoverChecklist {
    pub system_tested: bool,
    pub area_cleaned: bool,
    pub manuals_explained: bool,
    pub defects_reported: bool,
}

impl HandoverChecklist {
    /// All mandatory items confirmed (defect reporting is situational).
    pub fn is_complete(&self) -> bool {
        self.system_tested && self.area_cleaned && self.manuals_explained
    }
}

/// The handover record signed off by the client representative
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteHandover {
    pub id: HandoverId,
    pub work_order_id: WorkOrderId,
    pub client_name: String,
    pub technician_name: String,
    pub handover_date: DateTime<Utc>,
    pub checklist: HandoverChecklist,
    pub client_signature_name: String,
    pub remarks: String,
}

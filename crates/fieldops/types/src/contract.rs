//! Maintenance contracts: standing recurring-service agreements
//!
//! An active contract spawns a fresh work order every time its
//! `next_service_date` comes due. The date advances by exactly one frequency
//! period per generated order, computed from the previous due date so a late
//! scheduler run never compresses or skips the cadence.

use crate::{ClientId, ContractId, JobScope};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a contract's service visit recurs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceFrequency {
    #[serde(rename = "Monthly")]
    Monthly,
    #[serde(rename = "Quarterly")]
    Quarterly,
    #[serde(rename = "Bi-Annually")]
    BiAnnually,
    #[serde(rename = "Annually")]
    Annually,
}

impl MaintenanceFrequency {
    /// Length of one recurrence period in calendar months
    pub fn period_months(self) -> u32 {
        match self {
            MaintenanceFrequency::Monthly => 1,
            MaintenanceFrequency::Quarterly => 3,
            MaintenanceFrequency::BiAnnually => 6,
            MaintenanceFrequency::Annually => 12,
        }
    }

    /// Advance a due date by one period of this frequency.
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn advance(self, from: NaiveDate) -> NaiveDate {
        from.checked_add_months(Months::new(self.period_months()))
            .unwrap_or(from)
    }
}

/// Contract standing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "SUSPENDED")]
    Suspended,
    #[serde(rename = "EXPIRED")]
    Expired,
}

/// A standing recurring-service agreement
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaintenanceContract {
    pub id: ContractId,
    pub client_id: ClientId,
    pub client_name: String,
    pub job_scope: JobScope,
    pub frequency: MaintenanceFrequency,
    pub description: String,
    pub start_date: NaiveDate,
    /// Next due date; always >= the date of the most recently generated order
    pub next_service_date: NaiveDate,
    pub status: ContractStatus,
    /// Per-visit value of the contract
    pub contract_value: f64,
}

impl MaintenanceContract {
    /// Administrator creation: the first service falls due on the start date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ContractId,
        client_id: ClientId,
        client_name: impl Into<String>,
        job_scope: JobScope,
        frequency: MaintenanceFrequency,
        description: impl Into<String>,
        start_date: NaiveDate,
        contract_value: f64,
    ) -> Self {
        Self {
            id,
            client_id,
            client_name: client_name.into(),
            job_scope,
            frequency,
            description: description.into(),
            start_date,
            next_service_date: start_date,
            status: ContractStatus::Active,
            contract_value,
        }
    }

    /// Due when active and the next service date is on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.status == ContractStatus::Active && self.next_service_date <= today
    }
}

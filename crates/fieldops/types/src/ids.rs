//! Identifier newtypes
//!
//! Domain identifiers are human-readable strings whose formats are part of
//! the external contract (`SCT-WO-0042`, `INV-2026-003`, ...). They are kept
//! as string newtypes rather than opaque UUIDs so that downstream consumers
//! see the exact series they expect.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id! {
    /// Work order identifier (`SCT-WO-####`, `MWO-<epoch>-<rand>` or `REQ-<tail>`)
    WorkOrderId
}

string_id! {
    /// Maintenance contract identifier
    ContractId
}

string_id! {
    /// Client identifier
    ClientId
}

string_id! {
    /// Technician identifier
    TechnicianId
}

string_id! {
    /// Invoice identifier (`INV-<year>-###`, reset per calendar year)
    InvoiceId
}

string_id! {
    /// Tracking log entry identifier
    LogId
}

string_id! {
    /// Site handover record identifier
    HandoverId
}

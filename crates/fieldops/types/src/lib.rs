//! Field-Service Domain Types
//!
//! A work order is a single dispatched job tracked from request to invoicing.
//! Everything that happens to it on site is recorded as an append-only chain
//! of tracking logs, and recurring maintenance contracts periodically spawn
//! fresh work orders.
//!
//! # Key Concepts
//!
//! - **WorkOrder**: the unit of dispatched work. Status moves through an
//!   explicit allow-list; the check-in/check-out protocol freezes the
//!   on-site duration exactly once.
//! - **TrackingLog**: an immutable fact about a work order's history.
//!   Appended, never edited, never removed.
//! - **MaintenanceContract**: a standing recurring-service agreement whose
//!   `next_service_date` advances by one frequency period per generated
//!   order.
//! - **SiteHandover**: the signed handover record produced after completion.
//!
//! # Design Principles
//!
//! 1. Status is a closed enumeration with an explicit transition table.
//!    No string comparisons, no silent regressions.
//! 2. Every persisted record is a plain serde-JSON-compatible structure.
//!    The core assumes nothing about the storage engine.
//! 3. Identifier formats are part of the external contract and are
//!    preserved bit-exact.

#![deny(unsafe_code)]

mod contract;
mod errors;
mod handover;
mod ids;
mod order;
mod tracking;

pub use contract::*;
pub use errors::*;
pub use handover::*;
pub use ids::*;
pub use order::*;
pub use tracking::*;

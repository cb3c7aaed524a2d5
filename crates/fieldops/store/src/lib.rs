//! Operational record storage boundary.
//!
//! This crate defines the storage contract the dispatch core depends on:
//! - work orders (system of record for the lifecycle engine)
//! - maintenance contracts (read and advanced by the scheduler)
//! - site handover records
//!
//! Design stance:
//! - The core neither assumes nor requires a particular storage engine.
//!   Any backend satisfying these traits can be substituted.
//! - The in-memory adapter is deterministic and test-friendly; production
//!   deployments should use a transactional backend as source of truth.
//! - Traits are synchronous: the core is a single-writer state machine and
//!   every operation is one load, one mutation, one upsert.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryOperationalStore;
pub use traits::{ContractStore, HandoverStore, OperationalStore, WorkOrderStore};

//! Work order lifecycle engine
//!
//! The engine validates every command against the current state of the work
//! order, applies the mutation and its tracking-ledger entry together, and
//! persists the result as a single upsert. The ledger therefore never
//! records an event for a transition that did not happen.
//!
//! # Key Concepts
//!
//! - **DispatchEngine**: the command surface - create, assign, check-in,
//!   location update, check-out, complete, cancel, administrator override,
//!   plus handover and invoicing transitions.
//! - **DispatchNotifier**: observer for collaborators outside this core
//!   (the technician directory flips availability on assignment, the review
//!   desk picks up completions). The engine never mutates another entity's
//!   state directly.
//! - **PositionSource**: best-effort geolocation. A missing position is a
//!   degradation, never an error; commands proceed without it.
//!
//! Public commands stamp the wall clock; every command has an `_at` variant
//! taking an explicit timestamp so the timing protocol is testable.

#![deny(unsafe_code)]

mod directory;
mod engine;
mod events;
mod position;

pub use directory::*;
pub use engine::*;
pub use events::*;
pub use position::*;

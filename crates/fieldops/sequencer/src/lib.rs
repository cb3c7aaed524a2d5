//! Identity sequencer - collision-free human-readable identifier series
//!
//! The sequential allocators are pure functions over the set of existing
//! identifiers: they re-scan the current set, take the highest trailing
//! number for the series and return the next one. There is no hidden
//! counter, so concurrent or out-of-order replays converge as long as each
//! allocation re-scans before committing. Numbers already present are never
//! reused; gaps from cancellations are tolerated, not backfilled.
//!
//! Maintenance orders, quick client requests and tracking log entries use
//! time-based identifiers with a random suffix instead of a sequence. The
//! formats are part of the external contract and are preserved bit-exact:
//!
//! - `SCT-WO-####`         sequential, 4-digit zero-padded
//! - `INV-<year>-###`      sequential, 3-digit zero-padded, per calendar year
//! - `MWO-<epoch>-<rand>`  maintenance-generated
//! - `REQ-<epoch-tail>`    quick client request
//! - `LOG-<epoch>-<rand>`  tracking log entry

#![deny(unsafe_code)]

use chrono::{DateTime, Datelike, Utc};
use fieldops_types::{InvoiceId, LogId, WorkOrderId};
use rand::Rng;

/// Prefix of the primary sequential work order series.
pub const WORK_ORDER_PREFIX: &str = "SCT-WO-";

/// Allocate the next identifier in a numbered series.
///
/// Scans `existing` for identifiers starting with `prefix`, parses the
/// trailing segment after the final `-` as a number (unparsable tails count
/// as zero) and returns `prefix` followed by the next number, zero-padded to
/// `width` digits. Deterministic: the same input set always yields the same
/// identifier.
pub fn next_in_series<'a, I>(prefix: &str, existing: I, width: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter(|id| id.starts_with(prefix))
        .map(|id| {
            id.rsplit('-')
                .next()
                .and_then(|tail| tail.parse::<u64>().ok())
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);

    format!("{}{:0width$}", prefix, max + 1, width = width)
}

/// Next identifier in the primary `SCT-WO-####` series.
pub fn next_work_order_id<'a, I>(existing: I) -> WorkOrderId
where
    I: IntoIterator<Item = &'a str>,
{
    WorkOrderId::new(next_in_series(WORK_ORDER_PREFIX, existing, 4))
}

/// Next identifier in the `INV-<year>-###` series for the given calendar
/// year. The numbering restarts at 001 each year because the scan is scoped
/// by the year segment of the prefix.
pub fn next_invoice_id<'a, I>(existing: I, year: i32) -> InvoiceId
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("INV-{}-", year);
    InvoiceId::new(next_in_series(&prefix, existing, 3))
}

/// Invoice identifier for the year of `now`.
pub fn next_invoice_id_at<'a, I>(existing: I, now: DateTime<Utc>) -> InvoiceId
where
    I: IntoIterator<Item = &'a str>,
{
    next_invoice_id(existing, now.year())
}

/// Time-based identifier for a maintenance-generated work order:
/// `MWO-<epoch-millis>-<rand 0..100>`. Collision avoidance comes from the
/// random suffix rather than a sequence.
pub fn maintenance_order_id(now: DateTime<Utc>) -> WorkOrderId {
    let suffix: u32 = rand::thread_rng().gen_range(0..100);
    WorkOrderId::new(format!("MWO-{}-{}", now.timestamp_millis(), suffix))
}

/// Time-based identifier for a quick client request: `REQ-` followed by the
/// last six digits of the epoch-millisecond timestamp.
pub fn client_request_id(now: DateTime<Utc>) -> WorkOrderId {
    let millis = now.timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    WorkOrderId::new(format!("REQ-{}", tail))
}

/// Time-based identifier for a tracking log entry:
/// `LOG-<epoch-millis>-<rand 0..1000>`.
pub fn tracking_log_id(now: DateTime<Utc>) -> LogId {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    LogId::new(format!("LOG-{}-{}", now.timestamp_millis(), suffix))
}

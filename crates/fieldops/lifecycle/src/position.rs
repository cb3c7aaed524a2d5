//! Best-effort geolocation boundary
//!
//! Implementations must bound their acquisition time; a check-in must never
//! stall on a slow device. `None` means "no position available" and is
//! recorded as such - downstream consumers can distinguish a missing capture
//! from a captured one.

use fieldops_types::GeoPoint;

/// Source of the technician device's current position
pub trait PositionSource: Send + Sync {
    /// Current position, or `None` if unavailable within the source's
    /// timeout.
    fn current_position(&self) -> Option<GeoPoint>;
}

/// A source with no geolocation capability
#[derive(Default)]
pub struct NoPosition;

impl PositionSource for NoPosition {
    fn current_position(&self) -> Option<GeoPoint> {
        None
    }
}

/// A fixed position, for tests and stationary kiosks
pub struct FixedPosition(pub GeoPoint);

impl PositionSource for FixedPosition {
    fn current_position(&self) -> Option<GeoPoint> {
        Some(self.0)
    }
}

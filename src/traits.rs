//! Core domain traits for the assignment engine.
//!
//! These are intentionally minimal. The engine only needs a position type it
//! can measure and interpolate; loaders and exporters additionally consume
//! the timestamped-geo metadata shape.

use crate::point::Point3;

/// A 3D position the engine can measure distances over and interpolate along.
///
/// `Send + Sync` because the per-salesman nearest-city scan runs in parallel
/// over shared engine state.
pub trait Position: Clone + PartialEq + Send + Sync {
    /// Straight-line distance to `other`, in position units.
    fn distance(&self, other: &Self) -> f64;

    /// Point at fraction `t` of the segment from `self` to `other`.
    ///
    /// Callers pass `t` already clamped to `[0, 1]`.
    fn lerp(&self, other: &Self, t: f64) -> Self;

    /// Unit heading from `self` toward `other`.
    ///
    /// The zero vector when the two positions coincide.
    fn direction_to(&self, other: &Self) -> Self;
}

/// Timestamped geo metadata attached to loaded rows.
///
/// Consumed as a data shape only; the engine itself never reads it.
pub trait Metadata {
    /// UTC timestamp in milliseconds, if the source row carried one.
    fn utc_ms(&self) -> Option<i64>;

    /// Duration associated with this sample, in milliseconds.
    fn duration_ms(&self) -> i64 {
        0
    }

    /// Orientation as yaw/pitch/roll.
    fn orientation(&self) -> Point3 {
        Point3::ORIGIN
    }
}

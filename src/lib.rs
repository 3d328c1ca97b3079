//! mtsp-planner core
//!
//! Greedy multiple-traveling-salesmen assignment with per-salesman speeds and
//! a time-parameterized query surface. Salesmen do not return to their
//! starting positions; the result is not optimal.

pub mod traits;
pub mod point;
pub mod geodetic;
pub mod model;
pub mod solver;
pub mod error;
pub mod loader;

//! Trajectory math for GPS trace files.
//!
//! A recorded ride is an ordered list of [`Trackpoint`] samples where every
//! field besides the position in the list may be missing. The data flows one
//! way:
//!
//! ```notrust
//! raw samples -> normalize -> { moving time, elevation } -> summary
//! ```
//!
//! [`normalize()`] turns the raw samples into a [`Trajectory`] whose
//! cumulative distance is non-decreasing and starts at zero. Everything
//! downstream ([`moving_time()`], [`elevation()`], [`summarize()`], the
//! segment search in the `segments` crate) relies on that invariant instead
//! of re-checking it.

mod elevation;
mod models;
mod moving;
mod normalize;
mod summary;

pub use self::elevation::*;
pub use self::models::*;
pub use self::moving::*;
pub use self::normalize::*;
pub use self::summary::*;

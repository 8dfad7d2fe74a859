//! Shared primitive types used across the entire simulation.

use chrono::{DateTime, Duration, Utc};

/// A wall-clock instant. The engine never reads the clock itself;
/// every instant is handed in by the caller.
pub type Timestamp = DateTime<Utc>;

/// The key a host stores one pet under.
pub type PetId = String;

/// One pet day lasts one real minute.
pub const MS_PER_PET_DAY: i64 = 60_000;

/// Real minutes between two instants, as a real number.
/// Negative when `to` is earlier than `from`.
pub fn minutes_between(from: Timestamp, to: Timestamp) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_PET_DAY as f64
}

/// Offset an instant by a (possibly fractional) number of real minutes,
/// rounded to the nearest millisecond.
pub fn add_minutes(t: Timestamp, minutes: f64) -> Timestamp {
    t + Duration::milliseconds((minutes * MS_PER_PET_DAY as f64).round() as i64)
}

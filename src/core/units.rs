use crate::errors::ScheduleError;
use chrono::{NaiveTime, Timelike};

pub const LITRES_PER_CUBIC_METRE: u32 = 1_000;
pub const SECONDS_PER_DAY: u32 = 86_400;

const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// Volume in litres moved by a flow given in m^3/s over a duration in seconds.
pub fn flow_volume_in_litres(flow_rate_m3_per_s: f64, duration_seconds: f64) -> f64 {
    flow_rate_m3_per_s * duration_seconds * LITRES_PER_CUBIC_METRE as f64
}

/// Convert a wall-clock time of day in the form HH:MM:SS into seconds since midnight.
pub fn seconds_since_midnight(time_of_day: &str) -> Result<u32, ScheduleError> {
    let invalid = || ScheduleError::InvalidTimeOfDay(time_of_day.to_string());

    let time = NaiveTime::parse_from_str(time_of_day.trim(), TIME_OF_DAY_FORMAT)
        .map_err(|_| invalid())?;

    // chrono accepts :60 as a leap second
    if time.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }

    Ok(time.num_seconds_from_midnight())
}

/// Render seconds since midnight as HH:MM:SS, for log output. None past the end of a day.
pub fn format_time_of_day(seconds: u32) -> Option<String> {
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .map(|time| time.format(TIME_OF_DAY_FORMAT).to_string())
}

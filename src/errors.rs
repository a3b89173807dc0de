use thiserror::Error;

/// A draw-off schedule entry that cannot be accepted. These are configuration errors: the entry is
/// rejected before the run starts and never reaches the simulation core.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("A draw-off starting at {start}s and lasting {duration}s does not end before the end of a {seconds_per_day}s day")]
    WindowPastEndOfDay {
        start: u32,
        duration: u32,
        seconds_per_day: u32,
    },
    #[error("'{0}' is not a valid time of day, expected HH:MM:SS")]
    InvalidTimeOfDay(String),
    #[error("'{0}' is not a valid draw-off, expected START/DURATION where START is HH:MM:SS or seconds since midnight")]
    InvalidDrawOff(String),
}

/// A broken invariant inside the simulation core. Any of these aborts the run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("{system} has no water packets to merge")]
    EmptyPacketPool { system: &'static str },
    #[error("{system} holds no water volume, so its temperature is undefined")]
    ZeroVolume { system: &'static str },
    #[error("Volume of the water held by {system} fell to {volume} litres")]
    NegativeVolume { system: &'static str, volume: f64 },
    #[error("Tick {tick} is outside of a {seconds_per_day}s day")]
    TickOutOfRange { tick: usize, seconds_per_day: u32 },
}

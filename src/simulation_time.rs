use crate::core::units::{format_time_of_day, SECONDS_PER_DAY};

/// Duration of a single tick, in seconds
pub const TICK_DURATION: f64 = 1.;

/// The simulated day, discretised into one-second ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationTime {
    seconds_per_day: u32,
    step: f64,
}

impl SimulationTime {
    pub fn new(seconds_per_day: u32) -> Self {
        Self {
            seconds_per_day,
            step: TICK_DURATION,
        }
    }

    pub fn seconds_per_day(&self) -> u32 {
        self.seconds_per_day
    }

    pub fn total_steps(&self) -> usize {
        (self.seconds_per_day as f64 / self.step).ceil() as usize
    }

    pub fn iter(&self) -> SimulationTimeIterator {
        SimulationTimeIterator::from(*self)
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new(SECONDS_PER_DAY)
    }
}

impl IntoIterator for SimulationTime {
    type Item = SimulationTimeIteration;
    type IntoIter = SimulationTimeIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug)]
pub struct SimulationTimeIterator {
    next_index: usize,
    simulation_time: SimulationTime,
}

impl SimulationTimeIterator {
    fn from(simulation_time: SimulationTime) -> Self {
        SimulationTimeIterator {
            next_index: 0,
            simulation_time,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationTimeIteration {
    pub index: usize,
    pub time: f64,
    pub timestep: f64,
}

impl SimulationTimeIteration {
    /// Iteration for a given tick, one second long
    pub fn at_tick(index: usize) -> Self {
        Self {
            index,
            time: index as f64 * TICK_DURATION,
            timestep: TICK_DURATION,
        }
    }

    pub fn seconds_since_midnight(&self) -> u32 {
        self.time.floor() as u32
    }

    /// HH:MM:SS, or the bare number of seconds if the tick falls past the end of a day
    pub fn time_of_day(&self) -> String {
        let seconds = self.seconds_since_midnight();
        format_time_of_day(seconds).unwrap_or_else(|| format!("{seconds}s"))
    }
}

impl Iterator for SimulationTimeIterator {
    type Item = SimulationTimeIteration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.simulation_time.total_steps() {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;

        Some(SimulationTimeIteration {
            index,
            time: index as f64 * self.simulation_time.step,
            timestep: self.simulation_time.step,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.simulation_time.total_steps() - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SimulationTimeIterator {}

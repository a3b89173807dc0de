use crate::core::system::Readings;
use itertools::{Itertools, MinMaxResult};
use std::fmt;

/// Readings from a completed day.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResults {
    pub seconds_per_day: u32,
    pub readings: Readings,
}

impl RunResults {
    pub fn new(seconds_per_day: u32, readings: Readings) -> Self {
        Self {
            seconds_per_day,
            readings,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            heater: SeriesSummary::from_series(&self.readings.heater_temperatures),
            tank: SeriesSummary::from_series(&self.readings.tank_temperatures),
        }
    }
}

/// Extremes and final value of one temperature series, in deg C
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesSummary {
    pub min: f64,
    pub max: f64,
    pub last: f64,
}

impl SeriesSummary {
    fn from_series(series: &[f64]) -> Option<Self> {
        let (min, max) = match series.iter().copied().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(value) => (value, value),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        Some(Self {
            min,
            max,
            last: *series.last()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub heater: Option<SeriesSummary>,
    pub tank: Option<SeriesSummary>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, series) in [("Heater", &self.heater), ("Tank", &self.tank)] {
            match series {
                Some(SeriesSummary { min, max, last }) => writeln!(
                    f,
                    "{name} temperature: min {min:.2} deg C, max {max:.2} deg C, final {last:.2} deg C"
                )?,
                None => writeln!(f, "{name} temperature: no readings")?,
            }
        }

        Ok(())
    }
}

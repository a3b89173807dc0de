use crate::core::heater::{
    HEATER_CAPACITY, HEATER_COIL_RESISTANCE, HEATER_PUMP_FLOW_RATE, HEATER_THRESHOLD_TEMPERATURE,
};
use crate::core::outlet_scheduler::OUTSIDE_FLOW_RATE;
use crate::core::solar_profile::{
    DEFAULT_IRRADIANCE_SEGMENTS, DEFAULT_PANEL_AREA, DEFAULT_PANEL_VOLTAGE,
};
use crate::core::storage_tank::{TANK_CAPACITY, TANK_THRESHOLD_TEMPERATURE};
use crate::core::units::{seconds_since_midnight, SECONDS_PER_DAY};
use crate::core::water_packet::ROOM_TEMPERATURE;
use crate::errors::ScheduleError;
use anyhow::anyhow;
use serde::Deserialize;
use serde_valid::Validate;
use std::io::{BufReader, Read};
use std::str::FromStr;

pub fn ingest_for_processing(json: impl Read) -> Result<Input, anyhow::Error> {
    let input: Input = serde_json::from_reader(BufReader::new(json))?;
    input
        .validate()
        .map_err(|errors| anyhow!("Input failed validation: {errors}"))?;

    Ok(input)
}

#[derive(Debug, Default, Deserialize, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Input {
    #[serde(default)]
    #[validate]
    pub simulation_time: SimulationTimeInput,
    #[serde(default)]
    #[validate]
    pub heater: HeaterInput,
    #[serde(default)]
    #[validate]
    pub storage_tank: StorageTankInput,
    #[serde(default)]
    #[validate]
    pub solar_panel: SolarPanelInput,
    #[serde(default)]
    #[validate]
    pub outlet: OutletInput,
    #[serde(default)]
    pub draw_offs: Vec<DrawOffInput>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct SimulationTimeInput {
    #[validate(minimum = 1)]
    #[validate(maximum = 86400)]
    pub seconds_per_day: u32,
}

impl Default for SimulationTimeInput {
    fn default() -> Self {
        Self {
            seconds_per_day: SECONDS_PER_DAY,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct HeaterInput {
    /// Volume of water held by the heater, in litres
    #[validate(exclusive_minimum = 0.)]
    pub capacity: f64,
    /// in deg C
    pub initial_temperature: f64,
    /// Temperature at or above which the pump may run, in deg C
    pub threshold_temperature: f64,
    /// Resistance of the solar heated coil, in ohms
    #[validate(exclusive_minimum = 0.)]
    pub coil_resistance: f64,
    /// Flow rate through the pump while running, in m^3/s
    #[validate(minimum = 0.)]
    pub pump_flow_rate: f64,
}

impl Default for HeaterInput {
    fn default() -> Self {
        Self {
            capacity: HEATER_CAPACITY,
            initial_temperature: ROOM_TEMPERATURE,
            threshold_temperature: HEATER_THRESHOLD_TEMPERATURE,
            coil_resistance: HEATER_COIL_RESISTANCE,
            pump_flow_rate: HEATER_PUMP_FLOW_RATE,
        }
    }
}

/// How the storage tank reports its temperature threshold.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ThresholdLatch {
    /// Report crossing the threshold; never report falling back below it.
    #[default]
    OneWay,
    /// Also report, once, when the temperature falls back to or below the threshold.
    Symmetric,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct StorageTankInput {
    /// in litres
    #[validate(exclusive_minimum = 0.)]
    pub capacity: f64,
    /// in deg C
    pub initial_temperature: f64,
    /// in deg C
    pub threshold_temperature: f64,
    pub threshold_latch: ThresholdLatch,
    /// Whether water pumped into the tank displaces an equal volume back to the heater
    pub return_flow: bool,
}

impl Default for StorageTankInput {
    fn default() -> Self {
        Self {
            capacity: TANK_CAPACITY,
            initial_temperature: ROOM_TEMPERATURE,
            threshold_temperature: TANK_THRESHOLD_TEMPERATURE,
            threshold_latch: Default::default(),
            return_flow: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct SolarPanelInput {
    /// in m2
    #[validate(exclusive_minimum = 0.)]
    pub area: f64,
    /// in V
    #[validate(exclusive_minimum = 0.)]
    pub voltage: f64,
    /// Irradiance over equal segments of the day, in W/m2
    #[validate(min_items = 1)]
    pub irradiance: Vec<f64>,
}

impl Default for SolarPanelInput {
    fn default() -> Self {
        Self {
            area: DEFAULT_PANEL_AREA,
            voltage: DEFAULT_PANEL_VOLTAGE,
            irradiance: DEFAULT_IRRADIANCE_SEGMENTS.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct OutletInput {
    /// Draw-off flow rate, in m^3/s
    #[validate(minimum = 0.)]
    pub flow_rate: f64,
    /// Temperature of the water replacing what is drawn off, in deg C
    pub inlet_temperature: f64,
}

impl Default for OutletInput {
    fn default() -> Self {
        Self {
            flow_rate: OUTSIDE_FLOW_RATE,
            inlet_temperature: ROOM_TEMPERATURE,
        }
    }
}

/// A scheduled draw-off from the storage tank.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct DrawOffInput {
    pub start: DrawOffStart,
    /// in seconds
    pub duration: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum DrawOffStart {
    SecondsSinceMidnight(u32),
    /// HH:MM:SS
    TimeOfDay(String),
}

impl DrawOffStart {
    pub fn seconds_since_midnight(&self) -> Result<u32, ScheduleError> {
        match self {
            DrawOffStart::SecondsSinceMidnight(seconds) => Ok(*seconds),
            DrawOffStart::TimeOfDay(time_of_day) => seconds_since_midnight(time_of_day),
        }
    }
}

impl FromStr for DrawOffInput {
    type Err = ScheduleError;

    /// Parse a draw-off given as START/DURATION, where START is HH:MM:SS or seconds since midnight
    /// and DURATION is in seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidDrawOff(s.to_string());

        let (start, duration) = s.split_once('/').ok_or_else(invalid)?;
        let duration = parse_whole_seconds(duration.trim()).ok_or_else(invalid)?;
        let start = match start.trim() {
            start if start.contains(':') => {
                seconds_since_midnight(start)?;
                DrawOffStart::TimeOfDay(start.to_string())
            }
            start => DrawOffStart::SecondsSinceMidnight(
                parse_whole_seconds(start).ok_or_else(invalid)?,
            ),
        };

        Ok(Self { start, duration })
    }
}

/// Digits only; `u32::from_str` would also take a leading sign.
fn parse_whole_seconds(seconds: &str) -> Option<u32> {
    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    seconds.parse().ok()
}

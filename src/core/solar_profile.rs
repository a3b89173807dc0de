use crate::errors::SimulationError;

/// Irradiance for each equal-length segment of the day, in W/m2
pub const DEFAULT_IRRADIANCE_SEGMENTS: [f64; 8] = [0., 100., 500., 700., 1000., 300., 100., 0.];
pub const DEFAULT_PANEL_AREA: f64 = 1.; // m2
pub const DEFAULT_PANEL_VOLTAGE: f64 = 20.; // V

/// Current delivered by the solar panel for every second of the day.
///
/// The profile is computed once at construction: the day is split into as many equal segments as
/// there are irradiance values, and within each segment the current is
/// irradiance * panel area / panel voltage.
#[derive(Clone, Debug)]
pub struct SolarProfile {
    current: Vec<f64>, // A, indexed by tick
}

impl SolarProfile {
    /// Arguments:
    /// * `irradiance_segments` - irradiance for each segment of the day, in W/m2
    /// * `panel_area` - area of the solar panel, in m2
    /// * `panel_voltage` - voltage of the solar panel, in V
    /// * `seconds_per_day` - number of ticks in the simulated day
    pub fn new(
        irradiance_segments: &[f64],
        panel_area: f64,
        panel_voltage: f64,
        seconds_per_day: u32,
    ) -> Self {
        let seconds_per_day = seconds_per_day as usize;
        let segment_count = irradiance_segments.len();
        let mut current = vec![0.; seconds_per_day];

        for (segment, irradiance) in irradiance_segments.iter().enumerate() {
            let start = segment * seconds_per_day / segment_count;
            let end = (segment + 1) * seconds_per_day / segment_count;
            current[start..end].fill(irradiance * panel_area / panel_voltage);
        }

        Self { current }
    }

    /// Current from the panel at a given second of the day, in A.
    pub fn current_at(&self, tick: usize) -> Result<f64, SimulationError> {
        self.current
            .get(tick)
            .copied()
            .ok_or(SimulationError::TickOutOfRange {
                tick,
                seconds_per_day: self.current.len() as u32,
            })
    }

    pub fn seconds_per_day(&self) -> u32 {
        self.current.len() as u32
    }
}

impl Default for SolarProfile {
    fn default() -> Self {
        Self::new(
            &DEFAULT_IRRADIANCE_SEGMENTS,
            DEFAULT_PANEL_AREA,
            DEFAULT_PANEL_VOLTAGE,
            crate::core::units::SECONDS_PER_DAY,
        )
    }
}

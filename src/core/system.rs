use crate::core::events::EventBatch;
use crate::simulation_time::SimulationTimeIteration;

/// A part of the rig taking part in the tick protocol.
///
/// Every tick the driver calls, for every system in a fixed order, first `handle_events` with the
/// events emitted on the previous tick, then `update`, then `register_reading`. Systems never call
/// each other: anything one system needs another to know goes out as an event from `update`.
pub trait System {
    /// Name for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Apply the previous tick's events to this system's state.
    fn handle_events(&mut self, events: &EventBatch);

    /// Advance the physical state by one tick, appending any emitted events to `outbox`.
    fn update(
        &mut self,
        simulation_time_iteration: &SimulationTimeIteration,
        outbox: &mut EventBatch,
    ) -> anyhow::Result<()>;

    /// Record this tick's reading, if the system produces one.
    fn register_reading(&self, _readings: &mut Readings) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The output buffers: one temperature per tick for the heater and for the storage tank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Readings {
    pub heater_temperatures: Vec<f64>,
    pub tank_temperatures: Vec<f64>,
}

impl Readings {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heater_temperatures: Vec::with_capacity(capacity),
            tank_temperatures: Vec::with_capacity(capacity),
        }
    }

    /// Number of ticks for which both readings have been registered
    pub fn len(&self) -> usize {
        self.heater_temperatures
            .len()
            .min(self.tank_temperatures.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

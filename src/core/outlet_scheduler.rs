use crate::core::events::{Event, EventBatch};
use crate::core::system::System;
use crate::errors::ScheduleError;
use crate::simulation_time::SimulationTimeIteration;
use tracing::debug;

pub const OUTSIDE_FLOW_RATE: f64 = 0.0005; // m^3/s

const SYSTEM_NAME: &str = "OutletScheduler";

/// Turns draw-offs from the storage tank on and off according to a daily schedule.
///
/// Each entry is a start time and a duration, both in seconds. Only one draw-off is tracked at a
/// time: a start time matching the current tick replaces whichever draw-off was running.
#[derive(Debug)]
pub struct OutletScheduler {
    start_times: Vec<u32>,
    durations: Vec<u32>,
    cursor: Option<usize>,
    flow_rate: f64, // m^3/s
    seconds_per_day: u32,
}

impl OutletScheduler {
    /// Arguments:
    /// * `flow_rate` - flow rate announced when a draw-off starts, in m^3/s
    /// * `seconds_per_day` - length of the simulated day; draw-offs must finish before it ends
    pub fn new(flow_rate: f64, seconds_per_day: u32) -> Self {
        Self {
            start_times: Default::default(),
            durations: Default::default(),
            cursor: None,
            flow_rate,
            seconds_per_day,
        }
    }

    /// Append a draw-off to the schedule.
    ///
    /// Arguments:
    /// * `start` - seconds since midnight at which water starts to flow
    /// * `duration` - seconds for which water flows
    pub fn add_draw_off(&mut self, start: u32, duration: u32) -> Result<(), ScheduleError> {
        if start as u64 + duration as u64 >= self.seconds_per_day as u64 {
            return Err(ScheduleError::WindowPastEndOfDay {
                start,
                duration,
                seconds_per_day: self.seconds_per_day,
            });
        }

        self.start_times.push(start);
        self.durations.push(duration);

        Ok(())
    }

    pub fn draw_offs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.start_times
            .iter()
            .copied()
            .zip(self.durations.iter().copied())
    }

    pub fn is_flow_active(&self) -> bool {
        self.cursor.is_some()
    }
}

impl System for OutletScheduler {
    fn name(&self) -> &'static str {
        SYSTEM_NAME
    }

    // the scheduler acts on the clock alone
    fn handle_events(&mut self, _events: &EventBatch) {}

    fn update(
        &mut self,
        simulation_time_iteration: &SimulationTimeIteration,
        outbox: &mut EventBatch,
    ) -> anyhow::Result<()> {
        let now = simulation_time_iteration.seconds_since_midnight();

        if let Some(index) = self.start_times.iter().rposition(|&start| start == now) {
            debug!(
                time = %simulation_time_iteration.time_of_day(),
                duration = self.durations[index],
                "draw-off starting"
            );
            outbox.push(Event::OutsideFlow {
                turn_on: true,
                flow_rate: self.flow_rate,
            });
            self.cursor = Some(index);
        }

        if let Some(index) = self.cursor {
            if now == self.start_times[index] + self.durations[index] {
                debug!(
                    time = %simulation_time_iteration.time_of_day(),
                    "draw-off finishing"
                );
                outbox.push(Event::OutsideFlow {
                    turn_on: false,
                    flow_rate: 0.,
                });
                self.cursor = None;
            }
        }

        Ok(())
    }
}

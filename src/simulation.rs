use crate::core::events::EventBatch;
use crate::core::heater::Heater;
use crate::core::material_properties::WATER;
use crate::core::outlet_scheduler::OutletScheduler;
use crate::core::solar_profile::SolarProfile;
use crate::core::storage_tank::StorageTank;
use crate::core::system::{Readings, System};
use crate::input::{DrawOffInput, Input};
use crate::simulation_time::{SimulationTime, SimulationTimeIteration};
use anyhow::Context;
#[cfg(feature = "indicatif")]
use indicatif::ProgressIterator;
use std::mem;
use tracing::{debug, info, warn};

/// The rig: a heater, a storage tank and an outlet scheduler, stepped together one tick at a time.
///
/// Events emitted by any system during a tick are held back and delivered to every system at the
/// start of the next tick, so no system ever sees the effect of another system's update within
/// the same tick.
#[derive(Debug)]
pub struct Simulation {
    heater: Heater,
    storage_tank: StorageTank,
    outlet_scheduler: OutletScheduler,
    simulation_time: SimulationTime,
    pending: EventBatch,
    delivered: EventBatch,
    readings: Readings,
}

impl Simulation {
    pub fn new(
        heater: Heater,
        storage_tank: StorageTank,
        outlet_scheduler: OutletScheduler,
        simulation_time: SimulationTime,
    ) -> Self {
        Self {
            heater,
            storage_tank,
            outlet_scheduler,
            simulation_time,
            pending: Default::default(),
            delivered: Default::default(),
            readings: Readings::with_capacity(simulation_time.total_steps()),
        }
    }

    /// Build the rig described by an input, scheduling its draw-offs followed by any extra
    /// draw-offs given.
    ///
    /// Draw-offs that cannot be scheduled are logged and left out; they never stop the run.
    pub fn from_input(input: &Input, extra_draw_offs: &[DrawOffInput]) -> Self {
        let seconds_per_day = input.simulation_time.seconds_per_day;
        let simulation_time = SimulationTime::new(seconds_per_day);

        let solar_profile = SolarProfile::new(
            &input.solar_panel.irradiance,
            input.solar_panel.area,
            input.solar_panel.voltage,
            seconds_per_day,
        );

        let heater = Heater::new(
            input.heater.capacity,
            input.heater.initial_temperature,
            input.heater.threshold_temperature,
            input.heater.coil_resistance,
            input.heater.pump_flow_rate,
            solar_profile,
            *WATER,
        );

        let storage_tank = StorageTank::new(
            input.storage_tank.capacity,
            input.storage_tank.initial_temperature,
            input.storage_tank.threshold_temperature,
            input.storage_tank.threshold_latch,
            input.storage_tank.return_flow,
            input.outlet.flow_rate,
            input.outlet.inlet_temperature,
        );

        let mut outlet_scheduler = OutletScheduler::new(input.outlet.flow_rate, seconds_per_day);
        for draw_off in input.draw_offs.iter().chain(extra_draw_offs) {
            let scheduled = draw_off
                .start
                .seconds_since_midnight()
                .and_then(|start| outlet_scheduler.add_draw_off(start, draw_off.duration));

            match scheduled {
                Ok(()) => debug!(?draw_off, "scheduled draw-off"),
                Err(error) => warn!(?draw_off, %error, "skipping draw-off"),
            }
        }

        Self::new(heater, storage_tank, outlet_scheduler, simulation_time)
    }

    /// Advance every system by one tick.
    ///
    /// Every system handles the events emitted on the previous tick, then every system updates,
    /// then readings are registered, each in the order heater, storage tank, outlet scheduler.
    pub fn step(&mut self, simulation_time_iteration: &SimulationTimeIteration) -> anyhow::Result<()> {
        let events = mem::take(&mut self.pending);
        let mut outbox = EventBatch::new();

        let mut systems: [&mut dyn System; 3] = [
            &mut self.heater,
            &mut self.storage_tank,
            &mut self.outlet_scheduler,
        ];
        for system in systems.iter_mut() {
            system.handle_events(&events);
        }
        for system in systems.iter_mut() {
            system
                .update(simulation_time_iteration, &mut outbox)
                .with_context(|| {
                    format!(
                        "{} failed to update at {} (tick {})",
                        system.name(),
                        simulation_time_iteration.time_of_day(),
                        simulation_time_iteration.index
                    )
                })?;
        }

        self.heater.register_reading(&mut self.readings)?;
        self.storage_tank.register_reading(&mut self.readings)?;
        self.outlet_scheduler.register_reading(&mut self.readings)?;

        self.delivered = events;
        self.pending = outbox;

        Ok(())
    }

    /// Simulate the whole day.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.run_with_observer(|_, _| Ok(()))
    }

    /// Simulate the whole day, handing the readings so far to `observer` after every tick.
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> anyhow::Result<()>
    where
        F: FnMut(&SimulationTimeIteration, &Readings) -> anyhow::Result<()>,
    {
        info!(
            seconds_per_day = self.simulation_time.seconds_per_day(),
            draw_offs = self.outlet_scheduler.draw_offs().count(),
            "starting simulation"
        );

        #[cfg(feature = "indicatif")]
        let simulation_time_iter = self.simulation_time.iter().progress();
        #[cfg(not(feature = "indicatif"))]
        let simulation_time_iter = self.simulation_time.iter();

        for t_it in simulation_time_iter {
            self.step(&t_it)?;
            observer(&t_it, &self.readings)?;
        }

        info!(
            heater_temperature = self.heater.temperature()?,
            tank_temperature = self.storage_tank.temperature()?,
            "simulation complete"
        );

        Ok(())
    }

    pub fn heater(&self) -> &Heater {
        &self.heater
    }

    pub fn storage_tank(&self) -> &StorageTank {
        &self.storage_tank
    }

    pub fn outlet_scheduler(&self) -> &OutletScheduler {
        &self.outlet_scheduler
    }

    pub fn simulation_time(&self) -> SimulationTime {
        self.simulation_time
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn into_readings(self) -> Readings {
        self.readings
    }

    /// Events emitted on the last tick, to be delivered on the next one
    pub fn pending_events(&self) -> &EventBatch {
        &self.pending
    }

    /// Events delivered to the systems on the last tick
    pub fn delivered_events(&self) -> &EventBatch {
        &self.delivered
    }

    /// Water held by the heater and the storage tank plus water in transit between them, in litres
    pub fn total_water(&self) -> f64 {
        self.heater.volume() + self.storage_tank.volume() + self.pending.water_in_flight()
    }
}

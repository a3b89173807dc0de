use crate::core::events::{Event, EventBatch, FlowType};
use crate::core::material_properties::MaterialProperties;
use crate::core::solar_profile::SolarProfile;
use crate::core::system::{Readings, System};
use crate::core::units::flow_volume_in_litres;
use crate::core::water_packet::{PacketPool, WaterPacket};
use crate::simulation_time::SimulationTimeIteration;
use tracing::{debug, trace};

pub const HEATER_CAPACITY: f64 = 100.; // litres
pub const HEATER_THRESHOLD_TEMPERATURE: f64 = 70.; // deg C
pub const HEATER_COIL_RESISTANCE: f64 = 50.; // ohm
pub const HEATER_PUMP_FLOW_RATE: f64 = 0.00114; // m^3/s

const SYSTEM_NAME: &str = "Heater";

/// An object to represent the solar heated water heater
///
/// Current from the solar panel dissipates in a resistive coil, heating the water held by the
/// heater. Once the heater is hot enough, and the storage tank has not yet reached its own
/// threshold, the heater asks for the pump to run; while the pump runs, hot water is sent to the
/// storage tank each tick.
#[derive(Debug)]
pub struct Heater {
    pool: PacketPool,
    capacity: f64,              // litres
    threshold_temperature: f64, // deg C
    coil_resistance: f64,       // ohm
    pump_flow_rate: f64,        // m^3/s
    solar_profile: SolarProfile,
    contents: MaterialProperties,
    pump_on: bool,
    mirrored_pump_flow_rate: f64,
    tank_threshold_crossed: bool,
}

impl Heater {
    /// Arguments:
    /// * `capacity` - volume of water held by the heater, in litres; the heater starts full
    /// * `initial_temperature` - temperature of the water initially held, in deg C
    /// * `threshold_temperature` - temperature at or above which the pump may run, in deg C
    /// * `coil_resistance` - resistance of the coil, in ohm
    /// * `pump_flow_rate` - flow rate through the pump while it runs, in m^3/s
    /// * `solar_profile` - current delivered to the coil over the day
    /// * `contents` - MaterialProperties object for the water held
    pub fn new(
        capacity: f64,
        initial_temperature: f64,
        threshold_temperature: f64,
        coil_resistance: f64,
        pump_flow_rate: f64,
        solar_profile: SolarProfile,
        contents: MaterialProperties,
    ) -> Self {
        Self {
            pool: PacketPool::new(SYSTEM_NAME, WaterPacket::new(initial_temperature, capacity)),
            capacity,
            threshold_temperature,
            coil_resistance,
            pump_flow_rate,
            solar_profile,
            contents,
            pump_on: false,
            mirrored_pump_flow_rate: 0.,
            tank_threshold_crossed: false,
        }
    }

    pub fn temperature(&self) -> anyhow::Result<f64> {
        Ok(self.pool.temperature()?)
    }

    pub fn volume(&self) -> f64 {
        self.pool.total_volume()
    }

    pub fn pool(&self) -> &PacketPool {
        &self.pool
    }

    pub fn is_pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn mirrored_pump_flow_rate(&self) -> f64 {
        self.mirrored_pump_flow_rate
    }

    pub fn is_tank_threshold_crossed(&self) -> bool {
        self.tank_threshold_crossed
    }

    /// Heat the water with the power dissipated in the coil over one tick.
    ///
    /// All heat dissipated by the coil is assumed to go into the water, sized as if the heater
    /// were full. Returns the power dissipated, in W.
    fn heat_transfer(
        &mut self,
        simulation_time_iteration: &SimulationTimeIteration,
    ) -> anyhow::Result<f64> {
        let current = self
            .solar_profile
            .current_at(simulation_time_iteration.index)?;
        let power = current.powi(2) * self.coil_resistance;

        let energy = power * simulation_time_iteration.timestep;
        let temperature_rise = self.contents.temperature_rise(energy, self.capacity);
        self.pool.raise_temperature(temperature_rise)?;

        Ok(power)
    }
}

impl System for Heater {
    fn name(&self) -> &'static str {
        SYSTEM_NAME
    }

    fn handle_events(&mut self, events: &EventBatch) {
        for event in events {
            match event {
                Event::PumpTrigger { turn_on } => {
                    self.pump_on = *turn_on;
                    if !turn_on {
                        self.mirrored_pump_flow_rate = 0.;
                    }
                }
                Event::PumpFlowRate { flow_rate } => {
                    if self.pump_on {
                        self.mirrored_pump_flow_rate = *flow_rate;
                    }
                }
                Event::TankTempThreshold { is_crossed } => {
                    self.tank_threshold_crossed = *is_crossed;
                }
                Event::WaterPacket {
                    water,
                    flow_type: FlowType::TankToHeater,
                } => self.pool.receive(*water),
                Event::WaterPacket {
                    flow_type: FlowType::HeaterToTank,
                    ..
                }
                | Event::OutsideFlow { .. } => {}
            }
        }
    }

    fn update(
        &mut self,
        simulation_time_iteration: &SimulationTimeIteration,
        outbox: &mut EventBatch,
    ) -> anyhow::Result<()> {
        if !self.pump_on
            && self.temperature()? >= self.threshold_temperature
            && !self.tank_threshold_crossed
        {
            debug!(
                time = %simulation_time_iteration.time_of_day(),
                temperature = self.temperature()?,
                "heater requesting pump on"
            );
            outbox.push(Event::PumpTrigger { turn_on: true });
        }

        if self.pump_on {
            let volume =
                flow_volume_in_litres(self.pump_flow_rate, simulation_time_iteration.timestep);
            let water = self.pool.withdraw(volume)?;
            trace!(
                tick = simulation_time_iteration.index,
                volume = self.pool.primary()?.volume(),
                temperature = water.temperature(),
                "heater pumping to tank"
            );
            outbox.push(Event::WaterPacket {
                water,
                flow_type: FlowType::HeaterToTank,
            });
        }

        // merge before heating, so heat goes into the mixed water
        self.pool.merge()?;

        let temperature = self.temperature()?;
        if temperature < self.threshold_temperature || (self.tank_threshold_crossed && self.pump_on)
        {
            if self.pump_on {
                debug!(
                    time = %simulation_time_iteration.time_of_day(),
                    temperature,
                    tank_threshold_crossed = self.tank_threshold_crossed,
                    "heater requesting pump off"
                );
            }
            outbox.push(Event::PumpTrigger { turn_on: false });

            if temperature < self.threshold_temperature {
                self.heat_transfer(simulation_time_iteration)?;
            }
        }

        Ok(())
    }

    fn register_reading(&self, readings: &mut Readings) -> anyhow::Result<()> {
        readings.heater_temperatures.push(self.temperature()?);
        Ok(())
    }
}

use crate::core::events::{Event, EventBatch, FlowType};
use crate::core::system::{Readings, System};
use crate::core::units::flow_volume_in_litres;
use crate::core::water_packet::{PacketPool, WaterPacket};
use crate::input::ThresholdLatch;
use crate::simulation_time::SimulationTimeIteration;
use tracing::debug;

pub const TANK_CAPACITY: f64 = 1000.; // litres
pub const TANK_THRESHOLD_TEMPERATURE: f64 = 50.; // deg C

const SYSTEM_NAME: &str = "StorageTank";

/// An object to represent the hot water storage tank
///
/// The tank takes in hot water pumped from the heater and, while a draw-off is running, loses
/// water to the outside which is replaced by an equal volume of fresh water. All water held is
/// treated as fully mixed.
#[derive(Debug)]
pub struct StorageTank {
    pool: PacketPool,
    threshold_temperature: f64, // deg C
    threshold_latch: ThresholdLatch,
    return_flow: bool,
    outside_flow_rate_when_on: f64, // m^3/s
    inlet_temperature: f64,         // deg C
    outside_flow_rate: f64,         // m^3/s
    pump_flow_rate: f64,            // m^3/s
    received_from_heater: f64,      // litres, since last update
    threshold_reported_crossed: bool,
}

impl StorageTank {
    /// Arguments:
    /// * `capacity` - volume of water held by the tank, in litres; the tank starts full
    /// * `initial_temperature` - temperature of the water initially held, in deg C
    /// * `threshold_temperature` - temperature above which the tank reports its threshold
    ///                             crossed, in deg C
    /// * `threshold_latch` - whether falling back below the threshold is also reported
    /// * `return_flow` - whether water pumped in from the heater displaces an equal volume of
    ///                   tank water back to the heater
    /// * `outside_flow_rate` - flow rate of a draw-off, in m^3/s
    /// * `inlet_temperature` - temperature of the water replacing a draw-off, in deg C
    pub fn new(
        capacity: f64,
        initial_temperature: f64,
        threshold_temperature: f64,
        threshold_latch: ThresholdLatch,
        return_flow: bool,
        outside_flow_rate: f64,
        inlet_temperature: f64,
    ) -> Self {
        Self {
            pool: PacketPool::new(SYSTEM_NAME, WaterPacket::new(initial_temperature, capacity)),
            threshold_temperature,
            threshold_latch,
            return_flow,
            outside_flow_rate_when_on: outside_flow_rate,
            inlet_temperature,
            outside_flow_rate: 0.,
            pump_flow_rate: 0.,
            received_from_heater: 0.,
            threshold_reported_crossed: false,
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

    /// Current draw-off flow rate, in m^3/s
    pub fn outside_flow_rate(&self) -> f64 {
        self.outside_flow_rate
    }

    /// Pump flow rate last reported to the tank, in m^3/s
    pub fn pump_flow_rate(&self) -> f64 {
        self.pump_flow_rate
    }
}

impl System for StorageTank {
    fn name(&self) -> &'static str {
        SYSTEM_NAME
    }

    fn handle_events(&mut self, events: &EventBatch) {
        for event in events {
            match event {
                Event::WaterPacket {
                    water,
                    flow_type: FlowType::HeaterToTank,
                } => {
                    self.received_from_heater += water.volume();
                    self.pool.receive(*water);
                }
                Event::OutsideFlow { turn_on, .. } => {
                    self.outside_flow_rate = if *turn_on {
                        self.outside_flow_rate_when_on
                    } else {
                        0.
                    };
                }
                Event::PumpFlowRate { flow_rate } => self.pump_flow_rate = *flow_rate,
                Event::WaterPacket {
                    flow_type: FlowType::TankToHeater,
                    ..
                }
                | Event::PumpTrigger { .. }
                | Event::TankTempThreshold { .. } => {}
            }
        }
    }

    fn update(
        &mut self,
        simulation_time_iteration: &SimulationTimeIteration,
        outbox: &mut EventBatch,
    ) -> anyhow::Result<()> {
        if self.outside_flow_rate > 0. {
            let volume =
                flow_volume_in_litres(self.outside_flow_rate, simulation_time_iteration.timestep);
            self.pool.withdraw(volume)?;
            self.pool.receive(WaterPacket::new(self.inlet_temperature, volume));
        }

        if self.return_flow && self.received_from_heater > 0. {
            let water = self.pool.withdraw(self.received_from_heater)?;
            outbox.push(Event::WaterPacket {
                water,
                flow_type: FlowType::TankToHeater,
            });
        }
        self.received_from_heater = 0.;

        self.pool.merge()?;

        let temperature = self.temperature()?;
        if temperature > self.threshold_temperature {
            if !self.threshold_reported_crossed {
                debug!(
                    time = %simulation_time_iteration.time_of_day(),
                    temperature,
                    "storage tank crossed threshold"
                );
            }
            self.threshold_reported_crossed = true;
            outbox.push(Event::TankTempThreshold { is_crossed: true });
        } else if self.threshold_latch == ThresholdLatch::Symmetric
            && self.threshold_reported_crossed
        {
            debug!(
                time = %simulation_time_iteration.time_of_day(),
                temperature,
                "storage tank fell back below threshold"
            );
            self.threshold_reported_crossed = false;
            outbox.push(Event::TankTempThreshold { is_crossed: false });
        }

        Ok(())
    }

    fn register_reading(&self, readings: &mut Readings) -> anyhow::Result<()> {
        readings.tank_temperatures.push(self.temperature()?);
        Ok(())
    }
}

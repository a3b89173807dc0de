use crate::core::water_packet::WaterPacket;

/// Direction of a water transfer between the heater and the storage tank.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlowType {
    HeaterToTank,
    TankToHeater,
}

/// A message between systems. Events are the only channel between systems: an event emitted
/// during one tick's update is handled by every system on the following tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    PumpTrigger { turn_on: bool },
    /// Flow rate of the pump, in m^3/s. Nothing emits this yet.
    PumpFlowRate { flow_rate: f64 },
    TankTempThreshold { is_crossed: bool },
    /// Draw-off from the tank, replaced by water from outside. Flow rate in m^3/s.
    OutsideFlow { turn_on: bool, flow_rate: f64 },
    WaterPacket { water: WaterPacket, flow_type: FlowType },
}

/// The events emitted during a single tick, in emission order.
///
/// Systems can only append to a batch. Once the tick ends the driver hands the whole batch, as
/// an immutable snapshot, to every system on the next tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Water packets of one flow type, in emission order.
    pub fn water_packets(&self, flow: FlowType) -> impl Iterator<Item = &WaterPacket> {
        self.events.iter().filter_map(move |event| match event {
            Event::WaterPacket { water, flow_type } if *flow_type == flow => Some(water),
            _ => None,
        })
    }

    /// Total volume of water in flight in this batch, in litres.
    pub fn water_in_flight(&self) -> f64 {
        self.water_packets(FlowType::HeaterToTank)
            .chain(self.water_packets(FlowType::TankToHeater))
            .map(WaterPacket::volume)
            .sum()
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<Event> for EventBatch {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

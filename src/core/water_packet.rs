use crate::errors::SimulationError;

/// Temperature of the rig's surroundings and of mains water, in deg C
pub const ROOM_TEMPERATURE: f64 = 22.;

/// A quantity of water at a single, uniform temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaterPacket {
    temperature: f64, // deg C
    volume: f64,      // litres
}

impl WaterPacket {
    pub fn new(temperature: f64, volume: f64) -> Self {
        Self {
            temperature,
            volume,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub(crate) fn raise_temperature(&mut self, delta: f64) {
        self.temperature += delta;
    }
}

/// Merge packets into one using the volume weighted average of their temperatures.
///
/// Returns None for an empty slice, or for packets with no total volume, where the merged
/// temperature is undefined.
pub fn merge_packets(packets: &[WaterPacket]) -> Option<WaterPacket> {
    if let [single] = packets {
        return (single.volume != 0.).then_some(*single);
    }

    let (energy, volume) = packets
        .iter()
        .fold((0., 0.), |(energy, volume), packet| {
            (
                energy + packet.temperature * packet.volume,
                volume + packet.volume,
            )
        });

    if packets.is_empty() || volume == 0. {
        return None;
    }

    Some(WaterPacket::new(energy / volume, volume))
}

/// The water held by a system: a primary packet followed by any inflows that have not yet been
/// merged into it.
#[derive(Clone, Debug)]
pub struct PacketPool {
    system: &'static str,
    packets: Vec<WaterPacket>,
}

impl PacketPool {
    /// Arguments:
    /// * `system` - name of the owning system, used in error reporting
    /// * `primary` - the water initially held
    pub fn new(system: &'static str, primary: WaterPacket) -> Self {
        Self {
            system,
            packets: vec![primary],
        }
    }

    pub fn primary(&self) -> Result<&WaterPacket, SimulationError> {
        self.packets
            .first()
            .ok_or(SimulationError::EmptyPacketPool {
                system: self.system,
            })
    }

    fn primary_mut(&mut self) -> Result<&mut WaterPacket, SimulationError> {
        let system = self.system;
        self.packets
            .first_mut()
            .ok_or(SimulationError::EmptyPacketPool { system })
    }

    /// Temperature of the primary packet, in deg C
    pub fn temperature(&self) -> Result<f64, SimulationError> {
        Ok(self.primary()?.temperature)
    }

    /// Volume held across every packet, merged or not, in litres
    pub fn total_volume(&self) -> f64 {
        self.packets.iter().map(WaterPacket::volume).sum()
    }

    pub fn packets(&self) -> &[WaterPacket] {
        &self.packets
    }

    /// Hold an inflow until the next merge.
    pub fn receive(&mut self, packet: WaterPacket) {
        self.packets.push(packet);
    }

    /// Take a volume out of the primary packet, returning it as a packet at the primary's
    /// temperature.
    pub fn withdraw(&mut self, volume: f64) -> Result<WaterPacket, SimulationError> {
        let system = self.system;
        let primary = self.primary_mut()?;
        primary.volume -= volume;

        if primary.volume < 0. {
            return Err(SimulationError::NegativeVolume {
                system,
                volume: primary.volume,
            });
        }

        Ok(WaterPacket::new(primary.temperature, volume))
    }

    /// Merge every held packet into a single primary packet.
    pub fn merge(&mut self) -> Result<(), SimulationError> {
        if self.packets.is_empty() {
            return Err(SimulationError::EmptyPacketPool {
                system: self.system,
            });
        }

        let merged = merge_packets(&self.packets).ok_or(SimulationError::ZeroVolume {
            system: self.system,
        })?;
        self.packets = vec![merged];

        Ok(())
    }

    pub(crate) fn raise_temperature(&mut self, delta: f64) -> Result<(), SimulationError> {
        self.primary_mut()?.raise_temperature(delta);
        Ok(())
    }
}

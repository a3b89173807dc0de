use std::sync::LazyLock;

/// This module contains data on the properties of materials, and classes to
/// organise this data.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialProperties {
    density: f64,                  // kg/litre
    specific_heat_capacity: f64,   // J/(kg.K)
    volumetric_heat_capacity: f64, // J/(litre.K)
}

impl MaterialProperties {
    pub fn new(density: f64, specific_heat_capacity: f64) -> Self {
        Self {
            density,
            specific_heat_capacity,
            volumetric_heat_capacity: specific_heat_capacity * density,
        }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn specific_heat_capacity(&self) -> f64 {
        self.specific_heat_capacity
    }

    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.volumetric_heat_capacity
    }

    /// Temperature rise, in K, of a volume of the material absorbing some energy
    ///
    /// Arguments:
    /// * `energy` - heat absorbed, in J
    /// * `volume` - volume of material absorbing the heat, in litres
    pub fn temperature_rise(&self, energy: f64, volume: f64) -> f64 {
        energy / (self.volumetric_heat_capacity * volume)
    }
}

pub static WATER: LazyLock<MaterialProperties> =
    LazyLock::new(|| MaterialProperties::new(1.0, 4182.0));

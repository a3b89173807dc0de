pub mod events;
pub mod heater;
pub mod material_properties;
pub mod outlet_scheduler;
pub mod solar_profile;
pub mod storage_tank;
pub mod system;
pub mod units;
pub mod water_packet;

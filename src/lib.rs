#![allow(clippy::too_many_arguments)]

pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod results;
pub mod simulation;
pub mod simulation_time;

#[cfg(test)]
mod tests;

pub use crate::results::RunResults;
pub use crate::simulation::Simulation;
use crate::core::system::Readings;
use crate::input::{ingest_for_processing, DrawOffInput};
use crate::output::Output;
use anyhow::bail;
use csv::{Writer, WriterBuilder};
use indexmap::IndexMap;
use std::io::{Read, Write};
use std::sync::LazyLock;
use tracing::info;

pub const OUTPUT_KEY: &str = "results";

/// Options for a run that sit outside of the rig description itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectFlags {
    /// Write each row of results as soon as its tick completes, rather than once the day is done
    pub animate: bool,
}

pub fn run_project(
    input: impl Read,
    output: impl Output,
    extra_draw_offs: &[DrawOffInput],
    flags: ProjectFlags,
) -> Result<RunResults, anyhow::Error> {
    let input = ingest_for_processing(input)?;

    let mut simulation = Simulation::from_input(&input, extra_draw_offs);

    if flags.animate && !output.is_noop() {
        info!("writing out to {OUTPUT_KEY} as the simulation runs");
        let mut writer = results_writer(output.writer_for_location_key(OUTPUT_KEY)?)?;
        simulation.run_with_observer(|t_it, readings| {
            write_results_row(&mut writer, t_it.index, readings)?;
            writer.flush()?;
            Ok(())
        })?;
    } else {
        simulation.run()?;
        if !output.is_noop() {
            write_results_file(output, simulation.readings())?;
        }
    }

    let seconds_per_day = simulation.simulation_time().seconds_per_day();

    Ok(RunResults::new(seconds_per_day, simulation.into_readings()))
}

pub static UNITS_MAP: LazyLock<IndexMap<&'static str, &'static str>> = LazyLock::new(|| {
    IndexMap::from([
        ("Timestep", "[s]"),
        ("Heater temperature", "[deg C]"),
        ("Tank temperature", "[deg C]"),
    ])
});

fn results_writer<W: Write>(writer: W) -> anyhow::Result<Writer<W>> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    // Write headings and units to output file
    writer.write_record(UNITS_MAP.keys())?;
    writer.write_record(UNITS_MAP.values())?;

    Ok(writer)
}

fn write_results_row(
    writer: &mut Writer<impl Write>,
    t_idx: usize,
    readings: &Readings,
) -> anyhow::Result<()> {
    let (Some(heater_temperature), Some(tank_temperature)) = (
        readings.heater_temperatures.get(t_idx),
        readings.tank_temperatures.get(t_idx),
    ) else {
        bail!("No readings were registered for timestep {t_idx}");
    };

    writer.write_record([
        t_idx.to_string(),
        heater_temperature.to_string(),
        tank_temperature.to_string(),
    ])?;

    Ok(())
}

fn write_results_file(output: impl Output, readings: &Readings) -> anyhow::Result<()> {
    info!("writing out to {OUTPUT_KEY}");
    let mut writer = results_writer(output.writer_for_location_key(OUTPUT_KEY)?)?;

    for t_idx in 0..readings.len() {
        write_results_row(&mut writer, t_idx, readings)?;
    }

    writer.flush()?;

    Ok(())
}

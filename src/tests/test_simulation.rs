use crate::core::events::{Event, FlowType};
use crate::core::water_packet::WaterPacket;
use crate::errors::SimulationError;
use crate::input::{DrawOffInput, DrawOffStart, Input, ThresholdLatch};
use crate::simulation::Simulation;
use crate::simulation_time::{SimulationTime, SimulationTimeIteration};
use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use rstest::*;

/// The default rig, over a shorter day and with no sun.
#[fixture]
fn dark_rig() -> Input {
    let mut input = Input::default();
    input.simulation_time.seconds_per_day = 2000;
    input.solar_panel.irradiance = vec![0.];
    input
}

/// A rig with the heater already hot enough to pump.
#[fixture]
fn hot_heater_rig(mut dark_rig: Input) -> Input {
    dark_rig.heater.initial_temperature = 75.;
    dark_rig
}

fn draw_off(start: u32, duration: u32) -> DrawOffInput {
    DrawOffInput {
        start: DrawOffStart::SecondsSinceMidnight(start),
        duration,
    }
}

fn run_ticks(simulation: &mut Simulation, ticks: std::ops::Range<usize>) -> Vec<Event> {
    let mut emitted = vec![];
    for index in ticks {
        simulation
            .step(&SimulationTimeIteration::at_tick(index))
            .unwrap();
        emitted.extend(simulation.pending_events().iter().cloned());
    }
    emitted
}

/// Draw-off events only; a cold heater asks for the pump to stay off on every tick.
fn outside_flows<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| matches!(event, Event::OutsideFlow { .. }))
        .cloned()
        .collect()
}

fn count(events: &[Event], event: &Event) -> usize {
    events.iter().filter(|emitted| *emitted == event).count()
}

#[rstest]
fn events_should_be_delivered_on_the_following_tick(hot_heater_rig: Input) {
    let mut simulation = Simulation::from_input(&hot_heater_rig, &[]);

    simulation
        .step(&SimulationTimeIteration::at_tick(0))
        .unwrap();
    assert!(simulation.delivered_events().is_empty());
    assert_eq!(
        simulation.pending_events().iter().collect::<Vec<_>>(),
        vec![&Event::PumpTrigger { turn_on: true }]
    );
    assert!(
        !simulation.heater().is_pump_on(),
        "pump request is not seen in the tick it is made"
    );

    simulation
        .step(&SimulationTimeIteration::at_tick(1))
        .unwrap();
    assert!(simulation.heater().is_pump_on());
    let pumped: Vec<_> = simulation
        .pending_events()
        .water_packets(FlowType::HeaterToTank)
        .copied()
        .collect();
    assert_eq!(pumped.len(), 1);
    assert_eq!(pumped[0].temperature(), 75.);
    assert_relative_eq!(pumped[0].volume(), 1.14, max_relative = 1e-12);
    assert_eq!(
        simulation.storage_tank().volume(),
        1000.,
        "pumped water has not reached the tank yet"
    );
    assert_eq!(simulation.storage_tank().temperature().unwrap(), 22.);

    simulation
        .step(&SimulationTimeIteration::at_tick(2))
        .unwrap();
    assert_eq!(
        simulation
            .delivered_events()
            .water_packets(FlowType::HeaterToTank)
            .copied()
            .collect::<Vec<WaterPacket>>(),
        pumped
    );
    assert!(simulation.storage_tank().temperature().unwrap() > 22.);
}

#[rstest]
fn water_should_be_conserved_across_rig(mut hot_heater_rig: Input) {
    hot_heater_rig.solar_panel.irradiance = vec![0., 1000., 500.];
    let mut simulation = Simulation::from_input(&hot_heater_rig, &[draw_off(100, 300)]);
    let initial_water = simulation.total_water();
    assert_eq!(initial_water, 1100.);

    for t_it in SimulationTime::new(2000) {
        simulation.step(&t_it).unwrap();
        assert_relative_eq!(simulation.total_water(), initial_water, max_relative = 1e-9);
        assert!(simulation.heater().volume() > 0.);
    }
}

#[rstest]
fn pump_should_stop_once_tank_is_hot(mut hot_heater_rig: Input) {
    hot_heater_rig.storage_tank.initial_temperature = 55.;
    let mut simulation = Simulation::from_input(&hot_heater_rig, &[]);

    let emitted = run_ticks(&mut simulation, 0..50);

    assert_eq!(count(&emitted, &Event::PumpTrigger { turn_on: true }), 1);
    assert!(!simulation.heater().is_pump_on());
    assert!(simulation.heater().is_tank_threshold_crossed());
    assert_eq!(
        emitted
            .iter()
            .filter(|event| matches!(
                event,
                Event::WaterPacket {
                    flow_type: FlowType::HeaterToTank,
                    ..
                }
            ))
            .count(),
        1,
        "pump runs for the single tick before it hears about the tank"
    );
}

#[rstest]
fn one_way_latch_should_keep_pump_off_after_tank_cools(mut hot_heater_rig: Input) {
    hot_heater_rig.storage_tank.initial_temperature = 50.2;
    hot_heater_rig.storage_tank.threshold_latch = ThresholdLatch::OneWay;
    let mut simulation = Simulation::from_input(&hot_heater_rig, &[draw_off(0, 200)]);

    let emitted = run_ticks(&mut simulation, 0..400);

    assert!(simulation.storage_tank().temperature().unwrap() < 50.);
    assert_eq!(
        count(&emitted, &Event::TankTempThreshold { is_crossed: false }),
        0
    );
    assert_eq!(count(&emitted, &Event::PumpTrigger { turn_on: true }), 1);
    assert!(simulation.heater().is_tank_threshold_crossed());
}

#[rstest]
fn symmetric_latch_should_let_pump_restart_after_tank_cools(mut hot_heater_rig: Input) {
    hot_heater_rig.storage_tank.initial_temperature = 50.2;
    hot_heater_rig.storage_tank.threshold_latch = ThresholdLatch::Symmetric;
    let mut simulation = Simulation::from_input(&hot_heater_rig, &[draw_off(0, 200)]);

    let emitted = run_ticks(&mut simulation, 0..400);

    assert!(count(&emitted, &Event::TankTempThreshold { is_crossed: false }) >= 1);
    assert!(count(&emitted, &Event::PumpTrigger { turn_on: true }) >= 2);
}

#[rstest]
fn heater_temperature_should_hold_without_sun(mut dark_rig: Input) {
    dark_rig.simulation_time.seconds_per_day = 1000;
    let mut simulation = Simulation::from_input(&dark_rig, &[]);

    simulation.run().unwrap();

    let heater_temperatures = &simulation.readings().heater_temperatures;
    assert_eq!(heater_temperatures.len(), 1000);
    assert!(heater_temperatures
        .windows(2)
        .all(|pair| pair[1] >= pair[0]));
    assert!(heater_temperatures.iter().all(|&temperature| temperature == 22.));
    assert!(!simulation.heater().is_pump_on());
}

#[rstest]
fn heater_temperature_should_rise_in_sunshine_while_pump_is_off() {
    let mut input = Input::default();
    input.simulation_time.seconds_per_day = 3000;
    input.solar_panel.irradiance = vec![1000.];
    input.heater.threshold_temperature = 1000.;
    let mut simulation = Simulation::from_input(&input, &[]);

    simulation.run().unwrap();

    let heater_temperatures = &simulation.readings().heater_temperatures;
    assert!(heater_temperatures
        .windows(2)
        .all(|pair| pair[1] > pair[0]));
    // 50 A through 50 ohm for 3000 s into 100 litres
    assert_relative_eq!(
        heater_temperatures[2999],
        22. + 3000. * 125_000. / (4182. * 100.),
        max_relative = 1e-9
    );
}

#[rstest]
fn draw_off_should_run_from_the_tick_after_it_starts(mut dark_rig: Input) {
    dark_rig.storage_tank.initial_temperature = 40.;
    let mut simulation = Simulation::from_input(&dark_rig, &[draw_off(1000, 50)]);

    run_ticks(&mut simulation, 0..1001);
    assert_eq!(simulation.storage_tank().outside_flow_rate(), 0.);
    assert_eq!(simulation.storage_tank().temperature().unwrap(), 40.);

    run_ticks(&mut simulation, 1001..1002);
    assert_eq!(
        outside_flows(simulation.delivered_events()),
        vec![Event::OutsideFlow {
            turn_on: true,
            flow_rate: 0.0005
        }]
    );
    assert_eq!(simulation.storage_tank().outside_flow_rate(), 0.0005);

    run_ticks(&mut simulation, 1002..1051);
    assert!(!simulation.outlet_scheduler().is_flow_active());
    assert_eq!(simulation.storage_tank().outside_flow_rate(), 0.0005);

    run_ticks(&mut simulation, 1051..1052);
    assert_eq!(
        outside_flows(simulation.delivered_events()),
        vec![Event::OutsideFlow {
            turn_on: false,
            flow_rate: 0.
        }]
    );
    assert_eq!(simulation.storage_tank().outside_flow_rate(), 0.);

    // 50 ticks of half a litre replaced with water at 22 deg C
    assert_relative_eq!(simulation.storage_tank().volume(), 1000., max_relative = 1e-9);
    assert_relative_eq!(
        simulation.storage_tank().temperature().unwrap(),
        22. + 18. * 0.9995_f64.powi(50),
        max_relative = 1e-9
    );
}

#[rstest]
#[case(1)]
#[case(500)]
#[case(2000)]
fn readings_should_cover_every_tick(mut dark_rig: Input, #[case] seconds_per_day: u32) {
    dark_rig.simulation_time.seconds_per_day = seconds_per_day;
    let mut simulation = Simulation::from_input(&dark_rig, &[]);

    simulation.run().unwrap();

    let readings = simulation.into_readings();
    assert_eq!(readings.len(), seconds_per_day as usize);
    assert_eq!(readings.heater_temperatures.len(), seconds_per_day as usize);
    assert_eq!(readings.tank_temperatures.len(), seconds_per_day as usize);
}

#[rstest]
fn observer_should_see_each_tick_in_order(mut dark_rig: Input) {
    dark_rig.simulation_time.seconds_per_day = 20;
    let mut simulation = Simulation::from_input(&dark_rig, &[]);
    let mut seen = vec![];

    simulation
        .run_with_observer(|t_it, readings| {
            assert_eq!(readings.len(), t_it.index + 1);
            seen.push(t_it.index);
            Ok(())
        })
        .unwrap();

    assert_eq!(seen, (0..20).collect::<Vec<_>>());
}

#[rstest]
fn open_loop_should_abort_when_heater_runs_dry(mut hot_heater_rig: Input) {
    hot_heater_rig.storage_tank.return_flow = false;
    let mut simulation = Simulation::from_input(&hot_heater_rig, &[]);

    let error = simulation.run().unwrap_err();

    assert!(matches!(
        error.downcast_ref::<SimulationError>(),
        Some(SimulationError::NegativeVolume {
            system: "Heater",
            ..
        })
    ));
    assert!(format!("{error:#}").contains("Heater failed to update at 00:01:28 (tick 88)"));
    assert_eq!(simulation.readings().len(), 88);
}

#[rstest]
fn invalid_draw_offs_should_be_skipped(dark_rig: Input) {
    let simulation = Simulation::from_input(
        &dark_rig,
        &[
            draw_off(10, 5),
            draw_off(1990, 10),
            DrawOffInput {
                start: DrawOffStart::TimeOfDay("25:00:00".to_string()),
                duration: 5,
            },
            DrawOffInput {
                start: DrawOffStart::TimeOfDay("00:01:00".to_string()),
                duration: 5,
            },
        ],
    );

    assert_eq!(
        simulation.outlet_scheduler().draw_offs().collect::<Vec<_>>(),
        vec![(10, 5), (60, 5)]
    );
}

#[rstest]
fn input_draw_offs_should_come_before_extra_ones(mut dark_rig: Input) {
    dark_rig.draw_offs = vec![draw_off(100, 50)];
    let mut simulation = Simulation::from_input(&dark_rig, &[draw_off(100, 10)]);

    let emitted = run_ticks(&mut simulation, 0..200);

    // the later entry wins for a shared start time
    assert_eq!(
        outside_flows(&emitted),
        vec![
            Event::OutsideFlow {
                turn_on: true,
                flow_rate: 0.0005
            },
            Event::OutsideFlow {
                turn_on: false,
                flow_rate: 0.
            }
        ]
    );
    assert_eq!(simulation.storage_tank().outside_flow_rate(), 0.);
}

#[rstest]
fn default_day_should_fill_buffers_within_plausible_temperatures() {
    let mut simulation = Simulation::from_input(&Input::default(), &[draw_off(8 * 3_600, 600)]);
    let water_at_start = simulation.total_water();

    simulation.run().unwrap();

    assert_relative_eq!(simulation.total_water(), water_at_start, max_relative = 1e-9);
    let readings = simulation.into_readings();
    assert_eq!(readings.heater_temperatures.len(), 86_400);
    assert_eq!(readings.tank_temperatures.len(), 86_400);
    for temperature in readings
        .heater_temperatures
        .iter()
        .chain(&readings.tank_temperatures)
    {
        assert!(
            (0. ..=150.).contains(temperature),
            "temperature {temperature} out of range"
        );
    }
}

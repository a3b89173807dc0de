#![no_main]

use libfuzzer_sys::fuzz_target;
use solar_rig::output::SinkOutput;
use solar_rig::{run_project, ProjectFlags};
use std::io::{BufReader, Cursor};

fuzz_target!(|data: &[u8]| {
    let _run = run_project(
        BufReader::new(Cursor::new(data)),
        SinkOutput,
        &[],
        ProjectFlags::default(),
    );
});

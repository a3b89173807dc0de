extern crate solar_rig;

use clap::{ArgAction, Parser};
use solar_rig::input::DrawOffInput;
use solar_rig::output::FileOutput;
use solar_rig::{run_project, ProjectFlags};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct RigArgs {
    /// JSON description of the rig; the default rig is simulated when omitted
    input_file: Option<String>,
    /// Extra draw-off as START/DURATION, e.g. 07:30:00/300 or 27000/300
    #[arg(long = "draw-off", value_name = "START/DURATION")]
    draw_offs: Vec<DrawOffInput>,
    /// Write each row of results as soon as its tick completes
    #[arg(long, default_value_t = false)]
    animate: bool,
    /// Directory results are written to; defaults to the input file's directory
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = RigArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (input, input_file_stem, input_dir): (Box<dyn Read>, &str, PathBuf) =
        match args.input_file.as_deref() {
            Some(input_file) => {
                let path = Path::new(input_file);
                (
                    Box::new(BufReader::new(File::open(path)?)),
                    path.file_stem().and_then(OsStr::to_str).unwrap_or("rig"),
                    path.parent().map(Path::to_path_buf).unwrap_or_default(),
                )
            }
            None => (Box::new("{}".as_bytes()), "rig", PathBuf::new()),
        };

    let output_dir = args.output_dir.unwrap_or(input_dir);
    let output = FileOutput::new(output_dir, format!("{input_file_stem}__{{}}.csv"));

    let results = run_project(
        input,
        &output,
        &args.draw_offs,
        ProjectFlags {
            animate: args.animate,
        },
    )?;

    info!(seconds = results.seconds_per_day, "day simulated");
    print!("{}", results.summary());

    Ok(())
}

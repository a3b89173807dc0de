use schemars::schema_for;
use solar_rig::input::Input;

fn main() -> serde_json::Result<()> {
    let schema = schema_for!(Input);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

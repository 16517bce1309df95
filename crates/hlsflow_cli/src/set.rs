//! `hlsflow set`: changes one project setting in `hlsflow.toml`.

use hlsflow_config::{update_settings, SettingKey, Settings, SettingsUpdate};

use crate::{pipeline, GlobalArgs, SetArgs};

/// Runs the `hlsflow set` command.
pub fn run(args: &SetArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let root = pipeline::resolve_project_root(global)?;
    let update = SettingsUpdate::parse(&args.key, &args.value)?;
    let key = update.key();
    let settings = update_settings(&root, update)?;

    if !global.quiet {
        eprintln!("     Updated {key} = {}", display_value(&settings, key));
    }
    Ok(0)
}

/// Renders the stored value of `key`.
fn display_value(settings: &Settings, key: SettingKey) -> String {
    match key {
        SettingKey::TopFunction => settings.top_function.clone(),
        SettingKey::ClockPeriod => settings.clock_period.to_string(),
        SettingKey::PlacementMode => settings.placement_mode.label().to_string(),
        SettingKey::RoutingMode => settings.routing_mode.label().to_string(),
    }
}

//! `hlsflow command`: shows the command a stage would run, without running it.
//!
//! Building the placement command may generate the constraint file.

use hlsflow_flow::build_command;

use crate::{pipeline, CommandArgs, GlobalArgs};

/// Runs the `hlsflow command` command.
pub fn run(args: &CommandArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = pipeline::load(global)?;
    let command = build_command(args.stage, &project)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&command)?);
    } else {
        if !global.quiet {
            eprintln!("   Directory {}", command.working_directory.display());
        }
        println!("{}", command.display_line());
    }
    Ok(0)
}

//! `hlsflow run`: prepares and executes stages in flow order.

use std::time::Duration;

use hlsflow_flow::{run_stages, BuildOptions, StageId};

use crate::executor::ProcessExecutor;
use crate::{pipeline, GlobalArgs, RunArgs};

/// Runs the `hlsflow run` command.
///
/// Stops at the first stage that cannot be prepared or whose tool fails.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let stages = select_stages(args.stage, args.to)?;
    let project = pipeline::load(global)?;

    let options = BuildOptions {
        extract_mode: pipeline::extract_mode(args.strict),
        require_inputs: true,
    };
    let mut executor =
        ProcessExecutor::new(args.timeout.map(Duration::from_secs), global.quiet)?;

    if !global.quiet {
        eprintln!("  Building {} ({} stages)", project.name, stages.len());
    }

    run_stages(&project, stages, &options, &mut executor)?;

    if let (false, Some(last)) = (global.quiet, stages.last()) {
        eprintln!("   Finished {last}");
    }
    Ok(0)
}

/// Picks the stages to run from the optional first and last stage.
///
/// No arguments runs the whole flow; a lone stage runs just that stage;
/// `--to` alone runs from the start.
fn select_stages(
    first: Option<StageId>,
    last: Option<StageId>,
) -> Result<&'static [StageId], Box<dyn std::error::Error>> {
    let (first, last) = match (first, last) {
        (None, None) => (StageId::Hls, StageId::Bitstream),
        (Some(first), None) => (first, first),
        (first, Some(last)) => (first.unwrap_or(StageId::Hls), last),
    };
    let stages = first.through(last);
    if stages.is_empty() {
        return Err(format!("stage '{last}' comes before '{first}'").into());
    }
    Ok(stages)
}

//! `hlsflow constraints`: generates the pin constraint file on demand.
//!
//! Uses the same rules as the placement stage: a declared constraint file
//! wins, an existing generated file is reused, otherwise one is generated
//! from the HLS output.

use hlsflow_constraints::Direction;
use hlsflow_flow::ensure_constraints;

use crate::{pipeline, ConstraintsArgs, GlobalArgs};

/// Runs the `hlsflow constraints` command. Prints the constraint file path.
pub fn run(args: &ConstraintsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = pipeline::load(global)?;

    if !global.quiet {
        eprintln!(
            "    Device {} ({} inputs, {} outputs)",
            project.catalog.device(),
            project.catalog.pins(Direction::Input).len(),
            project.catalog.pins(Direction::Output).len()
        );
    }

    let path = ensure_constraints(&project, pipeline::extract_mode(args.strict))?;
    println!("{}", project.path(&path).display());
    Ok(0)
}

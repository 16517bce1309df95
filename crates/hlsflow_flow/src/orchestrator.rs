//! The flow orchestrator: builds one stage's command from the current project.
//!
//! [`build_command`] is self-contained. It reads the project and the file
//! system, may write the constraint artifact for the placement stage, and
//! returns a [`CommandDescriptor`]. It keeps no state between calls, so any
//! stage can be rebuilt after the caller fixes whatever made it fail.

use hlsflow_config::{FileKind, Project};
use hlsflow_constraints::{generate_constraints, ConstraintRequest, ExtractMode};
use tracing::{debug, info};

use crate::command::CommandDescriptor;
use crate::error::{FlowError, GenerationFailure, RunError};
use crate::naming::{constraint_artifact, hls_output_name, input_artifact, output_artifact};
use crate::stage::{descriptor, StageId, StageInputs};

/// Knobs for command construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// How strictly the port extractor reads the generated hardware description.
    pub extract_mode: ExtractMode,
    /// Fail with [`FlowError::MissingArtifact`] when the stage's input file
    /// does not exist yet.
    pub require_inputs: bool,
}

/// Builds the command for `stage` with default options.
pub fn build_command(stage: StageId, project: &Project) -> Result<CommandDescriptor, FlowError> {
    build_command_with(stage, project, &BuildOptions::default())
}

/// Builds the command for `stage`.
///
/// For the placement stage this may generate the constraint artifact as a
/// side effect. No descriptor is produced if any precondition fails.
pub fn build_command_with(
    stage: StageId,
    project: &Project,
    options: &BuildOptions,
) -> Result<CommandDescriptor, FlowError> {
    let desc = descriptor(stage);

    let input = input_artifact(stage, project)?;
    if options.require_inputs {
        let path = project.path(&input);
        if !path.exists() {
            return Err(FlowError::MissingArtifact { stage, path });
        }
    }
    let output = output_artifact(stage, project)?;

    let constraint = if desc.needs_constraint {
        Some(ensure_constraints_for(stage, project, options.extract_mode)?)
    } else {
        None
    };

    let inputs = StageInputs {
        project,
        input,
        output,
        constraint,
    };
    let arguments = (desc.arguments)(&inputs);
    let executable = (desc.executable)(&project.toolchain).to_string();

    debug!(%stage, %executable, ?arguments, "built stage command");

    Ok(CommandDescriptor {
        executable,
        arguments,
        working_directory: project.root.clone(),
    })
}

/// Returns the constraint file the placement stage should use.
///
/// A file tagged `constraint` in the project wins. Otherwise the artifact
/// `<project>_bambu_cons.xml` is generated from the HLS output, or reused if
/// it already exists. The returned path is as passed to the placer: relative
/// to the project root for generated files, as configured for declared ones.
pub fn ensure_constraints(project: &Project, mode: ExtractMode) -> Result<String, FlowError> {
    ensure_constraints_for(StageId::Place, project, mode)
}

fn ensure_constraints_for(
    stage: StageId,
    project: &Project,
    mode: ExtractMode,
) -> Result<String, FlowError> {
    if let Some(declared) = project.first_file(FileKind::Constraint) {
        debug!(path = %declared.path.display(), "using declared constraint file");
        return Ok(declared.path.to_string_lossy().into_owned());
    }

    let name = constraint_artifact(&project.name);
    let destination = project.path(&name);

    let hdl_name = project
        .first_file(FileKind::Source)
        .and_then(|f| hls_output_name(&f.path));
    let hdl_path = match hdl_name {
        Some(hdl) => project.path(hdl),
        // Without a source the generated Verilog cannot be located, but a
        // cached artifact is still usable.
        None if destination.exists() => return Ok(name),
        None => {
            return Err(FlowError::MissingConstraint {
                stage,
                source: GenerationFailure::NoSource,
            })
        }
    };

    let request = ConstraintRequest {
        hdl_path: &hdl_path,
        top_function: &project.settings.top_function,
        catalog: &project.catalog,
        destination: &destination,
        mode,
    };
    generate_constraints(&request).map_err(|e| FlowError::MissingConstraint {
        stage,
        source: e.into(),
    })?;
    Ok(name)
}

/// Runs prepared commands. Implemented outside this crate.
pub trait Executor {
    /// Failure reported for one command.
    type Error: std::error::Error + 'static;

    /// Runs `command` for `stage` to completion.
    fn execute(&mut self, stage: StageId, command: &CommandDescriptor) -> Result<(), Self::Error>;
}

/// Prepares and executes `stages` in order, stopping at the first failure.
///
/// Each command is built just before it runs, so a stage sees the artifacts
/// written by the stages before it.
pub fn run_stages<E: Executor>(
    project: &Project,
    stages: &[StageId],
    options: &BuildOptions,
    executor: &mut E,
) -> Result<(), RunError<E::Error>> {
    for &stage in stages {
        let command = build_command_with(stage, project, options)?;
        info!(%stage, "running stage");
        executor
            .execute(stage, &command)
            .map_err(|source| RunError::Execute { stage, source })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlsflow_config::{load_config_from_str, resolve_project, SettingsUpdate};
    use hlsflow_config::{PlacementMode, RoutingMode};
    use std::path::Path;

    fn project(root: &Path, extra: &str) -> Project {
        let toml = format!(
            r#"
[project]
name = "adder"

[[files]]
path = "src/adder.c"
{extra}
"#
        );
        let config = load_config_from_str(&toml).unwrap();
        resolve_project(&config, root).unwrap()
    }

    const DECLARED: &str = r#"
[[files]]
path = "pins/board.xml"
kind = "constraint"
"#;

    // -- descriptors --

    #[test]
    fn hls_command() {
        let p = project(Path::new("/proj"), "");
        let p = p.with_update(SettingsUpdate::TopFunction("adder".to_string()));
        let cmd = build_command(StageId::Hls, &p).unwrap();
        assert_eq!(cmd.executable, "bambu");
        assert_eq!(
            cmd.arguments,
            vec!["src/adder.c", "--top-fname=adder", "--clock-period=10"]
        );
        assert_eq!(cmd.working_directory, Path::new("/proj"));
    }

    #[test]
    fn synthesis_reads_hls_exception() {
        let p = project(Path::new("/proj"), "");
        let cmd = build_command(StageId::Synthesis, &p).unwrap();
        assert_eq!(cmd.executable, "yosys");
        assert_eq!(
            cmd.arguments,
            vec!["-i", "adder.v", "-o", "adder_bambu_syn.edf", "-t", "main"]
        );
    }

    #[test]
    fn place_with_declared_constraint() {
        let p = project(Path::new("/proj"), DECLARED);
        let cmd = build_command(StageId::Place, &p).unwrap();
        assert_eq!(
            cmd.arguments,
            vec![
                "-a",
                "hw_lib/fdp3p7_arch.xml",
                "-d",
                "hw_lib/fdp3p7_dly.xml",
                "-i",
                "adder_bambu_pack.xml",
                "-o",
                "adder_bambu_place.xml",
                "-c",
                "pins/board.xml",
                "-t",
            ]
        );
    }

    #[test]
    fn mode_flags_follow_settings() {
        let p = project(Path::new("/proj"), DECLARED);
        let bb = p.with_update(SettingsUpdate::PlacementMode(PlacementMode::BoundingBox));
        let place = build_command(StageId::Place, &bb).unwrap();
        assert_eq!(place.arguments.last().map(String::as_str), Some("-b"));

        let ds = p.with_update(SettingsUpdate::RoutingMode(RoutingMode::DirectSearch));
        let route = build_command(StageId::Route, &ds).unwrap();
        assert_eq!(route.arguments.last().map(String::as_str), Some("-d"));

        let bf = p.with_update(SettingsUpdate::RoutingMode(RoutingMode::from_label(
            "Breath First",
        )));
        let route = build_command(StageId::Route, &bf).unwrap();
        assert_eq!(route.arguments.last().map(String::as_str), Some("-b"));

        let route = build_command(StageId::Route, &p).unwrap();
        assert_eq!(route.arguments.last().map(String::as_str), Some("-t"));
    }

    #[test]
    fn bitstream_command() {
        let p = project(Path::new("/proj"), "");
        let cmd = build_command(StageId::Bitstream, &p).unwrap();
        assert_eq!(cmd.executable, "bitgen");
        assert_eq!(
            cmd.arguments,
            vec![
                "-a",
                "hw_lib/fdp3p7_arch.xml",
                "-c",
                "hw_lib/fdp3_cell.xml",
                "-n",
                "adder_bambu_route.xml",
                "-b",
                "adder_bambu_bit.bit",
            ]
        );
    }

    // -- preconditions --

    #[test]
    fn require_inputs_reports_missing_artifact() {
        let tmp = tempfile::TempDir::new().unwrap();
        let p = project(tmp.path(), "");
        let options = BuildOptions {
            require_inputs: true,
            ..BuildOptions::default()
        };
        let err = build_command_with(StageId::Map, &p, &options).unwrap_err();
        match err {
            FlowError::MissingArtifact { stage, path } => {
                assert_eq!(stage, StageId::Map);
                assert_eq!(path, tmp.path().join("adder_bambu_syn.edf"));
            }
            other => panic!("unexpected error: {other}"),
        }

        std::fs::write(tmp.path().join("adder_bambu_syn.edf"), "").unwrap();
        assert!(build_command_with(StageId::Map, &p, &options).is_ok());
    }

    #[test]
    fn place_without_hdl_fails_with_missing_constraint() {
        let tmp = tempfile::TempDir::new().unwrap();
        let p = project(tmp.path(), "");
        let err = build_command(StageId::Place, &p).unwrap_err();
        assert!(matches!(
            err,
            FlowError::MissingConstraint {
                stage: StageId::Place,
                source: GenerationFailure::Constraint(_)
            }
        ));
        assert!(!tmp.path().join("adder_bambu_cons.xml").exists());
    }
}

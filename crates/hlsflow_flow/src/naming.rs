//! Artifact naming.
//!
//! Every stage output is `<project>_bambu_<suffix>.<ext>` except the HLS
//! stage, whose output is named by the HLS tool after the source file:
//! `<source base name>.v`. The synthesis stage has to know about that
//! exception to find its input.

use std::path::Path;

use hlsflow_config::{FileKind, Project};

use crate::error::FlowError;
use crate::stage::{descriptor, InputRule, OutputRule, StageId};

/// Tool tag embedded in every uniform artifact name.
pub const ARTIFACT_TAG: &str = "bambu";

/// Suffix of the constraint artifact.
const CONSTRAINT_SUFFIX: &str = "cons";

/// Returns `<project>_bambu_<suffix>.<ext>`.
pub fn artifact_name(project: &str, suffix: &str, ext: &str) -> String {
    format!("{project}_{ARTIFACT_TAG}_{suffix}.{ext}")
}

/// Returns the name of the auto-generated constraint artifact.
pub fn constraint_artifact(project: &str) -> String {
    artifact_name(project, CONSTRAINT_SUFFIX, "xml")
}

/// Returns the name the HLS tool gives its output for `source`.
///
/// `None` if the path has no file stem.
pub fn hls_output_name(source: &Path) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    Some(format!("{stem}.v"))
}

/// Returns the project's first compilable source, as passed to the HLS tool.
pub(crate) fn source_path(stage: StageId, project: &Project) -> Result<String, FlowError> {
    project
        .first_file(FileKind::Source)
        .map(|f| f.path.to_string_lossy().into_owned())
        .ok_or_else(|| FlowError::MissingSource {
            stage,
            project: project.name.clone(),
        })
}

/// Returns the output artifact name of `stage`.
///
/// Fails with [`FlowError::MissingSource`] only for the HLS stage, whose
/// output name depends on the source file.
pub fn output_artifact(stage: StageId, project: &Project) -> Result<String, FlowError> {
    match descriptor(stage).output {
        OutputRule::Uniform { suffix, ext } => Ok(artifact_name(&project.name, suffix, ext)),
        OutputRule::SourceBase { ext } => {
            let source = source_path(stage, project)?;
            let stem = Path::new(&source)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| FlowError::MissingSource {
                    stage,
                    project: project.name.clone(),
                })?;
            Ok(format!("{stem}.{ext}"))
        }
    }
}

/// Returns the input artifact name of `stage`.
///
/// The HLS stage reads the project source; every other stage reads the
/// previous stage's output, so synthesis inherits the HLS exception.
pub fn input_artifact(stage: StageId, project: &Project) -> Result<String, FlowError> {
    match (descriptor(stage).input, stage.previous()) {
        (InputRule::PreviousStage, Some(previous)) => {
            output_artifact(previous, project).map_err(|e| retag(e, stage))
        }
        _ => source_path(stage, project),
    }
}

fn retag(err: FlowError, stage: StageId) -> FlowError {
    match err {
        FlowError::MissingSource { project, .. } => FlowError::MissingSource { stage, project },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlsflow_config::{load_config_from_str, resolve_project};

    fn project(toml: &str) -> Project {
        let config = load_config_from_str(toml).unwrap();
        resolve_project(&config, Path::new("/proj")).unwrap()
    }

    const WITH_SOURCE: &str = r#"
[project]
name = "adder"

[[files]]
path = "src/adder_top.c"
"#;

    const NO_SOURCE: &str = r#"
[project]
name = "adder"

[[files]]
path = "notes.txt"
"#;

    #[test]
    fn uniform_names() {
        assert_eq!(artifact_name("adder", "syn", "edf"), "adder_bambu_syn.edf");
        assert_eq!(constraint_artifact("adder"), "adder_bambu_cons.xml");
    }

    #[test]
    fn hls_output_uses_source_stem() {
        assert_eq!(
            hls_output_name(Path::new("src/fir.cpp")).as_deref(),
            Some("fir.v")
        );
        assert_eq!(hls_output_name(Path::new("")), None);
    }

    #[test]
    fn output_chain() {
        let p = project(WITH_SOURCE);
        let outputs: Vec<_> = StageId::ALL
            .iter()
            .map(|s| output_artifact(*s, &p).unwrap())
            .collect();
        assert_eq!(
            outputs,
            vec![
                "adder_top.v",
                "adder_bambu_syn.edf",
                "adder_bambu_map.xml",
                "adder_bambu_pack.xml",
                "adder_bambu_place.xml",
                "adder_bambu_route.xml",
                "adder_bambu_bit.bit",
            ]
        );
    }

    #[test]
    fn each_input_is_the_previous_output() {
        let p = project(WITH_SOURCE);
        assert_eq!(input_artifact(StageId::Hls, &p).unwrap(), "src/adder_top.c");
        for stage in &StageId::ALL[1..] {
            let previous = stage.previous().unwrap();
            assert_eq!(
                input_artifact(*stage, &p).unwrap(),
                output_artifact(previous, &p).unwrap()
            );
        }
    }

    #[test]
    fn missing_source_is_tagged_with_requesting_stage() {
        let p = project(NO_SOURCE);
        let err = input_artifact(StageId::Synthesis, &p).unwrap_err();
        assert_eq!(err.stage(), StageId::Synthesis);
        assert!(matches!(err, FlowError::MissingSource { .. }));
        // Later stages do not depend on the source.
        assert_eq!(input_artifact(StageId::Map, &p).unwrap(), "adder_bambu_syn.edf");
    }
}

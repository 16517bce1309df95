//! Error types for stage preparation and flow runs.

use std::path::PathBuf;

use hlsflow_constraints::ConstraintError;

use crate::stage::StageId;

/// Why a stage's command could not be built. Every message names the stage.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The project has no compilable source file.
    #[error("{stage}: project '{project}' has no compilable source file")]
    MissingSource {
        /// The stage being prepared.
        stage: StageId,
        /// The project name.
        project: String,
    },

    /// No constraint file was declared and generating one failed.
    #[error("{stage}: no constraint file declared and auto-generation failed: {source}")]
    MissingConstraint {
        /// The stage being prepared.
        stage: StageId,
        /// Why generation failed.
        source: GenerationFailure,
    },

    /// An artifact the stage reads does not exist.
    #[error("{stage}: expected artifact {path} not found")]
    MissingArtifact {
        /// The stage being prepared.
        stage: StageId,
        /// The absent file.
        path: PathBuf,
    },
}

impl FlowError {
    /// Returns the stage this error belongs to.
    pub fn stage(&self) -> StageId {
        match self {
            FlowError::MissingSource { stage, .. }
            | FlowError::MissingConstraint { stage, .. }
            | FlowError::MissingArtifact { stage, .. } => *stage,
        }
    }
}

/// Why constraint auto-generation could not produce a file.
#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    /// There is no source file, so the generated Verilog cannot be located.
    #[error("no compilable source file to locate the generated hardware description")]
    NoSource,

    /// Reading, extraction or allocation failed.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

/// Failure of a multi-stage run.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    /// A stage's command could not be built.
    #[error(transparent)]
    Prepare(#[from] FlowError),

    /// The executor reported a failure for a stage.
    #[error("{stage}: {source}")]
    Execute {
        /// The stage that failed.
        stage: StageId,
        /// The executor's error.
        source: E,
    },
}

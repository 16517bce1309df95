//! Stage registry and command construction for the HLS-to-bitstream flow.
//!
//! The flow is a fixed sequence of external tools:
//!
//! 1. `hls`: C/C++ source to Verilog (`<source>.v`)
//! 2. `synthesis`: Verilog to EDIF netlist (`<project>_bambu_syn.edf`)
//! 3. `map`: technology mapping (`_map.xml`)
//! 4. `pack`: packing (`_pack.xml`)
//! 5. `place`: placement, constrained by a pin file (`_place.xml`)
//! 6. `route`: routing (`_route.xml`)
//! 7. `bitstream`: bitstream generation (`_bit.bit`)
//!
//! [`build_command`] turns a stage and the current [`Project`](hlsflow_config::Project)
//! into a [`CommandDescriptor`]. This crate never runs anything; descriptors are
//! handed to an [`Executor`] supplied by the caller.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod naming;
pub mod orchestrator;
pub mod stage;

pub use command::CommandDescriptor;
pub use error::{FlowError, GenerationFailure, RunError};
pub use naming::{
    artifact_name, constraint_artifact, hls_output_name, input_artifact, output_artifact,
    ARTIFACT_TAG,
};
pub use orchestrator::{
    build_command, build_command_with, ensure_constraints, run_stages, BuildOptions,
    Executor,
};
pub use stage::{
    descriptor, placement_flag, routing_flag, InputRule, OutputRule, StageDescriptor, StageId,
    StageInputs, STAGES,
};

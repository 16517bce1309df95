//! The stage registry: one immutable descriptor per toolchain stage.
//!
//! Each [`StageDescriptor`] says where the stage reads its input, how its
//! output artifact is named, which executable runs it, which settings it
//! reads, and how its argument list is assembled. The table [`STAGES`] is in
//! flow order.

use hlsflow_config::{PlacementMode, Project, RoutingMode, SettingKey, ToolchainConfig};
use serde::{Deserialize, Serialize};

/// Identifies a toolchain stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    /// High-level synthesis.
    Hls,
    /// Logic synthesis.
    Synthesis,
    /// Technology mapping.
    Map,
    /// Packing.
    Pack,
    /// Placement.
    Place,
    /// Routing.
    Route,
    /// Bitstream generation.
    Bitstream,
}

impl StageId {
    /// All stages in flow order.
    pub const ALL: [StageId; 7] = [
        StageId::Hls,
        StageId::Synthesis,
        StageId::Map,
        StageId::Pack,
        StageId::Place,
        StageId::Route,
        StageId::Bitstream,
    ];

    /// Returns the canonical stage name.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Hls => "hls",
            StageId::Synthesis => "synthesis",
            StageId::Map => "map",
            StageId::Pack => "pack",
            StageId::Place => "place",
            StageId::Route => "route",
            StageId::Bitstream => "bitstream",
        }
    }

    /// Parses a stage name. `syn` and `bit` are accepted as short forms.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hls" => Some(StageId::Hls),
            "synthesis" | "syn" => Some(StageId::Synthesis),
            "map" => Some(StageId::Map),
            "pack" => Some(StageId::Pack),
            "place" => Some(StageId::Place),
            "route" => Some(StageId::Route),
            "bitstream" | "bit" => Some(StageId::Bitstream),
            _ => None,
        }
    }

    /// Returns the position of this stage in flow order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Returns the stage whose output this stage reads, if any.
    pub fn previous(&self) -> Option<StageId> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Returns the stages from `self` through `last`, inclusive, in flow order.
    ///
    /// Empty if `last` comes before `self`.
    pub fn through(&self, last: StageId) -> &'static [StageId] {
        static ORDER: [StageId; 7] = StageId::ALL;
        if last < *self {
            return &[];
        }
        &ORDER[self.index()..=last.index()]
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageId::parse(s).ok_or_else(|| {
            format!(
                "unknown stage '{s}' (valid: hls, synthesis, map, pack, place, route, bitstream)"
            )
        })
    }
}

/// Where a stage's input artifact comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    /// The project's first compilable source file.
    ProjectSource,
    /// The output artifact of the previous stage.
    PreviousStage,
}

/// How a stage's output artifact is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRule {
    /// `<source base name>.<ext>`, dictated by the HLS tool itself.
    SourceBase {
        /// Extension without the dot.
        ext: &'static str,
    },
    /// `<project>_bambu_<suffix>.<ext>`.
    Uniform {
        /// Stage suffix.
        suffix: &'static str,
        /// Extension without the dot.
        ext: &'static str,
    },
}

/// Everything an argument builder needs, resolved by the orchestrator.
#[derive(Debug, Clone)]
pub struct StageInputs<'a> {
    /// The project being built.
    pub project: &'a Project,
    /// Input artifact, relative to the working directory.
    pub input: String,
    /// Output artifact, relative to the working directory.
    pub output: String,
    /// Constraint file, for stages that take one.
    pub constraint: Option<String>,
}

/// Static description of one stage.
pub struct StageDescriptor {
    /// The stage.
    pub id: StageId,
    /// Input artifact rule.
    pub input: InputRule,
    /// Output artifact naming rule.
    pub output: OutputRule,
    /// Whether the stage takes a pin constraint file.
    pub needs_constraint: bool,
    /// Settings this stage reads.
    pub settings: &'static [SettingKey],
    /// Picks the executable from the toolchain description.
    pub executable: fn(&ToolchainConfig) -> &str,
    /// Assembles the argument list.
    pub arguments: fn(&StageInputs<'_>) -> Vec<String>,
}

impl std::fmt::Debug for StageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageDescriptor")
            .field("id", &self.id)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("needs_constraint", &self.needs_constraint)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// The stage table, in flow order.
pub static STAGES: [StageDescriptor; 7] = [
    StageDescriptor {
        id: StageId::Hls,
        input: InputRule::ProjectSource,
        output: OutputRule::SourceBase { ext: "v" },
        needs_constraint: false,
        settings: &[SettingKey::TopFunction, SettingKey::ClockPeriod],
        executable: hls_executable,
        arguments: hls_arguments,
    },
    StageDescriptor {
        id: StageId::Synthesis,
        input: InputRule::PreviousStage,
        output: OutputRule::Uniform {
            suffix: "syn",
            ext: "edf",
        },
        needs_constraint: false,
        settings: &[SettingKey::TopFunction],
        executable: synthesis_executable,
        arguments: synthesis_arguments,
    },
    StageDescriptor {
        id: StageId::Map,
        input: InputRule::PreviousStage,
        output: OutputRule::Uniform {
            suffix: "map",
            ext: "xml",
        },
        needs_constraint: false,
        settings: &[],
        executable: map_executable,
        arguments: map_arguments,
    },
    StageDescriptor {
        id: StageId::Pack,
        input: InputRule::PreviousStage,
        output: OutputRule::Uniform {
            suffix: "pack",
            ext: "xml",
        },
        needs_constraint: false,
        settings: &[],
        executable: pack_executable,
        arguments: pack_arguments,
    },
    StageDescriptor {
        id: StageId::Place,
        input: InputRule::PreviousStage,
        output: OutputRule::Uniform {
            suffix: "place",
            ext: "xml",
        },
        needs_constraint: true,
        settings: &[SettingKey::TopFunction, SettingKey::PlacementMode],
        executable: place_executable,
        arguments: place_arguments,
    },
    StageDescriptor {
        id: StageId::Route,
        input: InputRule::PreviousStage,
        output: OutputRule::Uniform {
            suffix: "route",
            ext: "xml",
        },
        needs_constraint: false,
        settings: &[SettingKey::RoutingMode],
        executable: route_executable,
        arguments: route_arguments,
    },
    StageDescriptor {
        id: StageId::Bitstream,
        input: InputRule::PreviousStage,
        output: OutputRule::Uniform {
            suffix: "bit",
            ext: "bit",
        },
        needs_constraint: false,
        settings: &[],
        executable: bitstream_executable,
        arguments: bitstream_arguments,
    },
];

/// Returns the descriptor for `stage`.
pub fn descriptor(stage: StageId) -> &'static StageDescriptor {
    &STAGES[stage.index()]
}

/// Placement mode flag: bounding-box `-b`, otherwise timing-driven `-t`.
pub fn placement_flag(mode: PlacementMode) -> &'static str {
    match mode {
        PlacementMode::BoundingBox => "-b",
        PlacementMode::TimingDriven => "-t",
    }
}

/// Routing mode flag: direct search `-d`, breadth-first `-b`, otherwise timing-driven `-t`.
pub fn routing_flag(mode: RoutingMode) -> &'static str {
    match mode {
        RoutingMode::DirectSearch => "-d",
        RoutingMode::BreadthFirst => "-b",
        RoutingMode::TimingDriven => "-t",
    }
}

// -- executables --

fn hls_executable(t: &ToolchainConfig) -> &str {
    &t.hls
}

fn synthesis_executable(t: &ToolchainConfig) -> &str {
    &t.synthesis
}

fn map_executable(t: &ToolchainConfig) -> &str {
    &t.map
}

fn pack_executable(t: &ToolchainConfig) -> &str {
    &t.pack
}

fn place_executable(t: &ToolchainConfig) -> &str {
    &t.place
}

fn route_executable(t: &ToolchainConfig) -> &str {
    &t.route
}

fn bitstream_executable(t: &ToolchainConfig) -> &str {
    &t.bitstream
}

// -- argument builders --

fn args<const N: usize>(words: [&str; N]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn hls_arguments(s: &StageInputs<'_>) -> Vec<String> {
    let settings = &s.project.settings;
    vec![
        s.input.clone(),
        format!("--top-fname={}", settings.top_function),
        format!("--clock-period={}", settings.clock_period),
    ]
}

fn synthesis_arguments(s: &StageInputs<'_>) -> Vec<String> {
    args([
        "-i",
        s.input.as_str(),
        "-o",
        s.output.as_str(),
        "-t",
        s.project.settings.top_function.as_str(),
    ])
}

fn map_arguments(s: &StageInputs<'_>) -> Vec<String> {
    let t = &s.project.toolchain;
    args(["-i", s.input.as_str(), "-o", s.output.as_str(), "-c", t.cell_library.as_str()])
}

fn pack_arguments(s: &StageInputs<'_>) -> Vec<String> {
    let t = &s.project.toolchain;
    args(["-n", s.input.as_str(), "-o", s.output.as_str(), "-l", t.cell_library.as_str()])
}

fn place_arguments(s: &StageInputs<'_>) -> Vec<String> {
    let t = &s.project.toolchain;
    args([
        "-a",
        t.arch_file.as_str(),
        "-d",
        t.delay_file.as_str(),
        "-i",
        s.input.as_str(),
        "-o",
        s.output.as_str(),
        "-c",
        s.constraint.as_deref().unwrap_or_default(),
        placement_flag(s.project.settings.placement_mode),
    ])
}

fn route_arguments(s: &StageInputs<'_>) -> Vec<String> {
    let t = &s.project.toolchain;
    args([
        "-a",
        t.arch_file.as_str(),
        "-n",
        s.input.as_str(),
        "-o",
        s.output.as_str(),
        routing_flag(s.project.settings.routing_mode),
    ])
}

fn bitstream_arguments(s: &StageInputs<'_>) -> Vec<String> {
    let t = &s.project.toolchain;
    args([
        "-a",
        t.arch_file.as_str(),
        "-c",
        t.cell_library.as_str(),
        "-n",
        s.input.as_str(),
        "-b",
        s.output.as_str(),
    ])
}

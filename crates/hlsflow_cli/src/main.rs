//! hlsflow CLI: drives the HLS-to-bitstream toolchain for one project.
//!
//! Provides `hlsflow init` for project scaffolding, `hlsflow command` to show
//! the command a stage would run, `hlsflow constraints` to generate the pin
//! constraint file, `hlsflow set` to change a project setting, and
//! `hlsflow run` to execute stages in order.

#![warn(missing_docs)]

mod command;
mod constraints;
mod executor;
mod init;
mod pipeline;
mod run;
mod set;

use std::process;

use clap::{ArgAction, Parser, Subcommand};
use hlsflow_flow::StageId;
use tracing_subscriber::EnvFilter;

/// hlsflow: C/C++ to FPGA bitstream through external tools.
#[derive(Parser, Debug)]
#[command(name = "hlsflow", version, about = "HLS-to-bitstream flow driver")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to the project's `hlsflow.toml` (or its directory).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,

        /// Target device (pin catalog key).
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Print the command a stage would run.
    Command(CommandArgs),
    /// Generate (or locate) the pin constraint file.
    Constraints(ConstraintsArgs),
    /// Change one project setting.
    Set(SetArgs),
    /// Run stages in flow order.
    Run(RunArgs),
}

/// Arguments for the `hlsflow command` subcommand.
#[derive(Parser, Debug)]
pub struct CommandArgs {
    /// Stage name (`hls`, `synthesis`, `map`, `pack`, `place`, `route`, `bitstream`).
    pub stage: StageId,

    /// Print the descriptor as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `hlsflow constraints` subcommand.
#[derive(Parser, Debug)]
pub struct ConstraintsArgs {
    /// Reject unrecognized lines in the port section of the generated Verilog.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `hlsflow set` subcommand.
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Setting name (`top_function`, `clock_period`, `placement_mode`, `routing_mode`).
    pub key: String,

    /// New value. Modes take their display label, e.g. "Bounding Box".
    pub value: String,
}

/// Arguments for the `hlsflow run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// First stage to run. Without `--to`, only this stage runs.
    pub stage: Option<StageId>,

    /// Last stage to run.
    #[arg(long)]
    pub to: Option<StageId>,

    /// Kill a stage that runs longer than this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Reject unrecognized lines when generating constraints.
    #[arg(long)]
    pub strict: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { name, device } => init::run(name, device, &global),
        Command::Command(ref args) => command::run(args, &global),
        Command::Constraints(ref args) => constraints::run(args, &global),
        Command::Set(ref args) => set::run(args, &global),
        Command::Run(ref args) => run::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Maps the `-v` count to a default log filter.
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_init_default() {
        let cli = Cli::parse_from(["hlsflow", "init"]);
        match cli.command {
            Command::Init { name, device } => {
                assert!(name.is_none());
                assert!(device.is_none());
            }
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_args() {
        let cli = Cli::parse_from(["hlsflow", "init", "fir", "--device", "fdp3p7"]);
        match cli.command {
            Command::Init { name, device } => {
                assert_eq!(name.as_deref(), Some("fir"));
                assert_eq!(device.as_deref(), Some("fdp3p7"));
            }
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_command_stage() {
        let cli = Cli::parse_from(["hlsflow", "command", "place", "--json"]);
        match cli.command {
            Command::Command(ref args) => {
                assert_eq!(args.stage, StageId::Place);
                assert!(args.json);
            }
            _ => panic!("expected Command command"),
        }
    }

    #[test]
    fn parse_command_stage_alias() {
        let cli = Cli::parse_from(["hlsflow", "command", "syn"]);
        match cli.command {
            Command::Command(ref args) => {
                assert_eq!(args.stage, StageId::Synthesis);
                assert!(!args.json);
            }
            _ => panic!("expected Command command"),
        }
    }

    #[test]
    fn parse_unknown_stage_fails() {
        assert!(Cli::try_parse_from(["hlsflow", "command", "simulate"]).is_err());
    }

    #[test]
    fn parse_constraints_strict() {
        let cli = Cli::parse_from(["hlsflow", "constraints", "--strict"]);
        match cli.command {
            Command::Constraints(ref args) => assert!(args.strict),
            _ => panic!("expected Constraints command"),
        }
    }

    #[test]
    fn parse_set() {
        let cli = Cli::parse_from(["hlsflow", "set", "placement_mode", "Bounding Box"]);
        match cli.command {
            Command::Set(ref args) => {
                assert_eq!(args.key, "placement_mode");
                assert_eq!(args.value, "Bounding Box");
            }
            _ => panic!("expected Set command"),
        }
    }

    #[test]
    fn parse_run_default() {
        let cli = Cli::parse_from(["hlsflow", "run"]);
        match cli.command {
            Command::Run(ref args) => {
                assert!(args.stage.is_none());
                assert!(args.to.is_none());
                assert!(args.timeout.is_none());
                assert!(!args.strict);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_range_with_timeout() {
        let cli = Cli::parse_from(["hlsflow", "run", "map", "--to", "route", "--timeout", "60"]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.stage, Some(StageId::Map));
                assert_eq!(args.to, Some(StageId::Route));
                assert_eq!(args.timeout, Some(60));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["hlsflow", "--quiet", "-vv", "--config", "/p/hlsflow.toml", "run"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("/p/hlsflow.toml"));
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(9), "trace");
    }
}

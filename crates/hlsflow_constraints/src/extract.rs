//! Port extraction from generated Verilog.
//!
//! This is a deliberately minimal recognizer for the netlists emitted by the
//! HLS tool, not a Verilog parser. It finds `module ... endmodule` blocks,
//! picks the first whose name contains the top function name, and reads the
//! non-ANSI port declarations in its body:
//!
//! ```text
//! module _Z5adderii(clock, reset, a, b, return_port);
//!   input clock;
//!   input [31:0] a;
//!   output signed [31:0] return_port;
//!   ...
//! endmodule
//! ```
//!
//! In [`ExtractMode::Permissive`] every line that does not look like a
//! declaration is skipped. Callers that want to know about such lines can use
//! [`ExtractMode::Strict`]. Everything else in this crate only sees the
//! resulting [`Module`], so the recognizer can be replaced without touching
//! the allocator or the writer.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ConstraintError;
use crate::port::{Direction, Module, Port};

/// A whole module block: name, then everything up to `endmodule`.
static MODULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bmodule\s+([A-Za-z_][A-Za-z0-9_$]*)(.*?)\bendmodule\b")
        .expect("module pattern is valid")
});

/// One non-ANSI port declaration: `direction [wire|reg|signed]* [msb:lsb]? name;`.
static DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(input|output)\b\s*(?:(?:wire|reg|signed)\b\s*)*(?:\[\s*(\d+)\s*:\s*(\d+)\s*\]\s*)?([A-Za-z_][A-Za-z0-9_$]*)\s*;",
    )
    .expect("declaration pattern is valid")
});

/// Any line opening with a direction keyword, recognized or not.
static DIRECTION_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(input|output|inout)\b").expect("direction pattern is valid"));

/// How strictly the port section of the selected module is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractMode {
    /// Skip anything that is not a recognized declaration.
    #[default]
    Permissive,
    /// Report the first unrecognized non-blank, non-comment line in the port section.
    Strict,
}

/// Finds the module implementing `target_function` and returns its ports.
///
/// The first module (in declaration order) whose name contains
/// `target_function` as a case-insensitive substring is selected; this
/// tolerates C++ name mangling such as `_Z5adderii` for `adder`. A selected
/// module with no recognizable declarations yields an empty port list.
pub fn extract_top_module(
    hdl: &str,
    target_function: &str,
    mode: ExtractMode,
) -> Result<Module, ConstraintError> {
    let needle = target_function.to_lowercase();

    let (name, block) = MODULE_RE
        .captures_iter(hdl)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .find(|(name, _)| name.to_lowercase().contains(&needle))
        .ok_or_else(|| ConstraintError::MissingModule {
            function: target_function.to_string(),
        })?;

    // Declarations live after the header, which ends at the first ';'.
    let header_len = block.find(';').map_or(block.len(), |i| i + 1);
    let header_lines = block[..header_len].lines().count().max(1);
    let body = &block[header_len..];

    if mode == ExtractMode::Strict {
        check_port_section(name, body, header_lines)?;
    }

    let mut ports = Vec::new();
    let mut skipped = 0usize;
    for line in body.lines() {
        match parse_declaration(line) {
            Some(port) => ports.push(port),
            None if !is_ignorable(line) => skipped += 1,
            None => {}
        }
    }

    debug!(
        module = name,
        ports = ports.len(),
        skipped,
        "extracted top module"
    );

    Ok(Module {
        name: name.to_string(),
        ports,
    })
}

/// Parses one declaration line, or returns `None` if it has another shape.
fn parse_declaration(line: &str) -> Option<Port> {
    let caps = DECL_RE.captures(line)?;
    let direction = Direction::from_keyword(caps.get(1)?.as_str())?;
    let name = caps.get(4)?.as_str();
    match (caps.get(2), caps.get(3)) {
        (Some(msb), Some(lsb)) => Some(Port::bus(
            name,
            direction,
            msb.as_str().parse().ok()?,
            lsb.as_str().parse().ok()?,
        )),
        _ => Some(Port::scalar(name, direction)),
    }
}

/// Returns `true` for blank and comment-only lines.
fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
}

/// Rejects unrecognized lines between the header and the last direction line.
///
/// `line_offset` is the number of header lines, so reported line numbers are
/// relative to the `module` keyword.
fn check_port_section(
    module: &str,
    body: &str,
    line_offset: usize,
) -> Result<(), ConstraintError> {
    let lines: Vec<&str> = body.lines().collect();
    let Some(section_end) = lines.iter().rposition(|l| DIRECTION_LINE_RE.is_match(l)) else {
        return Ok(());
    };

    for (idx, line) in lines[..=section_end].iter().enumerate() {
        if is_ignorable(line) || DECL_RE.is_match(line) {
            continue;
        }
        return Err(ConstraintError::UnrecognizedDeclaration {
            module: module.to_string(),
            // The body starts on the header's last line.
            line: line_offset + idx,
            text: line.trim().to_string(),
        });
    }
    Ok(())
}

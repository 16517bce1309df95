//! Port and module types recovered from a generated hardware description.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// The direction of a module port, as seen from the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Data flows into the module; needs an input-capable pin.
    Input,
    /// Data flows out of the module; needs an output-capable pin.
    Output,
}

impl Direction {
    /// Parses the Verilog direction keyword (`input` or `output`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// A single declared port.
///
/// A scalar port has `msb == lsb`. Bus ranges may be written in either order
/// (`[7:0]` or `[0:7]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The port identifier.
    pub name: String,
    /// The port direction.
    pub direction: Direction,
    /// Most-significant bit index as declared.
    pub msb: u32,
    /// Least-significant bit index as declared.
    pub lsb: u32,
}

impl Port {
    /// Creates a scalar (single-bit) port.
    pub fn scalar(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            msb: 0,
            lsb: 0,
        }
    }

    /// Creates a bus port spanning `[msb:lsb]`.
    pub fn bus(name: impl Into<String>, direction: Direction, msb: u32, lsb: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            msb,
            lsb,
        }
    }

    /// Returns `true` if this port spans more than one bit.
    pub fn is_bus(&self) -> bool {
        self.msb != self.lsb
    }

    /// Returns the bit indices in ascending order, regardless of declaration order.
    pub fn bit_range(&self) -> RangeInclusive<u32> {
        self.msb.min(self.lsb)..=self.msb.max(self.lsb)
    }

    /// Returns the name of one bit of this port: `name` for scalars, `name[bit]` for buses.
    pub fn instance_name(&self, bit: u32) -> String {
        if self.is_bus() {
            format!("{}[{}]", self.name, bit)
        } else {
            self.name.clone()
        }
    }
}

/// A module recovered from the hardware description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// The module name as emitted by the generator (often mangled).
    pub name: String,
    /// Ports in textual declaration order.
    pub ports: Vec<Port>,
}

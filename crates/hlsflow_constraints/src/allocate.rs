//! Deterministic pin allocation.
//!
//! Ports are walked in declaration order and each port bit takes the next
//! unused pin of its direction from the catalog. The mapping is injective by
//! construction: each direction's pins are consumed from a single cursor and
//! the catalog guarantees the two sequences are disjoint.

use serde::{Deserialize, Serialize};

use crate::catalog::PinCatalog;
use crate::error::ConstraintError;
use crate::port::{Direction, Port};

/// Ports with this exact name are routed on the dedicated clock network and
/// never receive an I/O pin.
pub const CLOCK_PORT: &str = "clock";

/// One port bit bound to one physical pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    /// The port instance: `name` for scalars, `name[bit]` for bus bits.
    pub instance: String,
    /// The assigned pin identifier.
    pub pin: String,
    /// The direction of the port.
    pub direction: Direction,
}

/// Assigns a pin to every bit of every port except [`CLOCK_PORT`].
///
/// Bus ports expand to one assignment per bit, lowest index first. If a
/// direction runs out of pins the whole allocation fails; no partial result
/// is returned.
pub fn assign_pins(
    ports: &[Port],
    catalog: &PinCatalog,
) -> Result<Vec<PinAssignment>, ConstraintError> {
    let mut inputs = catalog.pins(Direction::Input).iter();
    let mut outputs = catalog.pins(Direction::Output).iter();
    let mut assignments = Vec::new();

    for port in ports.iter().filter(|p| p.name != CLOCK_PORT) {
        let pool = match port.direction {
            Direction::Input => &mut inputs,
            Direction::Output => &mut outputs,
        };
        for bit in port.bit_range() {
            let instance = port.instance_name(bit);
            let pin = pool.next().ok_or_else(|| ConstraintError::PinExhaustion {
                direction: port.direction,
                port: port.name.clone(),
                instance: instance.clone(),
            })?;
            assignments.push(PinAssignment {
                instance,
                pin: pin.clone(),
                direction: port.direction,
            });
        }
    }

    Ok(assignments)
}

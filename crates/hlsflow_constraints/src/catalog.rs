//! Device pin catalogs: the ordered input- and output-capable pins of a device.
//!
//! Built-in catalogs are a static table keyed by device identifier, in the
//! same spirit as the architecture models keyed by family. Projects may add
//! or override entries through configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::port::Direction;

/// Device identifier used when a project does not name one.
pub const DEFAULT_DEVICE: &str = "fdp3p7";

/// Input-capable pins of the FDP3P7 development board, in allocation order.
const FDP3P7_INPUTS: &[&str] = &[
    "P151", "P148", "P150", "P152", "P160", "P161", "P162", "P163", "P164", "P165", "P166", "P169",
    "P173", "P174", "P175", "P176", "P178", "P179", "P180", "P181", "P187", "P188", "P189", "P191",
];

/// Output-capable pins of the FDP3P7 development board, in allocation order.
const FDP3P7_OUTPUTS: &[&str] = &[
    "P7", "P6", "P5", "P4", "P9", "P8", "P16", "P15", "P11", "P10", "P20", "P18", "P17", "P22",
    "P21", "P23", "P24", "P27", "P29", "P30", "P31", "P33", "P34", "P35",
];

/// The built-in catalog table: `(device, inputs, outputs)`.
const BUILTIN: &[(&str, &[&str], &[&str])] = &[(DEFAULT_DEVICE, FDP3P7_INPUTS, FDP3P7_OUTPUTS)];

/// Structural problems with a pin catalog.
///
/// Only the shape of the catalog is checked; whether a pin is electrically
/// suitable is the board designer's concern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The same pin appears twice in one sequence.
    #[error("pin '{pin}' is listed twice in the {direction} pins of device '{device}'")]
    DuplicatePin {
        /// The device identifier.
        device: String,
        /// The sequence containing the duplicate.
        direction: Direction,
        /// The duplicated pin.
        pin: String,
    },

    /// A pin appears in both the input and the output sequence.
    #[error("pin '{pin}' of device '{device}' is listed as both input and output")]
    SharedPin {
        /// The device identifier.
        device: String,
        /// The shared pin.
        pin: String,
    },
}

/// The physical I/O locations of a device, partitioned by direction.
///
/// Deserialization goes through [`PinCatalog::new`], so a decoded catalog is
/// checked the same way as one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct PinCatalog {
    device: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

/// Unchecked wire form of a [`PinCatalog`].
#[derive(Deserialize)]
struct RawCatalog {
    device: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl TryFrom<RawCatalog> for PinCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        PinCatalog::new(raw.device, raw.inputs, raw.outputs)
    }
}

impl PinCatalog {
    /// Creates a catalog, checking that each sequence has unique pins and that
    /// the two sequences are disjoint.
    pub fn new(
        device: impl Into<String>,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let device = device.into();

        let mut seen_inputs = HashSet::new();
        for pin in &inputs {
            if !seen_inputs.insert(pin.as_str()) {
                return Err(CatalogError::DuplicatePin {
                    device,
                    direction: Direction::Input,
                    pin: pin.clone(),
                });
            }
        }

        let mut seen_outputs = HashSet::new();
        for pin in &outputs {
            if !seen_outputs.insert(pin.as_str()) {
                return Err(CatalogError::DuplicatePin {
                    device,
                    direction: Direction::Output,
                    pin: pin.clone(),
                });
            }
            if seen_inputs.contains(pin.as_str()) {
                return Err(CatalogError::SharedPin {
                    device,
                    pin: pin.clone(),
                });
            }
        }

        Ok(Self {
            device,
            inputs,
            outputs,
        })
    }

    /// Returns the device identifier.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the ordered pins usable for the given direction.
    pub fn pins(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }
}

/// Returns the built-in catalog for `device`, if one exists.
///
/// Device identifiers are matched case-insensitively.
pub fn builtin_catalog(device: &str) -> Option<PinCatalog> {
    BUILTIN
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(device))
        .map(|(name, inputs, outputs)| PinCatalog {
            device: (*name).to_string(),
            inputs: inputs.iter().map(|p| (*p).to_string()).collect(),
            outputs: outputs.iter().map(|p| (*p).to_string()).collect(),
        })
}

/// Returns the identifiers of all built-in catalogs.
pub fn builtin_devices() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|(name, _, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn builtin_default_is_well_formed() {
        let catalog = builtin_catalog(DEFAULT_DEVICE).unwrap();
        let rebuilt = PinCatalog::new(
            catalog.device(),
            catalog.pins(Direction::Input).to_vec(),
            catalog.pins(Direction::Output).to_vec(),
        );
        assert_eq!(rebuilt, Ok(catalog));
    }

    #[test]
    fn builtin_lookup_ignores_case() {
        let catalog = builtin_catalog("FDP3P7").unwrap();
        assert_eq!(catalog.device(), "fdp3p7");
        assert_eq!(catalog.pins(Direction::Input)[0], "P151");
        assert_eq!(catalog.pins(Direction::Output)[0], "P7");
    }

    #[test]
    fn unknown_builtin() {
        assert!(builtin_catalog("xc7a35t").is_none());
        assert!(builtin_devices().any(|d| d == DEFAULT_DEVICE));
    }

    // -- deserialization --

    #[test]
    fn deserialized_duplicate_is_rejected() {
        let json = r#"{"device":"d","inputs":["P1","P1"],"outputs":["P2"]}"#;
        let err = serde_json::from_str::<PinCatalog>(json).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn deserialized_shared_pin_is_rejected() {
        let json = r#"{"device":"d","inputs":["P1"],"outputs":["P1"]}"#;
        let err = serde_json::from_str::<PinCatalog>(json).unwrap_err();
        assert!(err.to_string().contains("both input and output"));
    }

    #[test]
    fn serialized_catalog_round_trips() {
        let catalog = builtin_catalog(DEFAULT_DEVICE).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(serde_json::from_str::<PinCatalog>(&json).unwrap(), catalog);
    }

    // -- construction --

    #[test]
    fn duplicate_input_rejected() {
        let err = PinCatalog::new("b", pins(&["P1", "P1"]), pins(&["P2"])).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicatePin {
                direction: Direction::Input,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_output_rejected() {
        let err = PinCatalog::new("b", pins(&["P1"]), pins(&["P2", "P3", "P2"])).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicatePin {
                direction: Direction::Output,
                ..
            }
        ));
    }

    #[test]
    fn shared_pin_rejected() {
        let err = PinCatalog::new("b", pins(&["P1", "P2"]), pins(&["P2"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pin 'P2' of device 'b' is listed as both input and output"
        );
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = PinCatalog::new("empty", Vec::new(), Vec::new()).unwrap();
        assert!(catalog.pins(Direction::Input).is_empty());
    }
}

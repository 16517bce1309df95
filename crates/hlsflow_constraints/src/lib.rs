//! Automatic physical-constraint generation for generated hardware descriptions.
//!
//! This crate locates the top module in a generated Verilog netlist, assigns
//! each of its ports to a physical device pin drawn from a [`PinCatalog`], and
//! persists the result as a constraint file consumed by placement and routing.
//!
//! The pipeline is strictly sequential: read, extract, allocate, write. Any
//! failure before the write leaves the destination untouched.
//!
//! # Usage
//!
//! ```
//! use hlsflow_constraints::{assign_pins, extract_top_module, ExtractMode, PinCatalog};
//!
//! let hdl = "module _Z3addii(a, b);\n  input [1:0] a;\n  output b;\nendmodule\n";
//! let module = extract_top_module(hdl, "add", ExtractMode::Permissive).unwrap();
//! let catalog = PinCatalog::new("demo", vec!["P1".into(), "P2".into()], vec!["P9".into()]).unwrap();
//! let assignments = assign_pins(&module.ports, &catalog).unwrap();
//! assert_eq!(assignments.len(), 3);
//! assert_eq!(assignments[1].instance, "a[1]");
//! ```

#![warn(missing_docs)]

pub mod allocate;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod generate;
pub mod port;
pub mod writer;

pub use allocate::{assign_pins, PinAssignment, CLOCK_PORT};
pub use catalog::{builtin_catalog, builtin_devices, CatalogError, PinCatalog, DEFAULT_DEVICE};
pub use error::ConstraintError;
pub use extract::{extract_top_module, ExtractMode};
pub use generate::{generate_constraints, ConstraintRequest};
pub use port::{Direction, Module, Port};
pub use writer::{render_constraints, synthesize};

#![forbid(unsafe_code)]
#![deny(
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    missing_docs
)]

//! Quantum teleportation on a small statevector simulator.
//!
//! A single qubit state `a|0> + b|1>` is prepared on a message qubit, a Bell pair is shared
//! between a sender and a receiver, and two classical bits carried from the sender drive the
//! receiver's X and Z corrections. Running the circuit many times and reading the receiver's
//! qubit gives a histogram which is scored against the state that was sent.
//!
//! # Example
//! ```
//! use qteleport::prelude::*;
//! use qteleport::teleportation::run_teleportation;
//! use std::num::NonZeroUsize;
//!
//! # fn main() -> CircuitResult<()> {
//! // |1> with an arbitrary phase.
//! let psi = QubitState::from_angles(std::f64::consts::PI, 0.8);
//! let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(42));
//! let report = run_teleportation(&psi, &sim, NonZeroUsize::new(256).unwrap())?;
//!
//! // The receiver reads 1 on every shot.
//! assert_eq!(report.result_counts(), [0, 256]);
//! assert!((report.score.success_rate - 1.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! # Building circuits
//! The same builder works for other small protocols.
//! ```
//! use qteleport::prelude::*;
//! use std::num::NonZeroUsize;
//!
//! # fn main() -> CircuitResult<()> {
//! let mut b = CircuitBuilder::<f64>::new(NonZeroUsize::new(2).unwrap());
//! let c = b.classical_register("c", NonZeroUsize::new(2).unwrap())?;
//! b.h(0)?.cx(0, 1)?;
//! b.measure_bit(0, &c, 0)?.measure_bit(1, &c, 1)?;
//!
//! let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(1));
//! let counts = sim.execute(&b.build(), NonZeroUsize::new(100).unwrap())?;
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! # Ok(())
//! # }
//! ```

/// Circuit description and the builder used to assemble it.
pub mod circuit;
/// Validated run parameters.
pub mod config;
/// Histograms of classical outcomes.
pub mod counts;
/// Text circuit diagrams.
pub mod drawing;
/// Circuit error types.
pub mod errors;
/// Text bar charts of outcome counts.
pub mod histogram;
/// OpenQASM 2.0 export.
pub mod qasm;
/// Sequential or parallel iteration helpers.
pub mod rayon_helper;
/// Scoring of teleportation outcomes.
pub mod scoring;
/// Simulation backends.
pub mod simulator;
/// Single qubit states.
pub mod state;
/// Lower-level statevector operations.
pub mod state_ops;
/// The teleportation protocol.
pub mod teleportation;
/// Reusable types.
pub mod types;
/// Utility functions for bit and index manipulation
pub mod utils;

pub use num_complex::Complex;
pub use rand;
pub use types::*;

/// Commonly used types and traits.
/// ```
/// use qteleport::prelude::*;
/// ```
pub mod prelude {
    pub use super::*;
    pub use crate::circuit::{Circuit, CircuitBuilder, ClassicalRegister, Gate, Operation};
    pub use crate::counts::OutcomeCounts;
    pub use crate::errors::*;
    pub use crate::qasm::ToOpenQasm;
    pub use crate::simulator::{CircuitSimulator, SimulatorConfig, StatevectorSimulator};
    pub use crate::state::QubitState;
}

//! The teleportation protocol: circuit construction and the prepare, run, score pipeline.
//!
//! Qubit 0 carries the message, qubit 1 is the sender's half of the Bell pair and qubit 2 the
//! receiver's. Classical registers are allocated `crz`, `crx`, `cr_result`, so outcome strings
//! read `cr_result crx crz` from left to right.

use std::num::NonZeroUsize;

use tracing::{debug, info};

use crate::circuit::{Circuit, CircuitBuilder, ClassicalRegister, Gate};
use crate::counts::OutcomeCounts;
use crate::errors::CircuitResult;
use crate::scoring::{self, Score};
use crate::simulator::CircuitSimulator;
use crate::state::QubitState;
use crate::types::Precision;
use crate::Complex;

/// The qubit holding the state to send.
pub const MESSAGE_QUBIT: usize = 0;
/// The sender's half of the Bell pair.
pub const SENDER_QUBIT: usize = 1;
/// The receiver's half of the Bell pair, which ends up holding the message.
pub const RECEIVER_QUBIT: usize = 2;

/// Qubits used by the protocol: message, sender and receiver.
pub const NUM_QUBITS: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(n) => n,
    None => panic!("the protocol needs three qubits"),
};

const ONE_BIT: NonZeroUsize = NonZeroUsize::MIN;

/// Shot count used when none is given.
pub const DEFAULT_SHOTS: usize = 1024;

/// The teleportation circuit together with handles to its classical registers.
#[derive(Debug, Clone)]
pub struct TeleportationCircuit<P: Precision> {
    circuit: Circuit<P>,
    crz: ClassicalRegister,
    crx: ClassicalRegister,
    cr_result: ClassicalRegister,
}

impl<P: Precision> TeleportationCircuit<P> {
    /// The circuit itself.
    pub fn circuit(&self) -> &Circuit<P> {
        &self.circuit
    }

    /// Holds the measurement of the message qubit; drives the Z correction.
    pub fn crz(&self) -> &ClassicalRegister {
        &self.crz
    }

    /// Holds the measurement of the sender qubit; drives the X correction.
    pub fn crx(&self) -> &ClassicalRegister {
        &self.crx
    }

    /// Holds the receiver's final reading.
    pub fn cr_result(&self) -> &ClassicalRegister {
        &self.cr_result
    }
}

/// Build the teleportation circuit for `psi`.
///
/// # Example
/// ```
/// use qteleport::prelude::*;
/// use qteleport::teleportation::teleportation_circuit;
///
/// # fn main() -> CircuitResult<()> {
/// let psi = QubitState::from_angles(1.0f64, 0.25);
/// let tc = teleportation_circuit(&psi)?;
/// assert_eq!(tc.circuit().num_qubits(), 3);
/// assert_eq!(tc.circuit().num_clbits(), 3);
/// assert_eq!(tc.cr_result().offset(), 2);
/// # Ok(())
/// # }
/// ```
pub fn teleportation_circuit<P: Precision>(
    psi: &QubitState<P>,
) -> CircuitResult<TeleportationCircuit<P>> {
    let mut b = CircuitBuilder::new(NUM_QUBITS);
    let crz = b.classical_register("crz", ONE_BIT)?;
    let crx = b.classical_register("crx", ONE_BIT)?;
    let cr_result = b.classical_register("cr_result", ONE_BIT)?;

    b.initialize(MESSAGE_QUBIT, *psi)?;

    // Bell pair shared by sender and receiver.
    b.h(SENDER_QUBIT)?.cx(SENDER_QUBIT, RECEIVER_QUBIT)?;

    // Bell basis measurement of message and sender.
    b.cx(MESSAGE_QUBIT, SENDER_QUBIT)?.h(MESSAGE_QUBIT)?;
    b.measure(MESSAGE_QUBIT, &crz)?.measure(SENDER_QUBIT, &crx)?;

    // Receiver's corrections, driven only by the two classical bits.
    b.c_if(Gate::X, RECEIVER_QUBIT, &crx, 1)?
        .c_if(Gate::Z, RECEIVER_QUBIT, &crz, 1)?;

    b.measure(RECEIVER_QUBIT, &cr_result)?;

    Ok(TeleportationCircuit {
        circuit: b.build(),
        crz,
        crx,
        cr_result,
    })
}

/// Build the teleportation circuit from raw amplitudes, rejecting anything that is not a
/// normalized single-qubit state.
pub fn teleportation_circuit_from_amplitudes<P: Precision>(
    amplitudes: &[Complex<P>],
) -> CircuitResult<TeleportationCircuit<P>> {
    let psi = QubitState::from_amplitudes(amplitudes)?;
    teleportation_circuit(&psi)
}

/// Everything produced by one run of the protocol.
#[derive(Debug, Clone)]
pub struct TeleportationReport<P: Precision> {
    /// The state that was sent.
    pub psi: QubitState<P>,
    /// The circuit that was run.
    pub circuit: TeleportationCircuit<P>,
    /// Raw outcome histogram.
    pub counts: OutcomeCounts,
    /// Number of shots requested.
    pub shots: NonZeroUsize,
    /// Success metrics.
    pub score: Score<P>,
}

impl<P: Precision> TeleportationReport<P> {
    /// Counts of the receiver's final reading, indexed by bit value.
    pub fn result_counts(&self) -> [usize; 2] {
        let m = self.counts.marginal(self.circuit.cr_result());
        [
            m.get(&0).copied().unwrap_or(0),
            m.get(&1).copied().unwrap_or(0),
        ]
    }
}

/// Teleport `psi` on `simulator` for `shots` trials and score the result.
pub fn run_teleportation<P, S>(
    psi: &QubitState<P>,
    simulator: &S,
    shots: NonZeroUsize,
) -> CircuitResult<TeleportationReport<P>>
where
    P: Precision,
    S: CircuitSimulator<P>,
{
    let (p0, p1) = psi.probabilities();
    debug!(p0 = %p0, p1 = %p1, "prepared message state");

    let circuit = teleportation_circuit(psi)?;
    debug!(
        operations = circuit.circuit().operations().len(),
        "built teleportation circuit"
    );

    let counts = simulator.execute(circuit.circuit(), shots)?;
    let score = scoring::score(&counts, psi, circuit.cr_result(), shots);
    info!(
        shots = shots.get(),
        outcomes = counts.len(),
        success_rate = %score.success_rate,
        tvd = %score.total_variation_distance,
        "teleportation finished"
    );

    Ok(TeleportationReport {
        psi: *psi,
        circuit,
        counts,
        shots,
        score,
    })
}

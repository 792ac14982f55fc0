#[cfg(feature = "parallel")]
use rayon::prelude::*;

use std::mem;
use std::num::NonZeroUsize;

use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::circuit::{Circuit, Gate, Operation};
use crate::counts::OutcomeCounts;
use crate::errors::{CircuitError, CircuitResult};
use crate::into_iter;
use crate::state_ops::matrix_ops::{
    apply_op, gate_matrix, make_control_op, make_matrix_op, MatrixOp,
};
use crate::state_ops::measurement_ops::measure;
use crate::types::Precision;
use crate::utils::{extract_bits, set_bit, WORD_BITS};
use crate::Complex;

/// Largest register the statevector backend will allocate, `2^n` amplitudes.
pub const MAX_QUBITS: usize = 24;

/// Anything which can run a [`Circuit`] for a number of shots and report the classical outcomes.
pub trait CircuitSimulator<P: Precision> {
    /// Backend specific, ready to run form of a circuit.
    type Handle;

    /// Translate `circuit` into something the backend can run.
    fn build(&self, circuit: &Circuit<P>) -> CircuitResult<Self::Handle>;

    /// Run a built circuit `shots` times.
    fn run(&self, handle: &Self::Handle, shots: NonZeroUsize) -> CircuitResult<OutcomeCounts>;

    /// Build then run.
    fn execute(&self, circuit: &Circuit<P>, shots: NonZeroUsize) -> CircuitResult<OutcomeCounts> {
        let handle = self.build(circuit)?;
        self.run(&handle, shots)
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Deterministic seed. `None` uses OS entropy.
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    /// Config with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

/// A dense statevector backend.
///
/// Every shot starts from `|0..0>` and samples measurements with its own rng, seeded from a
/// master rng, so a fixed [`SimulatorConfig::seed`] reproduces the same counts whether or not
/// shots run in parallel.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatevectorSimulator {
    config: SimulatorConfig,
}

/// The final state and classical bits of one shot.
#[derive(Debug, Clone)]
pub struct ShotResult<P: Precision> {
    /// Classical bit field, bit `i` is classical bit `i`.
    pub clbits: usize,
    /// Final state vector, qubit `k` is bit `k` of the index.
    pub state: Vec<Complex<P>>,
}

impl StatevectorSimulator {
    /// Make a simulator with the given configuration.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run a single shot and keep the final state around for inspection.
    pub fn run_single<P: Precision>(&self, handle: &CompiledCircuit<P>) -> ShotResult<P> {
        let mut rng = self.master_rng();
        let (clbits, state) = handle.run_shot(&mut rng);
        ShotResult { clbits, state }
    }

    fn master_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl<P: Precision> CircuitSimulator<P> for StatevectorSimulator {
    type Handle = CompiledCircuit<P>;

    fn build(&self, circuit: &Circuit<P>) -> CircuitResult<Self::Handle> {
        CompiledCircuit::compile(circuit)
    }

    fn run(&self, handle: &Self::Handle, shots: NonZeroUsize) -> CircuitResult<OutcomeCounts> {
        debug!(
            shots = shots.get(),
            qubits = handle.num_qubits,
            steps = handle.steps.len(),
            seed = ?self.config.seed,
            "running statevector simulation"
        );
        let mut master = self.master_rng();
        let seeds: Vec<u64> = (0..shots.get()).map(|_| master.gen()).collect();
        let outcomes: Vec<usize> = into_iter!(seeds)
            .map(|seed| handle.run_shot(&mut StdRng::seed_from_u64(seed)).0)
            .collect();

        let mut counts = OutcomeCounts::new(handle.num_clbits);
        outcomes.into_iter().for_each(|bits| counts.record(bits));
        debug!(outcomes = counts.len(), "simulation finished");
        Ok(counts)
    }
}

#[derive(Debug, Clone)]
enum Step<P: Precision> {
    Apply(MatrixOp<P>),
    Measure {
        qubit: usize,
        clbit: usize,
    },
    Conditional {
        op: MatrixOp<P>,
        offset: usize,
        size: usize,
        value: usize,
    },
}

/// A circuit lowered to state vector operations, the [`StatevectorSimulator`] handle.
#[derive(Debug, Clone)]
pub struct CompiledCircuit<P: Precision> {
    num_qubits: usize,
    num_clbits: usize,
    steps: Vec<Step<P>>,
}

impl<P: Precision> CompiledCircuit<P> {
    fn compile(circuit: &Circuit<P>) -> CircuitResult<Self> {
        let n = circuit.num_qubits();
        if n > MAX_QUBITS {
            return Err(CircuitError::Unsupported(format!(
                "{} qubits exceeds the statevector limit of {}",
                n, MAX_QUBITS
            )));
        }
        let num_clbits = circuit.num_clbits();
        if num_clbits > WORD_BITS {
            return Err(CircuitError::Unsupported(format!(
                "{} classical bits do not fit in a machine word",
                num_clbits
            )));
        }

        let mut touched = vec![false; n];
        let steps = circuit
            .operations()
            .iter()
            .map(|op| {
                let step = match op {
                    Operation::Initialize { qubit, state } => {
                        if touched.get(*qubit).copied().unwrap_or(false) {
                            return Err(CircuitError::Unsupported(format!(
                                "initializing qubit {} after it was used",
                                qubit
                            )));
                        }
                        Step::Apply(make_matrix_op(n, *qubit, state.preparation_matrix())?)
                    }
                    Operation::Gate { gate, qubit } => {
                        Step::Apply(make_matrix_op(n, *qubit, gate_matrix(*gate))?)
                    }
                    Operation::Cnot { control, target } => {
                        Step::Apply(make_control_op(n, *control, *target, gate_matrix(Gate::X))?)
                    }
                    Operation::Measure { qubit, clbit } => {
                        if *qubit >= n || *clbit >= num_clbits {
                            return Err(CircuitError::circuit(format!(
                                "measurement of qubit {} into bit {} is out of range",
                                qubit, clbit
                            )));
                        }
                        Step::Measure {
                            qubit: *qubit,
                            clbit: *clbit,
                        }
                    }
                    Operation::Conditional(c) => {
                        let register = circuit.registers().get(c.register).ok_or_else(|| {
                            CircuitError::circuit(format!("no classical register {}", c.register))
                        })?;
                        Step::Conditional {
                            op: make_matrix_op(n, c.target, gate_matrix(c.gate))?,
                            offset: register.offset(),
                            size: register.size(),
                            value: c.value,
                        }
                    }
                };
                op.qubits().into_iter().for_each(|q| {
                    if let Some(t) = touched.get_mut(q) {
                        *t = true;
                    }
                });
                Ok(step)
            })
            .collect::<CircuitResult<Vec<_>>>()?;

        trace!(steps = steps.len(), "compiled circuit");
        Ok(Self {
            num_qubits: n,
            num_clbits,
            steps,
        })
    }

    /// Number of qubits in the state vector.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of classical bits written.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    fn run_shot<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, Vec<Complex<P>>) {
        let mut state = vec![Complex::zero(); 1 << self.num_qubits];
        state[0] = Complex::one();
        let mut arena = state.clone();
        let mut clbits = 0usize;

        for step in &self.steps {
            match step {
                Step::Apply(op) => {
                    apply_op(op, &state, &mut arena);
                    mem::swap(&mut state, &mut arena);
                }
                Step::Measure { qubit, clbit } => {
                    let (m, _) = measure(*qubit, &state, &mut arena, rng);
                    mem::swap(&mut state, &mut arena);
                    clbits = set_bit(clbits, *clbit, m);
                }
                Step::Conditional {
                    op,
                    offset,
                    size,
                    value,
                } => {
                    if extract_bits(clbits, *offset, *size) == *value {
                        apply_op(op, &state, &mut arena);
                        mem::swap(&mut state, &mut arena);
                    }
                }
            }
        }
        (clbits, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::state::QubitState;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn bell_circuit() -> Circuit<f64> {
        let mut b = CircuitBuilder::new(nz(2));
        let c0 = b.classical_register("c0", nz(1)).unwrap();
        let c1 = b.classical_register("c1", nz(1)).unwrap();
        b.h(0).unwrap();
        b.cx(0, 1).unwrap();
        b.measure(0, &c0).unwrap();
        b.measure(1, &c1).unwrap();
        b.build()
    }

    #[test]
    fn test_bell_pair_is_correlated() -> CircuitResult<()> {
        let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(11));
        let counts = sim.execute(&bell_circuit(), nz(2000))?;
        assert_eq!(counts.shots(), 2000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        let zeros = counts.get("00") as f64 / 2000.0;
        assert!((zeros - 0.5).abs() < 0.06, "{}", counts);
        Ok(())
    }

    #[test]
    fn test_seed_reproduces_counts() -> CircuitResult<()> {
        let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(1234));
        let circuit = bell_circuit();
        let a = sim.execute(&circuit, nz(512))?;
        let b = sim.execute(&circuit, nz(512))?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_conditional_gate_fires_on_value() -> CircuitResult<()> {
        let mut b = CircuitBuilder::<f64>::new(nz(2));
        let flag = b.classical_register("flag", nz(1))?;
        let out = b.classical_register("out", nz(1))?;
        b.x(0)?.measure(0, &flag)?;
        b.c_if(Gate::X, 1, &flag, 1)?;
        b.measure(1, &out)?;
        let counts = StatevectorSimulator::default().execute(&b.build(), nz(16))?;
        assert_eq!(counts.get("11"), 16);
        Ok(())
    }

    #[test]
    fn test_conditional_gate_skipped_otherwise() -> CircuitResult<()> {
        let mut b = CircuitBuilder::<f64>::new(nz(2));
        let flag = b.classical_register("flag", nz(1))?;
        let out = b.classical_register("out", nz(1))?;
        b.measure(0, &flag)?;
        b.c_if(Gate::X, 1, &flag, 1)?;
        b.measure(1, &out)?;
        let counts = StatevectorSimulator::default().execute(&b.build(), nz(16))?;
        assert_eq!(counts.get("00"), 16);
        Ok(())
    }

    #[test]
    fn test_initialize_prepares_state() -> CircuitResult<()> {
        let mut b = CircuitBuilder::<f64>::new(nz(1));
        let psi = QubitState::from_angles(1.2, 0.4);
        b.initialize(0, psi)?;
        let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(5));
        let handle = sim.build(&b.build())?;
        let shot = sim.run_single(&handle);
        assert!((shot.state[0] - psi.amplitudes()[0]).norm() < 1e-12);
        assert!((shot.state[1] - psi.amplitudes()[1]).norm() < 1e-12);
        assert_eq!(shot.clbits, 0);
        Ok(())
    }

    #[test]
    fn test_too_many_qubits_unsupported() {
        let b = CircuitBuilder::<f64>::new(nz(MAX_QUBITS + 1));
        let err = StatevectorSimulator::default().build(&b.build()).unwrap_err();
        assert!(matches!(err, CircuitError::Unsupported(_)));
    }
}

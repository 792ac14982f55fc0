use std::fmt;
use std::num::NonZeroUsize;

use crate::errors::{CircuitError, CircuitResult};
use crate::state::QubitState;
use crate::types::Precision;
use crate::utils::{extract_bits, low_mask, WORD_BITS};

/// Single qubit gates the circuit model understands.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Gate {
    /// A pauli X gate.
    X,
    /// A pauli Y gate.
    Y,
    /// A pauli Z gate.
    Z,
    /// A hadamard gate.
    H,
    /// A phase gate by pi/2.
    S,
}

impl Gate {
    /// Lowercase mnemonic, as used by OpenQASM.
    pub fn name(self) -> &'static str {
        match self {
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().to_uppercase())
    }
}

/// A named block of classical bits inside a circuit.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ClassicalRegister {
    name: String,
    offset: usize,
    size: usize,
}

impl ClassicalRegister {
    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the first classical bit of the register.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bits.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest value the register can hold.
    pub fn max_value(&self) -> usize {
        low_mask(self.size)
    }

    /// Read this register out of the full classical bit field.
    ///
    /// # Example
    /// ```
    /// use qteleport::circuit::CircuitBuilder;
    /// use std::num::NonZeroUsize;
    ///
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let mut b = CircuitBuilder::<f64>::new(one);
    /// let _low = b.classical_register("low", one).unwrap();
    /// let high = b.classical_register("high", NonZeroUsize::new(2).unwrap()).unwrap();
    /// assert_eq!(high.read(0b110), 0b11);
    /// ```
    pub fn read(&self, bits: usize) -> usize {
        extract_bits(bits, self.offset, self.size)
    }
}

/// A gate which only fires when a classical register holds `value`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ConditionalGate {
    /// Qubit the gate acts on.
    pub target: usize,
    /// Gate to apply.
    pub gate: Gate,
    /// Index of the register in [`Circuit::registers`].
    pub register: usize,
    /// Value the register must hold.
    pub value: usize,
}

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<P: Precision> {
    /// Prepare a fresh qubit in `state`.
    Initialize {
        /// Qubit to prepare.
        qubit: usize,
        /// State to prepare it in.
        state: QubitState<P>,
    },
    /// An unconditional single qubit gate.
    Gate {
        /// Gate to apply.
        gate: Gate,
        /// Qubit it acts on.
        qubit: usize,
    },
    /// A controlled pauli X.
    Cnot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Collapse a qubit and store the reading in a classical bit.
    Measure {
        /// Qubit to measure.
        qubit: usize,
        /// Absolute index of the classical bit written.
        clbit: usize,
    },
    /// A classically conditioned gate.
    Conditional(ConditionalGate),
}

impl<P: Precision> Operation<P> {
    /// Qubits touched by the operation.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Operation::Initialize { qubit, .. }
            | Operation::Gate { qubit, .. }
            | Operation::Measure { qubit, .. } => vec![*qubit],
            Operation::Cnot { control, target } => vec![*control, *target],
            Operation::Conditional(c) => vec![c.target],
        }
    }
}

/// An immutable circuit description, produced by [`CircuitBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit<P: Precision> {
    num_qubits: usize,
    registers: Vec<ClassicalRegister>,
    operations: Vec<Operation<P>>,
}

impl<P: Precision> Circuit<P> {
    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total number of classical bits across all registers.
    pub fn num_clbits(&self) -> usize {
        self.registers.iter().map(ClassicalRegister::size).sum()
    }

    /// Classical registers in allocation order.
    pub fn registers(&self) -> &[ClassicalRegister] {
        &self.registers
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&ClassicalRegister> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Register owning the classical bit `clbit`, and the bit's position within it.
    pub fn register_of(&self, clbit: usize) -> Option<(&ClassicalRegister, usize)> {
        self.registers
            .iter()
            .find(|r| clbit >= r.offset && clbit < r.offset + r.size)
            .map(|r| (r, clbit - r.offset))
    }

    /// Operations in execution order.
    pub fn operations(&self) -> &[Operation<P>] {
        &self.operations
    }
}

/// Builds a [`Circuit`] one operation at a time, checking indices as it goes.
///
/// # Example
/// ```
/// use qteleport::prelude::*;
/// use std::num::NonZeroUsize;
///
/// # fn main() -> CircuitResult<()> {
/// let one = NonZeroUsize::new(1).unwrap();
/// let mut b = CircuitBuilder::<f64>::new(NonZeroUsize::new(2).unwrap());
/// let c = b.classical_register("c", one)?;
/// b.h(0)?.cx(0, 1)?.measure(1, &c)?;
/// let circuit = b.build();
/// assert_eq!(circuit.operations().len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CircuitBuilder<P: Precision> {
    num_qubits: usize,
    registers: Vec<ClassicalRegister>,
    operations: Vec<Operation<P>>,
    touched: Vec<bool>,
}

impl<P: Precision> CircuitBuilder<P> {
    /// Start a circuit on `n` qubits, all in `|0>`.
    pub fn new(n: NonZeroUsize) -> Self {
        let n = n.get();
        Self {
            num_qubits: n,
            registers: vec![],
            operations: vec![],
            touched: vec![false; n],
        }
    }

    /// Add a classical register. Bits are allocated after those of earlier registers.
    pub fn classical_register<S>(
        &mut self,
        name: S,
        size: NonZeroUsize,
    ) -> CircuitResult<ClassicalRegister>
    where
        S: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(CircuitError::circuit("register name must not be empty"));
        }
        if self.registers.iter().any(|r| r.name == name) {
            return Err(CircuitError::circuit(format!(
                "register {:?} already exists",
                name
            )));
        }
        let offset: usize = self.registers.iter().map(ClassicalRegister::size).sum();
        if size.get() > WORD_BITS - offset {
            return Err(CircuitError::circuit(format!(
                "register {:?} needs {} bits but only {} of {} classical bits are free",
                name,
                size,
                WORD_BITS - offset,
                WORD_BITS
            )));
        }
        let r = ClassicalRegister {
            name,
            offset,
            size: size.get(),
        };
        self.registers.push(r.clone());
        Ok(r)
    }

    /// Prepare `qubit` in `state`. Must come before any other operation on that qubit.
    pub fn initialize(&mut self, qubit: usize, state: QubitState<P>) -> CircuitResult<&mut Self> {
        self.check_qubit(qubit)?;
        if self.touched[qubit] {
            return Err(CircuitError::circuit(format!(
                "qubit {} must be initialized before any other operation on it",
                qubit
            )));
        }
        self.push(Operation::Initialize { qubit, state })
    }

    /// Apply `gate` to `qubit`.
    pub fn gate(&mut self, gate: Gate, qubit: usize) -> CircuitResult<&mut Self> {
        self.check_qubit(qubit)?;
        self.push(Operation::Gate { gate, qubit })
    }

    /// Apply a hadamard.
    pub fn h(&mut self, qubit: usize) -> CircuitResult<&mut Self> {
        self.gate(Gate::H, qubit)
    }

    /// Apply a pauli X.
    pub fn x(&mut self, qubit: usize) -> CircuitResult<&mut Self> {
        self.gate(Gate::X, qubit)
    }

    /// Apply a pauli Y.
    pub fn y(&mut self, qubit: usize) -> CircuitResult<&mut Self> {
        self.gate(Gate::Y, qubit)
    }

    /// Apply a pauli Z.
    pub fn z(&mut self, qubit: usize) -> CircuitResult<&mut Self> {
        self.gate(Gate::Z, qubit)
    }

    /// Apply a phase gate.
    pub fn s(&mut self, qubit: usize) -> CircuitResult<&mut Self> {
        self.gate(Gate::S, qubit)
    }

    /// Apply a controlled not.
    pub fn cx(&mut self, control: usize, target: usize) -> CircuitResult<&mut Self> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(CircuitError::circuit(format!(
                "cx needs two distinct qubits, got {} twice",
                control
            )));
        }
        self.push(Operation::Cnot { control, target })
    }

    /// Measure `qubit` into the lowest bit of `register`.
    pub fn measure(
        &mut self,
        qubit: usize,
        register: &ClassicalRegister,
    ) -> CircuitResult<&mut Self> {
        self.measure_bit(qubit, register, 0)
    }

    /// Measure `qubit` into bit `bit` of `register`.
    pub fn measure_bit(
        &mut self,
        qubit: usize,
        register: &ClassicalRegister,
        bit: usize,
    ) -> CircuitResult<&mut Self> {
        self.check_qubit(qubit)?;
        let r = &self.registers[self.register_index(register)?];
        if bit >= r.size {
            return Err(CircuitError::circuit(format!(
                "bit {} out of range for {}-bit register {:?}",
                bit, r.size, r.name
            )));
        }
        let clbit = r.offset + bit;
        self.push(Operation::Measure { qubit, clbit })
    }

    /// Apply `gate` to `target` only when `register` holds `value`.
    pub fn c_if(
        &mut self,
        gate: Gate,
        target: usize,
        register: &ClassicalRegister,
        value: usize,
    ) -> CircuitResult<&mut Self> {
        self.check_qubit(target)?;
        let index = self.register_index(register)?;
        let r = &self.registers[index];
        if value > r.max_value() {
            return Err(CircuitError::circuit(format!(
                "condition value {} does not fit in {}-bit register {:?}",
                value, r.size, r.name
            )));
        }
        self.push(Operation::Conditional(ConditionalGate {
            target,
            gate,
            register: index,
            value,
        }))
    }

    /// Finish the circuit.
    pub fn build(self) -> Circuit<P> {
        Circuit {
            num_qubits: self.num_qubits,
            registers: self.registers,
            operations: self.operations,
        }
    }

    fn push(&mut self, op: Operation<P>) -> CircuitResult<&mut Self> {
        op.qubits().into_iter().for_each(|q| self.touched[q] = true);
        self.operations.push(op);
        Ok(self)
    }

    fn check_qubit(&self, qubit: usize) -> CircuitResult<()> {
        if qubit < self.num_qubits {
            Ok(())
        } else {
            Err(CircuitError::circuit(format!(
                "qubit {} out of range for {} qubits",
                qubit, self.num_qubits
            )))
        }
    }

    fn register_index(&self, register: &ClassicalRegister) -> CircuitResult<usize> {
        self.registers
            .iter()
            .position(|r| r == register)
            .ok_or_else(|| {
                CircuitError::circuit(format!(
                    "register {:?} does not belong to this circuit",
                    register.name
                ))
            })
    }
}

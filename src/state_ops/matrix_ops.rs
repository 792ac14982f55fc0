#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::circuit::Gate;
use crate::errors::{CircuitError, CircuitResult};
use crate::iter_mut;
use crate::types::Precision;
use crate::utils::{get_bit, set_bit};
use crate::Complex;
use num_traits::{One, Zero};

/// A 2x2 unitary stored row major.
pub type Matrix2<P> = [Complex<P>; 4];

/// An operation on the state vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixOp<P: Precision> {
    /// Apply a 2x2 matrix to the qubit at `target`.
    Matrix {
        /// Qubit the matrix acts on.
        target: usize,
        /// Row major matrix entries.
        data: Matrix2<P>,
    },
    /// Apply a 2x2 matrix to `target` on the subspace where `control` is `|1>`.
    Control {
        /// Control qubit.
        control: usize,
        /// Qubit the matrix acts on.
        target: usize,
        /// Row major matrix entries.
        data: Matrix2<P>,
    },
}

/// Make a Matrix MatrixOp on `target` of an `n` qubit state.
pub fn make_matrix_op<P: Precision>(
    n: usize,
    target: usize,
    data: Matrix2<P>,
) -> CircuitResult<MatrixOp<P>> {
    if target >= n {
        Err(CircuitError::circuit(format!(
            "qubit {} out of range for {} qubits",
            target, n
        )))
    } else {
        Ok(MatrixOp::Matrix { target, data })
    }
}

/// Make a Control MatrixOp, `control` and `target` must differ.
pub fn make_control_op<P: Precision>(
    n: usize,
    control: usize,
    target: usize,
    data: Matrix2<P>,
) -> CircuitResult<MatrixOp<P>> {
    if control == target {
        Err(CircuitError::circuit(format!(
            "control and target are both qubit {}",
            control
        )))
    } else if control >= n || target >= n {
        Err(CircuitError::circuit(format!(
            "qubits ({}, {}) out of range for {} qubits",
            control, target, n
        )))
    } else {
        Ok(MatrixOp::Control {
            control,
            target,
            data,
        })
    }
}

/// The matrix of a single qubit gate.
pub fn gate_matrix<P: Precision>(gate: Gate) -> Matrix2<P> {
    let l = Complex::one();
    let o = Complex::zero();
    let i = Complex::i();
    match gate {
        Gate::X => [o, l, l, o],
        Gate::Y => [o, -i, i, o],
        Gate::Z => [l, o, o, -l],
        Gate::H => {
            let nl = Complex::new(P::FRAC_1_SQRT_2(), P::zero());
            [nl, nl, nl, -nl]
        }
        Gate::S => [l, o, o, i],
    }
}

/// Apply `op` to `input`, storing the result in `output`.
///
/// Qubit `k` is bit `k` of the state index.
///
/// # Example
/// ```
/// use qteleport::circuit::Gate;
/// use qteleport::state_ops::matrix_ops::{apply_op, from_reals, gate_matrix, MatrixOp};
///
/// // |00> -> |01> (qubit 0 flipped)
/// let input = from_reals(&[1.0, 0.0, 0.0, 0.0]);
/// let mut output = input.clone();
/// let op = MatrixOp::Matrix { target: 0, data: gate_matrix(Gate::X) };
/// apply_op(&op, &input, &mut output);
/// assert_eq!(output, from_reals(&[0.0, 1.0, 0.0, 0.0]));
/// ```
pub fn apply_op<P: Precision>(op: &MatrixOp<P>, input: &[Complex<P>], output: &mut [Complex<P>]) {
    match op {
        MatrixOp::Matrix { target, data } => {
            iter_mut!(output)
                .enumerate()
                .for_each(|(row, out)| *out = matrix_row(*target, data, row, input));
        }
        MatrixOp::Control {
            control,
            target,
            data,
        } => {
            iter_mut!(output).enumerate().for_each(|(row, out)| {
                *out = if get_bit(row, *control) {
                    matrix_row(*target, data, row, input)
                } else {
                    input[row]
                }
            });
        }
    }
}

#[inline]
fn matrix_row<P: Precision>(
    target: usize,
    data: &Matrix2<P>,
    row: usize,
    input: &[Complex<P>],
) -> Complex<P> {
    let r = usize::from(get_bit(row, target));
    let zero_col = set_bit(row, target, false);
    let one_col = set_bit(row, target, true);
    data[2 * r] * input[zero_col] + data[2 * r + 1] * input[one_col]
}

/// Make a complex state vector from real amplitudes.
pub fn from_reals<P: Precision>(data: &[P]) -> Vec<Complex<P>> {
    data.iter().map(|x| Complex::new(*x, P::zero())).collect()
}

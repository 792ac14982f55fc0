#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::errors::{CircuitError, CircuitResult};
use crate::state::QubitState;
use crate::types::Precision;
use crate::utils::{get_bit, set_bit};
use crate::{iter, iter_mut, Complex};
use num_traits::Zero;
use rand::Rng;

/// Calculate the probability of reading `measured` from the qubit at `index`.
///
/// Qubit `k` is bit `k` of the state index.
///
/// # Examples
/// ```
/// use qteleport::state_ops::matrix_ops::from_reals;
/// use qteleport::state_ops::measurement_ops::measure_prob;
///
/// // Make the state |01>: qubit 0 is always |1> and qubit 1 is always |0>
/// let input = from_reals(&[0.0, 1.0, 0.0, 0.0]);
///
/// assert_eq!(measure_prob(0, false, &input), 0.0);
/// assert_eq!(measure_prob(0, true, &input), 1.0);
/// assert_eq!(measure_prob(1, false, &input), 1.0);
/// ```
pub fn measure_prob<P: Precision>(index: usize, measured: bool, input: &[Complex<P>]) -> P {
    iter!(input)
        .enumerate()
        .filter(|(row, _)| get_bit(*row, index) == measured)
        .map(|(_, amp)| amp.norm_sqr())
        .sum()
}

/// Get probability for each possible reading of the qubit at `index`.
pub fn measure_probs<P: Precision>(index: usize, input: &[Complex<P>]) -> [P; 2] {
    [
        measure_prob(index, false, input),
        measure_prob(index, true, input),
    ]
}

/// Sample a reading of the qubit at `index` without touching the state.
pub fn soft_measure<P: Precision, R: Rng + ?Sized>(
    index: usize,
    input: &[Complex<P>],
    rng: &mut R,
) -> bool {
    let [p0, p1] = measure_probs(index, input);
    let total = p0 + p1;
    if total.is_zero() {
        return false;
    }
    let r = rng.gen_range(P::zero()..P::one()) * total;
    r >= p0
}

/// Samples a reading of the qubit at `index` from `input`, then calls `measure_state` to collapse
/// it into `output`. Returns the reading and its probability.
pub fn measure<P: Precision, R: Rng + ?Sized>(
    index: usize,
    input: &[Complex<P>],
    output: &mut [Complex<P>],
    rng: &mut R,
) -> (bool, P) {
    let m = soft_measure(index, input, rng);
    let p = measure_prob(index, m, input);
    measure_state(index, (m, p), input, output);
    (m, p)
}

/// Zero out the entries of `input` which cannot give `measured` and scale the rest by
/// `1/sqrt(p)`, writing the result to `output`. A zero probability copies `input` unchanged.
pub fn measure_state<P: Precision>(
    index: usize,
    measured: (bool, P),
    input: &[Complex<P>],
    output: &mut [Complex<P>],
) {
    let (measured, measured_prob) = measured;
    if measured_prob.is_zero() {
        output.copy_from_slice(input);
        return;
    }
    let p_mult = P::one() / measured_prob.sqrt();
    iter_mut!(output).enumerate().for_each(|(row, out)| {
        *out = if get_bit(row, index) == measured {
            input[row] * p_mult
        } else {
            Complex::zero()
        };
    });
}

/// Pull the state of the qubit at `index` out of `input`.
///
/// Only meaningful when that qubit is not entangled with the rest of the register, as is the
/// case for every qubit that has been measured plus at most one unmeasured qubit.
pub fn factor_qubit<P: Precision>(
    index: usize,
    input: &[Complex<P>],
) -> CircuitResult<QubitState<P>> {
    let (a, b) = (0..input.len())
        .filter(|row| !get_bit(*row, index))
        .map(|row| (input[row], input[set_bit(row, index, true)]))
        .fold((Complex::zero(), Complex::zero()), |best, (a, b)| {
            if a.norm_sqr() + b.norm_sqr() > best.0.norm_sqr() + best.1.norm_sqr() {
                (a, b)
            } else {
                best
            }
        });
    let norm = (a.norm_sqr() + b.norm_sqr()).sqrt();
    if norm.is_zero() {
        return Err(CircuitError::state("state vector is empty"));
    }
    QubitState::new(a / norm, b / norm)
}

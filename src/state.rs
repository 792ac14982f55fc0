use crate::errors::{CircuitError, CircuitResult};
use crate::types::{half, Precision};
use crate::Complex;
use num_traits::{One, Zero};

/// Tolerance on `|a|^2 + |b|^2 - 1` accepted when building a state from raw amplitudes.
const NORM_TOLERANCE: f64 = 1e-8;

/// A pure single-qubit state `a|0> + b|1>` with `|a|^2 + |b|^2 = 1`.
///
/// Construction always goes through a normalizing or validating constructor, so every
/// `QubitState` in circulation satisfies the norm invariant up to float error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QubitState<P: Precision> {
    amplitudes: [Complex<P>; 2],
}

impl<P: Precision> QubitState<P> {
    /// Prepare `cos(theta/2)|0> + e^{i phi} sin(theta/2)|1>`.
    ///
    /// # Example
    /// ```
    /// use qteleport::state::QubitState;
    /// use std::f64::consts::PI;
    ///
    /// let psi = QubitState::from_angles(PI, 0.0);
    /// let (p0, p1) = psi.probabilities();
    /// assert!(p0 < 1e-12);
    /// assert!((p1 - 1.0).abs() < 1e-12);
    /// ```
    pub fn from_angles(theta: P, phi: P) -> Self {
        let h = theta * half();
        let a = Complex::new(h.cos(), P::zero());
        let b = Complex::from_polar(h.sin(), phi);
        Self { amplitudes: [a, b] }
    }

    /// Build a state from explicit amplitudes, rejecting anything not unit norm.
    pub fn new(a: Complex<P>, b: Complex<P>) -> CircuitResult<Self> {
        let norm = a.norm_sqr() + b.norm_sqr();
        if !norm.is_finite() {
            return Err(CircuitError::state("amplitudes must be finite"));
        }
        let tolerance = P::from(NORM_TOLERANCE).unwrap_or_else(P::epsilon);
        if (norm - P::one()).abs() > tolerance {
            return Err(CircuitError::state(format!(
                "|a|^2 + |b|^2 = {} but must equal 1",
                norm
            )));
        }
        Ok(Self { amplitudes: [a, b] })
    }

    /// Build a state from a slice of amplitudes, which must have exactly two entries.
    pub fn from_amplitudes(amplitudes: &[Complex<P>]) -> CircuitResult<Self> {
        match amplitudes {
            [a, b] => Self::new(*a, *b),
            _ => Err(CircuitError::state(format!(
                "a single qubit needs 2 amplitudes, found {}",
                amplitudes.len()
            ))),
        }
    }

    /// The computational basis state `|0>`.
    pub fn zero() -> Self {
        Self {
            amplitudes: [Complex::one(), Complex::zero()],
        }
    }

    /// The computational basis state `|1>`.
    pub fn one() -> Self {
        Self {
            amplitudes: [Complex::zero(), Complex::one()],
        }
    }

    /// The amplitudes `[a, b]`.
    pub fn amplitudes(&self) -> &[Complex<P>; 2] {
        &self.amplitudes
    }

    /// Born rule probabilities of reading `0` and `1`.
    pub fn probabilities(&self) -> (P, P) {
        let [a, b] = self.amplitudes;
        (a.norm_sqr(), b.norm_sqr())
    }

    /// Recover Bloch sphere angles `(theta, phi)` with `phi` in `[0, 2pi)`.
    ///
    /// The global phase carried by `a` is dropped.
    pub fn bloch_angles(&self) -> (P, P) {
        let [a, b] = self.amplitudes;
        let two = P::one() + P::one();
        let theta = two * b.norm().atan2(a.norm());
        if a.norm().is_zero() || b.norm().is_zero() {
            return (theta, P::zero());
        }
        let tau = two * P::PI();
        let mut phi = (b.arg() - a.arg()) % tau;
        if phi < P::zero() {
            phi += tau;
        }
        (theta, phi)
    }

    /// Unitary `U` with `U|0> = self`, row major.
    pub(crate) fn preparation_matrix(&self) -> [Complex<P>; 4] {
        let [a, b] = self.amplitudes;
        [a, -b.conj(), b, a.conj()]
    }

    /// `|<self|other>|^2`, one for states equal up to global phase.
    pub fn fidelity(&self, other: &Self) -> P {
        let [a0, b0] = self.amplitudes;
        let [a1, b1] = other.amplitudes;
        (a0.conj() * a1 + b0.conj() * b1).norm_sqr()
    }
}

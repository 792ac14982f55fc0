use num_traits::{Float, FloatConst, NumAssign};
use rand::distributions::uniform::SampleUniform;
use std::fmt::{Debug, Display};
use std::iter::{Product, Sum};

/// The float precision of the circuit.
pub trait Precision:
    Default
    + NumAssign
    + Float
    + FloatConst
    + SampleUniform
    + Sum
    + Send
    + Sync
    + Display
    + Product
    + Debug
{
}

impl Precision for f64 {}

impl Precision for f32 {}

/// Relative tolerance used by [`is_close`].
pub const RELATIVE_TOLERANCE: f64 = 1e-5;
/// Absolute tolerance used by [`is_close`].
pub const ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// Checks `|a - b| <= atol + rtol * |b|`, the usual numeric closeness test.
///
/// # Example
/// ```
/// use qteleport::types::is_close;
///
/// assert!(is_close(0.5f64, 0.5 + 1e-9));
/// assert!(!is_close(0.5f64, 0.51));
/// ```
pub fn is_close<P: Precision>(a: P, b: P) -> bool {
    let rtol = P::from(RELATIVE_TOLERANCE).unwrap_or_else(P::epsilon);
    let atol = P::from(ABSOLUTE_TOLERANCE).unwrap_or_else(P::epsilon);
    (a - b).abs() <= atol + rtol * b.abs()
}

/// One half in the requested precision.
#[inline]
pub(crate) fn half<P: Precision>() -> P {
    P::one() / (P::one() + P::one())
}

/// A shot count in the requested precision.
#[inline]
pub(crate) fn from_count<P: Precision>(count: usize) -> P {
    P::from(count).unwrap_or_else(P::nan)
}

//! Turns the outcome histogram of a teleportation run into a success rate.
//!
//! The success rate only understands the two textbook cases: a computational basis state, where
//! exactly one reading is right, and an equal superposition, where each reading is credited half.
//! Any other state scores zero, which is logged and reported as [`ScoreKind::Unrecognized`].
//! [`total_variation_distance`] is the general purpose comparison against the Born rule.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::warn;

use crate::circuit::ClassicalRegister;
use crate::counts::OutcomeCounts;
use crate::state::QubitState;
use crate::types::{from_count, half, is_close, Precision};

/// Which scoring rule applied to a state.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ScoreKind {
    /// `|a|^2 = 1`, every `0` reading is a success.
    BasisZero,
    /// `|b|^2 = 1`, every `1` reading is a success.
    BasisOne,
    /// `|a|^2 = |b|^2 = 1/2`, every reading is half a success.
    Balanced,
    /// Anything else. Nothing is credited.
    Unrecognized,
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreKind::BasisZero => "basis state |0>",
            ScoreKind::BasisOne => "basis state |1>",
            ScoreKind::Balanced => "equal superposition",
            ScoreKind::Unrecognized => "unrecognized superposition",
        };
        write!(f, "{}", s)
    }
}

/// Both metrics for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score<P: Precision> {
    /// Rule the success rate was computed with.
    pub kind: ScoreKind,
    /// Fraction of shots credited as successes, in `[0, 1]`.
    pub success_rate: P,
    /// Distance between the observed and expected final readings, in `[0, 1]`.
    pub total_variation_distance: P,
}

/// Decide which scoring rule applies to `psi`.
pub fn classify<P: Precision>(psi: &QubitState<P>) -> ScoreKind {
    let (p0, p1) = psi.probabilities();
    if is_close(p0, P::one()) {
        ScoreKind::BasisZero
    } else if is_close(p1, P::one()) {
        ScoreKind::BasisOne
    } else if is_close(p0, half()) || is_close(p1, half()) {
        ScoreKind::Balanced
    } else {
        ScoreKind::Unrecognized
    }
}

/// Credit given to one shot whose final reading was `bit`.
fn credit<P: Precision>(psi: &QubitState<P>, bit: usize) -> P {
    let (p0, p1) = psi.probabilities();
    let p = match bit {
        0 => p0,
        1 => p1,
        _ => return P::zero(),
    };
    let mut c = P::zero();
    if is_close(p, P::one()) {
        c += P::one();
    }
    if is_close(p, half()) {
        c += half();
    }
    c
}

/// Fraction of `shots` whose reading of `result` agrees with `psi` under the canonical rule.
///
/// # Example
/// ```
/// use qteleport::prelude::*;
/// use qteleport::scoring::success_rate;
/// use std::num::NonZeroUsize;
///
/// let one = NonZeroUsize::new(1).unwrap();
/// let mut b = CircuitBuilder::<f64>::new(one);
/// let result = b.classical_register("result", one).unwrap();
///
/// let counts = OutcomeCounts::from_bit_strings([("0", 510), ("1", 514)]).unwrap();
/// let psi = QubitState::from_angles(std::f64::consts::FRAC_PI_2, 0.0);
/// let rate = success_rate(&counts, &psi, &result, NonZeroUsize::new(1024).unwrap());
/// assert!((rate - 1.0).abs() < 1e-12);
/// ```
pub fn success_rate<P: Precision>(
    counts: &OutcomeCounts,
    psi: &QubitState<P>,
    result: &ClassicalRegister,
    shots: NonZeroUsize,
) -> P {
    let total: P = counts
        .marginal(result)
        .into_iter()
        .map(|(bit, count)| credit(psi, bit) * from_count(count))
        .sum();
    total / from_count(shots.get())
}

/// Total variation distance between the observed readings of `result` and `(|a|^2, |b|^2)`.
pub fn total_variation_distance<P: Precision>(
    counts: &OutcomeCounts,
    psi: &QubitState<P>,
    result: &ClassicalRegister,
    shots: NonZeroUsize,
) -> P {
    let marginal = counts.marginal(result);
    let shots: P = from_count(shots.get());
    let observed = |bit: usize| -> P {
        from_count::<P>(marginal.get(&bit).copied().unwrap_or(0)) / shots
    };
    let (p0, p1) = psi.probabilities();
    ((observed(0) - p0).abs() + (observed(1) - p1).abs()) * half()
}

/// Compute both metrics, warning when the canonical rule does not cover `psi`.
pub fn score<P: Precision>(
    counts: &OutcomeCounts,
    psi: &QubitState<P>,
    result: &ClassicalRegister,
    shots: NonZeroUsize,
) -> Score<P> {
    let kind = classify(psi);
    if kind == ScoreKind::Unrecognized {
        let (p0, p1) = psi.probabilities();
        warn!(
            p0 = %p0,
            p1 = %p1,
            "success rate only credits basis states and equal superpositions; use the total variation distance for this state"
        );
    }
    Score {
        kind,
        success_rate: success_rate(counts, psi, result, shots),
        total_variation_distance: total_variation_distance(counts, psi, result, shots),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use std::f64::consts::PI;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn score_logged(psi: &QubitState<f64>) -> (Score<f64>, String) {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .with_max_level(Level::WARN)
            .finish();
        let r = result_register();
        let counts = OutcomeCounts::from_bit_strings([("000", 6), ("100", 4)]).unwrap();
        let s = tracing::subscriber::with_default(subscriber, || score(&counts, psi, &r, nz(10)));
        (s, log.text())
    }

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// Registers laid out like the teleportation circuit: crz, crx, cr_result.
    fn result_register() -> ClassicalRegister {
        let mut b = CircuitBuilder::<f64>::new(nz(3));
        b.classical_register("crz", nz(1)).unwrap();
        b.classical_register("crx", nz(1)).unwrap();
        b.classical_register("cr_result", nz(1)).unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&QubitState::from_angles(0.0, 0.0)), ScoreKind::BasisZero);
        assert_eq!(classify(&QubitState::from_angles(PI, 1.0)), ScoreKind::BasisOne);
        assert_eq!(classify(&QubitState::from_angles(PI / 2.0, 3.0)), ScoreKind::Balanced);
        assert_eq!(classify(&QubitState::from_angles(PI / 3.0, 0.0)), ScoreKind::Unrecognized);
    }

    #[test]
    fn test_basis_zero_counts_only_zero_readings() {
        let r = result_register();
        // Leftmost bit is cr_result.
        let counts =
            OutcomeCounts::from_bit_strings([("000", 40), ("011", 50), ("101", 10)]).unwrap();
        let psi = QubitState::from_angles(0.0, 0.0);
        let rate = success_rate(&counts, &psi, &r, nz(100));
        assert!((rate - 0.9f64).abs() < 1e-12);
    }

    #[test]
    fn test_basis_one() {
        let r = result_register();
        let counts = OutcomeCounts::from_bit_strings([("100", 25), ("111", 75)]).unwrap();
        let psi = QubitState::from_angles(PI, 0.5);
        assert!((success_rate(&counts, &psi, &r, nz(100)) - 1.0f64).abs() < 1e-12);
        let tvd = total_variation_distance(&counts, &psi, &r, nz(100));
        assert!(tvd.abs() < 1e-12);
    }

    #[test]
    fn test_balanced_credits_half_each() {
        let r = result_register();
        let counts = OutcomeCounts::from_bit_strings([("000", 30), ("110", 70)]).unwrap();
        let psi = QubitState::from_angles(PI / 2.0, 0.0);
        assert!((success_rate(&counts, &psi, &r, nz(100)) - 1.0f64).abs() < 1e-12);
        let tvd = total_variation_distance(&counts, &psi, &r, nz(100));
        assert!((tvd - 0.2f64).abs() < 1e-12);
    }

    #[test]
    fn test_unrecognized_scores_zero() {
        let r = result_register();
        let counts = OutcomeCounts::from_bit_strings([("000", 75), ("100", 25)]).unwrap();
        let psi = QubitState::from_angles(PI / 3.0, 0.0);
        let s = score(&counts, &psi, &r, nz(100));
        assert_eq!(s.kind, ScoreKind::Unrecognized);
        assert_eq!(s.success_rate, 0.0);
        // cos^2(pi/6) = 0.75 so the readings match the Born rule exactly.
        assert!(s.total_variation_distance < 1e-12);
    }

    #[test]
    fn test_scoring_is_linear_in_counts() {
        let r = result_register();
        let counts =
            OutcomeCounts::from_bit_strings([("000", 3), ("101", 5), ("110", 9)]).unwrap();
        for psi in [
            QubitState::from_angles(0.0, 0.0),
            QubitState::from_angles(PI, 0.0),
            QubitState::from_angles(PI / 2.0, 1.0),
        ] {
            let base = success_rate(&counts, &psi, &r, nz(17));
            for k in [2, 7, 100] {
                let scaled = success_rate(&counts.scaled(k), &psi, &r, nz(17 * k));
                assert!((base - scaled).abs() < 1e-12f64);
            }
        }
    }

    #[test]
    fn test_unrecognized_state_emits_warning() {
        let (s, log) = score_logged(&QubitState::from_angles(PI / 3.0, 0.0));
        assert_eq!(s.kind, ScoreKind::Unrecognized);
        assert!(log.contains("WARN"), "{:?}", log);
        assert!(log.contains("success rate only credits"), "{:?}", log);
    }

    #[test]
    fn test_recognized_state_is_quiet() {
        let (s, log) = score_logged(&QubitState::from_angles(PI / 2.0, 0.0));
        assert_eq!(s.kind, ScoreKind::Balanced);
        assert!(log.is_empty(), "{:?}", log);
    }
}

extern crate qteleport;

use qteleport::prelude::*;
use qteleport::scoring::{success_rate, ScoreKind};
use qteleport::teleportation::{run_teleportation, teleportation_circuit};
use std::f64::consts::PI;
use std::num::NonZeroUsize;

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn assert_almost_eq(a: f64, b: f64, prec: i32) {
    let mult = 10.0f64.powi(prec);
    let (a, b) = (a * mult, b * mult);
    let (a, b) = (a.round(), b.round());
    assert_eq!(a / mult, b / mult);
}

#[test]
fn test_prepared_state_is_normalized() {
    for i in 0..=36 {
        for j in 0..36 {
            let theta = PI * i as f64 / 36.0;
            let phi = 2.0 * PI * j as f64 / 36.0;
            let (p0, p1) = QubitState::from_angles(theta, phi).probabilities();
            assert_almost_eq(p0 + p1, 1.0, 10);
        }
    }
}

#[test]
fn test_teleport_zero() -> CircuitResult<()> {
    let psi = QubitState::from_angles(0.0, 0.0);
    assert_eq!(psi.amplitudes(), QubitState::zero().amplitudes());

    let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(11));
    let report = run_teleportation(&psi, &sim, nz(10_000))?;
    let [zeros, _] = report.result_counts();
    assert!(zeros as f64 >= 0.99 * 10_000.0);
    assert_eq!(report.score.kind, ScoreKind::BasisZero);
    assert!(report.score.success_rate >= 0.99);
    Ok(())
}

#[test]
fn test_teleport_one() -> CircuitResult<()> {
    for phi in [0.0, 0.3, PI, 5.0] {
        let psi = QubitState::from_angles(PI, phi);
        let [a, b] = *psi.amplitudes();
        assert!(a.norm() < 1e-12);
        assert_almost_eq(b.re, phi.cos(), 10);
        assert_almost_eq(b.im, phi.sin(), 10);

        let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(5));
        let report = run_teleportation(&psi, &sim, nz(1000))?;
        assert_eq!(report.result_counts(), [0, 1000]);
        assert_almost_eq(report.score.success_rate, 1.0, 10);
    }
    Ok(())
}

#[test]
fn test_teleport_equal_superposition() -> CircuitResult<()> {
    let psi = QubitState::from_angles(PI / 2.0, 0.0);
    let [a, b] = *psi.amplitudes();
    assert_almost_eq(a.re, std::f64::consts::FRAC_1_SQRT_2, 10);
    assert_almost_eq(b.re, std::f64::consts::FRAC_1_SQRT_2, 10);

    let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(2024));
    let report = run_teleportation(&psi, &sim, nz(1024))?;
    let [zeros, ones] = report.result_counts();
    assert_eq!(zeros + ones, 1024);
    let frac = ones as f64 / 1024.0;
    assert!((frac - 0.5).abs() < 0.08, "fraction of ones {}", frac);
    assert_eq!(report.score.kind, ScoreKind::Balanced);
    assert_almost_eq(report.score.success_rate, 1.0, 10);
    Ok(())
}

#[test]
fn test_counts_sum_to_shots() -> CircuitResult<()> {
    let sim = StatevectorSimulator::default();
    for (theta, shots) in [(0.4, 1), (1.3, 17), (2.8, 500)] {
        let psi = QubitState::from_angles(theta, 1.0);
        let report = run_teleportation(&psi, &sim, nz(shots))?;
        assert_eq!(report.counts.shots(), shots);
        assert_eq!(report.counts.num_clbits(), 3);
    }
    Ok(())
}

#[test]
fn test_same_seed_same_counts() -> CircuitResult<()> {
    let psi = QubitState::from_angles(1.1, 4.0);
    let run = |seed| -> CircuitResult<OutcomeCounts> {
        let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(seed));
        Ok(run_teleportation(&psi, &sim, nz(2048))?.counts)
    };
    assert_eq!(run(99)?, run(99)?);
    assert_ne!(run(99)?, run(100)?);
    Ok(())
}

#[test]
fn test_success_rate_scales() -> CircuitResult<()> {
    let psi = QubitState::from_angles(PI / 2.0, 2.0);
    let tc = teleportation_circuit(&psi)?;
    let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(8));
    let counts = sim.execute(tc.circuit(), nz(300))?;
    let base: f64 = success_rate(&counts, &psi, tc.cr_result(), nz(300));
    for k in [2, 5, 31] {
        let scaled: f64 = success_rate(&counts.scaled(k), &psi, tc.cr_result(), nz(300 * k));
        assert_almost_eq(base, scaled, 12);
    }
    Ok(())
}

#[test]
fn test_teleport_statistics() -> CircuitResult<()> {
    let sim = StatevectorSimulator::new(SimulatorConfig::with_seed(17));
    for i in 0..12 {
        let theta = PI * i as f64 / 11.0;
        let psi = QubitState::from_angles(theta, 0.7 * i as f64 % (2.0 * PI));
        let report = run_teleportation(&psi, &sim, nz(5000))?;
        let (_, p1) = psi.probabilities();
        let [_, ones] = report.result_counts();
        assert!(
            (ones as f64 / 5000.0 - p1).abs() < 0.03,
            "theta {} gave {} ones",
            theta,
            ones
        );
        assert!(report.score.total_variation_distance < 0.03);
    }
    Ok(())
}

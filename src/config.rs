//! Validated run parameters for the teleportation pipeline.

use std::f64::consts::{PI, TAU};
use std::num::NonZeroUsize;

use crate::errors::{CircuitError, CircuitResult};
use crate::simulator::SimulatorConfig;
use crate::state::QubitState;
use crate::teleportation::DEFAULT_SHOTS;

/// Parse an angle in radians.
///
/// Accepts plain floats and the forms `pi`, `pi/k`, `m*pi` and `m*pi/k`.
///
/// # Example
/// ```
/// use qteleport::config::parse_angle;
/// use std::f64::consts::PI;
///
/// assert_eq!(parse_angle("0.25").unwrap(), 0.25);
/// assert_eq!(parse_angle("pi/2").unwrap(), PI / 2.0);
/// assert_eq!(parse_angle("3*pi/4").unwrap(), 3.0 * PI / 4.0);
/// assert!(parse_angle("pie").is_err());
/// ```
pub fn parse_angle(text: &str) -> CircuitResult<f64> {
    let s: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let invalid = || CircuitError::parameter(format!("cannot parse angle {:?}", text));

    let value = match s.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            let (numerator, denominator) = match s.split_once('/') {
                Some((n, d)) => (n, Some(d)),
                None => (s.as_str(), None),
            };
            let multiple = match numerator {
                "pi" => 1.0,
                "-pi" => -1.0,
                n => n
                    .strip_suffix("*pi")
                    .and_then(|m| m.parse::<f64>().ok())
                    .ok_or_else(invalid)?,
            };
            let divisor = match denominator {
                None => 1.0,
                Some(d) => d.parse::<f64>().map_err(|_| invalid())?,
            };
            if divisor == 0.0 {
                return Err(CircuitError::parameter(format!(
                    "angle {:?} divides by zero",
                    text
                )));
            }
            multiple * PI / divisor
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CircuitError::parameter(format!(
            "angle {:?} is not finite",
            text
        )))
    }
}

/// One teleportation run: the message angles, how many shots, and an optional seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportConfig {
    theta: f64,
    phi: f64,
    shots: NonZeroUsize,
    seed: Option<u64>,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            theta: PI / 2.0,
            phi: 0.0,
            shots: NonZeroUsize::new(DEFAULT_SHOTS).unwrap_or(NonZeroUsize::MIN),
            seed: None,
        }
    }
}

impl TeleportConfig {
    /// Validate and build a config.
    ///
    /// `theta` must lie in `[0, pi]`, `phi` in `[0, 2pi)` and `shots` must be positive.
    pub fn new(theta: f64, phi: f64, shots: usize, seed: Option<u64>) -> CircuitResult<Self> {
        if !(0.0..=PI).contains(&theta) {
            return Err(CircuitError::parameter(format!(
                "theta = {} is outside [0, pi]",
                theta
            )));
        }
        if !(0.0..TAU).contains(&phi) {
            return Err(CircuitError::parameter(format!(
                "phi = {} is outside [0, 2pi)",
                phi
            )));
        }
        let shots = NonZeroUsize::new(shots)
            .ok_or_else(|| CircuitError::parameter("shots must be positive"))?;
        Ok(Self {
            theta,
            phi,
            shots,
            seed,
        })
    }

    /// Like [`TeleportConfig::new`], with angles given as text.
    pub fn parse(theta: &str, phi: &str, shots: usize, seed: Option<u64>) -> CircuitResult<Self> {
        Self::new(parse_angle(theta)?, parse_angle(phi)?, shots, seed)
    }

    /// Polar angle of the message.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Azimuthal angle of the message.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Number of shots.
    pub fn shots(&self) -> NonZeroUsize {
        self.shots
    }

    /// Backend seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The message state `cos(theta/2)|0> + e^{i phi} sin(theta/2)|1>`.
    pub fn state(&self) -> QubitState<f64> {
        QubitState::from_angles(self.theta, self.phi)
    }

    /// Backend settings derived from this run.
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig { seed: self.seed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_angle_forms() {
        assert_eq!(parse_angle("pi").unwrap(), PI);
        assert_eq!(parse_angle(" PI / 4 ").unwrap(), PI / 4.0);
        assert_eq!(parse_angle("2*pi").unwrap(), 2.0 * PI);
        assert_eq!(parse_angle("-pi").unwrap(), -PI);
        assert_eq!(parse_angle("1.5*pi/3").unwrap(), 1.5 * PI / 3.0);
        assert_eq!(parse_angle("1e-3").unwrap(), 1e-3);
    }

    #[test]
    fn test_parse_angle_rejects() {
        for bad in ["", "pi/", "pi/0", "x*pi", "pi*2", "inf", "nan", "1/2"] {
            let err = parse_angle(bad).unwrap_err();
            assert!(
                matches!(err, CircuitError::InvalidParameter(_)),
                "{:?} -> {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_range_checks() {
        assert!(TeleportConfig::new(0.0, 0.0, 1, None).is_ok());
        assert!(TeleportConfig::new(PI, 6.28, 1, None).is_ok());
        assert!(TeleportConfig::new(-0.1, 0.0, 1, None).is_err());
        assert!(TeleportConfig::new(PI + 1e-9, 0.0, 1, None).is_err());
        assert!(TeleportConfig::new(1.0, TAU, 1, None).is_err());
        assert!(TeleportConfig::new(1.0, -0.5, 1, None).is_err());
        assert!(TeleportConfig::new(1.0, 0.0, 0, None).is_err());
    }

    #[test]
    fn test_default_and_parse() {
        let d = TeleportConfig::default();
        assert_eq!(d.theta(), PI / 2.0);
        assert_eq!(d.shots().get(), DEFAULT_SHOTS);
        let c = TeleportConfig::parse("pi/2", "0", DEFAULT_SHOTS, None).unwrap();
        assert_eq!(c, d);
        let c = TeleportConfig::parse("pi", "pi/3", 10, Some(7)).unwrap();
        assert_eq!(c.simulator_config().seed, Some(7));
        let (p0, p1) = c.state().probabilities();
        assert!(p0 < 1e-12 && (p1 - 1.0).abs() < 1e-12);
    }
}

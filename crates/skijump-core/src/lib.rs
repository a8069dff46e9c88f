//! Shared constants, error types, and skier parameters for the ski jump
//! design workspace.
//!
//! Includes:
//! - Physical constants (gravity, air density)
//! - The immutable skier parameter record
//! - The two public error kinds the composer surfaces to callers

#![forbid(unsafe_code)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// -------------------------
/// Physical constants
/// -------------------------

/// Gravitational acceleration, m/s^2.
pub const G: f64 = 9.81;

/// Ambient air density used throughout the workspace, kg/m^3.
///
/// This is a fixed design constant (not a function of temperature, pressure,
/// or altitude) per spec — see Non-goals: aerodynamic nonlinearities beyond a
/// constant drag-area product.
pub const RHO: f64 = 0.85;

/// -------------------------
/// Skier parameters
/// -------------------------

/// Immutable parameter tuple describing a skier, passed down explicitly
/// rather than held as mutable module-scope state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkierParams {
    /// Mass, kg.
    pub mass: f64,
    /// Frontal area, m^2.
    pub area: f64,
    /// Drag coefficient, dimensionless.
    pub drag_coeff: f64,
    /// Coulomb sliding-friction coefficient, dimensionless.
    pub friction_coeff: f64,
    /// Tolerable takeoff-transition normal acceleration, multiples of `G`.
    pub tolerable_acc_takeoff: f64,
    /// Tolerable landing-transition normal acceleration, multiples of `G`.
    pub tolerable_acc_landing: f64,
    /// Fraction of the takeoff transition's total angle span that is
    /// circular (the rest is clothoid, split evenly on both ends).
    pub gamma: f64,
    /// Time spent on the flat takeoff ramp at the end of the clothoid, s.
    pub ramp_time: f64,
}

impl SkierParams {
    /// Drag constant `eta = Cd * A * rho / (2 * m)`, units 1/m.
    pub fn eta(&self) -> f64 {
        self.drag_coeff * self.area * RHO / (2.0 * self.mass)
    }
}

impl Default for SkierParams {
    /// Matches the reference design's default parameter table: a 75 kg
    /// skier with combined `Cd*A ~= 0.279`, 3% sliding friction, tolerating
    /// 1.5 g on takeoff and 3 g on landing.
    fn default() -> Self {
        SkierParams {
            mass: 75.0,
            area: 0.34,
            drag_coeff: 0.821,
            friction_coeff: 0.03,
            tolerable_acc_takeoff: 1.5,
            tolerable_acc_landing: 3.0,
            gamma: 0.99,
            ramp_time: 0.2,
        }
    }
}

/// -------------------------
/// Errors
/// -------------------------

/// The two error kinds the composer's public API surfaces to a caller.
///
/// Numerical errors from `skijump-numerics` never propagate raw; they are
/// rewrapped as `InvalidJump` with the numeric reason folded into the
/// message (see `From<skijump_numerics::NumericError>` below, gated behind
/// the `numerics` feature to avoid a hard dependency cycle).
#[derive(Debug, thiserror::Error)]
pub enum SkiJumpError {
    /// The inputs are geometrically or physically infeasible for a valid
    /// jump (zero/negative fall height, skier too slow, flight escapes, no
    /// feasible landing transition, EFH surface dips below the slope).
    #[error("invalid jump: {0}")]
    InvalidJump(String),
    /// Inputs violate a stated precondition (e.g. angle ordering). Not
    /// recoverable by retrying with the same inputs.
    #[error("invalid input: {0}")]
    Value(String),
}

impl SkiJumpError {
    /// Construct an `InvalidJump` from any displayable reason.
    pub fn invalid_jump(reason: impl Into<String>) -> Self {
        SkiJumpError::InvalidJump(reason.into())
    }

    /// Construct a `Value` error from any displayable reason.
    pub fn value(reason: impl Into<String>) -> Self {
        SkiJumpError::Value(reason.into())
    }
}

#[cfg(feature = "numerics")]
impl From<skijump_numerics::NumericError> for SkiJumpError {
    /// Numerical errors never propagate raw past the crate boundary; they
    /// are folded into `InvalidJump` with the numeric reason attached.
    fn from(err: skijump_numerics::NumericError) -> Self {
        SkiJumpError::InvalidJump(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_skier_eta_matches_reference_design() {
        let skier = SkierParams::default();
        // Cd*A*rho/(2m) with Cd*A ~= 0.279, rho = 0.85, m = 75.
        let expected = 0.279 * 0.85 / (2.0 * 75.0);
        assert!((skier.eta() - expected).abs() < 1e-3);
    }

    #[test]
    fn error_display_is_human_readable() {
        let e = SkiJumpError::invalid_jump("slow skier");
        assert_eq!(e.to_string(), "invalid jump: slow skier");
    }
}

//! skijump-numerics
//!
//! The numerical kernel shared by every surface and skier-dynamics
//! computation in the workspace:
//! - Adaptive Dormand-Prince RK45 ODE integration with event termination
//!   and cubic-Hermite dense output (`ode`).
//! - Natural cubic spline interpolation with linear extrapolation (`spline`).
//! - Bracketed bisection root finding (`rootfind`).
//! - Brent derivative-free 1-D minimization (`minimize`).
//! - Central-difference numeric differentiation of sampled curves (`diff`).
//!
//! None of these types hold process-wide state; every function is pure
//! given its inputs.

#![forbid(unsafe_code)]

pub mod diff;
pub mod minimize;
pub mod ode;
pub mod rootfind;
pub mod spline;

pub use minimize::brent_minimize;
pub use ode::{integrate, Direction, EventHit, EventSpec, IntegrationOutcome, OdeOptions};
pub use rootfind::bisect;
pub use spline::CubicSpline;

/// Errors raised by the numerical kernel.
///
/// Callers outside this crate (the composer, in particular) rewrap these
/// into `skijump_core::SkiJumpError::InvalidJump` rather than propagating
/// them raw, per the workspace's error-handling policy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NumericError {
    /// `bisect`/root finding was asked to search an interval where
    /// `f(a)` and `f(b)` have the same sign.
    #[error("bracket does not contain a sign change: f({a})={fa}, f({b})={fb}")]
    Bracket { a: f64, b: f64, fa: f64, fb: f64 },
    /// The adaptive step size underflowed before reaching `t_span.1`.
    #[error("integration stalled: step size underflowed at t={t}")]
    Integration { t: f64 },
    /// An event was requested but never located within `t_span`.
    #[error("event not reached within t_span (t_end={t_end})")]
    NoEvent { t_end: f64 },
    /// A bounded iterative search exceeded its iteration budget.
    #[error("exceeded {max_iter} iterations without converging")]
    MaxIterations { max_iter: usize },
}

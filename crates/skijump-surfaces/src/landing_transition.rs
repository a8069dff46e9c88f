//! The landing-transition exponential curve: `y_t(x) = a*e^{b(x-x_T)} + c*x + d`.
//!
//! This module owns the curve's closed-form geometry — given a tangent
//! point and direction on the flight trajectory, and the parent slope's
//! line, the exponential's four coefficients are fully determined
//! algebraically, no iterative solve needed. The *search* over candidate
//! tangent points (which needs skier sliding dynamics to evaluate each
//! candidate's peak normal acceleration) lives in the composer crate,
//! which calls back into this module once per candidate and, having
//! chosen the best one, builds the final `LandingTransitionSurface` from
//! it.

use std::ops::{Deref, DerefMut};

use crate::surface::{simpson_integrate, Surface};

/// A candidate (or final) exponential landing-transition curve.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialCurve {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    x_tangent: f64,
}

impl ExponentialCurve {
    /// Build the unique exponential curve through `(x_t, y_t)` with slope
    /// `slope_t` there, whose `x -> +inf` asymptote is the parent slope's
    /// line `y = parent_c * x + parent_d`.
    ///
    /// Returns `None` when the curve would diverge rather than decay
    /// toward the parent slope as `x` increases (the candidate tangent
    /// point is geometrically unusable and should be excluded from the
    /// transition search).
    pub fn new(x_t: f64, y_t: f64, slope_t: f64, parent_c: f64, parent_d: f64) -> Option<Self> {
        let a = y_t - parent_c * x_t - parent_d;
        if a.abs() < 1e-9 {
            return None;
        }
        let b = (slope_t - parent_c) / a;
        if !b.is_finite() || b >= 0.0 {
            return None;
        }
        Some(ExponentialCurve {
            a,
            b,
            c: parent_c,
            d: parent_d,
            x_tangent: x_t,
        })
    }

    pub fn y(&self, x: f64) -> f64 {
        self.a * (self.b * (x - self.x_tangent)).exp() + self.c * x + self.d
    }

    pub fn slope(&self, x: f64) -> f64 {
        self.a * self.b * (self.b * (x - self.x_tangent)).exp() + self.c
    }

    pub fn curvature(&self, x: f64) -> f64 {
        let yp = self.slope(x);
        let ypp = self.a * self.b * self.b * (self.b * (x - self.x_tangent)).exp();
        ypp / (1.0 + yp * yp).powf(1.5)
    }

    /// The `x` at which the curve has decayed to within `tol` of the
    /// parent slope — treated as touchdown for sampling purposes.
    pub fn touchdown_x(&self, tol: f64) -> f64 {
        self.x_tangent + (tol / self.a.abs()).ln() / self.b
    }

    /// Sample the curve from its tangent point to touchdown.
    pub fn sample(&self, tol: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
        let x_end = self.touchdown_x(tol);
        let xs: Vec<f64> = (0..n)
            .map(|i| self.x_tangent + (x_end - self.x_tangent) * i as f64 / (n - 1) as f64)
            .collect();
        let ys: Vec<f64> = xs.iter().map(|&x| self.y(x)).collect();
        (xs, ys)
    }

    /// Maximum `|curvature(x)| * v(x)^2` over `[x_tangent, x_end]` given a
    /// speed profile `v(x)` (e.g. from sliding a skier along this curve).
    pub fn max_normal_acceleration(&self, xs: &[f64], speeds: &[f64]) -> f64 {
        xs.iter()
            .zip(speeds)
            .map(|(&x, &v)| (self.curvature(x) * v * v).abs())
            .fold(0.0, f64::max)
    }
}

/// The curve connecting the chosen flight-trajectory point to the parent
/// slope, from `start` (the transition point) to `end` (touchdown).
#[derive(Debug, Clone)]
pub struct LandingTransitionSurface {
    surface: Surface,
}

impl LandingTransitionSurface {
    pub fn from_curve(curve: &ExponentialCurve, touchdown_tol: f64, n: usize) -> Self {
        let (xs, ys) = curve.sample(touchdown_tol, n);
        LandingTransitionSurface {
            surface: Surface::new(xs, ys),
        }
    }

    /// Construct directly from already-computed samples (used when the
    /// composer assembles the final curve from the chosen candidate).
    pub fn from_samples(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        LandingTransitionSurface {
            surface: Surface::new(xs, ys),
        }
    }
}

impl Deref for LandingTransitionSurface {
    type Target = Surface;
    fn deref(&self) -> &Surface {
        &self.surface
    }
}

impl DerefMut for LandingTransitionSurface {
    fn deref_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }
}

/// `area_under` helper shared with the composer's snow-budget calculation,
/// kept here since it only needs the exponential's closed form, not a
/// materialized `Surface`.
pub fn exponential_area_under(curve: &ExponentialCurve, x_start: f64, x_end: f64) -> f64 {
    simpson_integrate(|x| curve.y(x), x_start, x_end, 2000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn curve_passes_through_tangent_point_with_requested_slope() {
        let parent_c = (-15f64).to_radians().tan();
        let parent_d = 0.0;
        let curve = ExponentialCurve::new(10.0, 5.0, -0.5, parent_c, parent_d).unwrap();
        assert_abs_diff_eq!(curve.y(10.0), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(curve.slope(10.0), -0.5, epsilon = 1e-9);
    }

    #[test]
    fn curve_decays_toward_parent_slope() {
        let parent_c = (-15f64).to_radians().tan();
        let parent_d = 0.0;
        let curve = ExponentialCurve::new(10.0, 5.0, -0.5, parent_c, parent_d).unwrap();
        let x_touch = curve.touchdown_x(1e-3);
        assert!(x_touch > 10.0);
        assert_abs_diff_eq!(
            curve.y(x_touch) - (parent_c * x_touch + parent_d),
            1e-3,
            epsilon = 1e-6
        );
    }
}

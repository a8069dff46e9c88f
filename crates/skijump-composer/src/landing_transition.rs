//! The landing-transition search: scan the flight trajectory for the point
//! closest to the parent slope whose exponential transition curve keeps the
//! skier's normal acceleration under the tolerable landing limit.
//!
//! Grounded on spec section 4.7's algorithm description (the reference
//! design's `LandingTransitionSurface` lives in `surfaces.py`, which was not
//! retrieved alongside `functions.py` — this search is derived from the
//! spec's prose, not ported line-for-line).

use skijump_core::SkiJumpError;
use skijump_skier::Skier;
use skijump_surfaces::{ExponentialCurve, LandingTransitionSurface, Trajectory};

/// Number of candidate points the flight trajectory is discretized into.
const M: usize = 1000;
/// Number of evenly spaced indices sampled in the first scan pass.
const COARSE_STEPS: usize = 100;
/// Total metric evaluations (coarse scan + bisection refinement) allowed
/// before giving up, per spec section 5's 200-iteration search bound.
const MAX_ITER: usize = 200;
/// Distance from the exponential curve's tangent point to where it is
/// treated as having reached the parent slope.
const TOUCHDOWN_TOL: f64 = 1e-3;
const FINAL_SAMPLES: usize = 500;

/// `max normal acceleration on the candidate curve at index i, minus the
/// tolerable landing acceleration`. `None` when no valid transition curve
/// exists at this candidate point (diverging exponential, or the slide
/// along it fails).
fn candidate_metric(
    skier: &Skier,
    flight: &Trajectory,
    parent_c: f64,
    parent_d: f64,
    tolerable_accel: f64,
    x_t: f64,
) -> Option<f64> {
    let y_t = flight.interp_y(x_t);
    let slope_t = flight.slope_at(x_t);
    let curve = ExponentialCurve::new(x_t, y_t, slope_t, parent_c, parent_d)?;

    let x_touch = curve.touchdown_x(TOUCHDOWN_TOL);
    if !x_touch.is_finite() || x_touch <= x_t {
        return None;
    }

    let candidate_surface = LandingTransitionSurface::from_curve(&curve, TOUCHDOWN_TOL, 200);
    let t0 = flight.time_at_x(x_t);
    let v0 = flight.speed_at(t0);

    let outcome = skier.slide_on(&candidate_surface, x_t, x_touch, v0).ok()?;
    let accel = curve.max_normal_acceleration(&outcome.xs, &outcome.vs);
    Some(accel - tolerable_accel)
}

/// Find the landing-transition point and build its exponential curve.
///
/// `tolerable_accel` is already in m/s^2 (`a_l * g`), not multiples of g.
pub fn search(
    skier: &Skier,
    flight: &Trajectory,
    parent_c: f64,
    parent_d: f64,
    tolerable_accel: f64,
) -> Result<LandingTransitionSurface, SkiJumpError> {
    let x0 = flight.start().0;
    let x1 = flight.end().0;
    let xs: Vec<f64> = (0..M).map(|i| x0 + (x1 - x0) * i as f64 / (M - 1) as f64).collect();

    let metric = |i: usize| candidate_metric(skier, flight, parent_c, parent_d, tolerable_accel, xs[i]);

    let coarse_idxs: Vec<usize> = (0..COARSE_STEPS).map(|k| k * (M - 1) / (COARSE_STEPS - 1)).collect();

    let mut lo_idx: Option<usize> = None;
    for &i in coarse_idxs.iter().rev() {
        if matches!(metric(i), Some(v) if v < 0.0) {
            lo_idx = Some(i);
            break;
        }
    }
    let mut lo = lo_idx.ok_or_else(|| SkiJumpError::invalid_jump("landing transition infeasible"))?;

    let mut hi = coarse_idxs
        .iter()
        .copied()
        .find(|&i| i > lo && !matches!(metric(i), Some(v) if v < 0.0))
        .unwrap_or(M - 1);

    let mut iters = COARSE_STEPS;
    while hi - lo > 1 {
        if iters >= MAX_ITER {
            return Err(SkiJumpError::invalid_jump(
                "landing transition search exceeded its iteration budget",
            ));
        }
        let mid = (lo + hi) / 2;
        iters += 1;
        match metric(mid) {
            Some(v) if v < 0.0 => lo = mid,
            _ => hi = mid,
        }
    }

    let x_t = xs[lo];
    let y_t = flight.interp_y(x_t);
    let slope_t = flight.slope_at(x_t);
    let curve = ExponentialCurve::new(x_t, y_t, slope_t, parent_c, parent_d)
        .ok_or_else(|| SkiJumpError::invalid_jump("landing transition infeasible"))?;

    Ok(LandingTransitionSurface::from_curve(&curve, TOUCHDOWN_TOL, FINAL_SAMPLES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skijump_surfaces::Trajectory;

    #[test]
    fn finds_a_feasible_transition_on_a_gentle_descent() {
        let skier = Skier::default();
        // A shallow, slowly descending flight-like trajectory well above a
        // steeper parent slope gives the search an easy feasible window.
        let n = 200;
        let ts: Vec<f64> = (0..n).map(|i| i as f64 * 0.05).collect();
        let xs: Vec<f64> = ts.iter().map(|&t| 20.0 * t).collect();
        let ys: Vec<f64> = ts.iter().map(|&t| 10.0 - 0.5 * t).collect();
        let vxs = vec![20.0; n];
        let vys = vec![-0.5; n];
        let flight = Trajectory::new(ts, xs, ys, vxs, vys);

        let parent_c = (-30f64).to_radians().tan();
        let parent_d = -5.0;
        let tolerable_accel = 3.0 * 9.81;

        let result = search(&skier, &flight, parent_c, parent_d, tolerable_accel);
        assert!(result.is_ok());
    }
}

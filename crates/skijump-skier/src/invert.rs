//! Invert-fly: the takeoff speed that lands at a specified point from a
//! specified takeoff point and angle.
//!
//! Deliberately a pure function of `(P_0, alpha, P_L)` alone — no
//! reference to the landing surface under construction — per the
//! workspace's resolution of the cyclic EFH/invert-fly/fly-to dependency.

use skijump_core::SkiJumpError;
use skijump_numerics::{integrate, Direction, EventSpec, OdeOptions};

use crate::flight::{flight_rhs, FlightState, FLIGHT_T_END};
use crate::Skier;

const V_MIN: f64 = 0.1;
const V_MAX: f64 = 200.0;
const X_TOL: f64 = 1e-3;
const MAX_ITER: usize = 200;

/// Simulate free flight from `p0` at speed `v` and angle `alpha` until `y`
/// equals `p_l.1` on the descent, returning the full landing state.
fn simulate_landing(skier: &Skier, p0: (f64, f64), alpha: f64, p_l: (f64, f64), v: f64) -> Result<FlightState, SkiJumpError> {
    let eta = skier.params.eta();
    let rhs = flight_rhs(eta);

    let y_target = p_l.1;
    let level_event = move |_t: f64, y: &[f64]| y[1] - y_target;
    let events = [EventSpec {
        g: &level_event,
        terminal: true,
        direction: Direction::Falling,
    }];

    let (x0, y0) = p0;
    let vx0 = v * alpha.cos();
    let vy0 = v * alpha.sin();

    let outcome = integrate(rhs, (0.0, FLIGHT_T_END), &[x0, y0, vx0, vy0], &events, &OdeOptions::default())?;
    let y = outcome.last_y();
    Ok(FlightState {
        x: y[0],
        y: y[1],
        vx: y[2],
        vy: y[3],
    })
}

/// Horizontal signed distance between the free-flight trajectory launched
/// from `p0` at speed `v` and angle `alpha`, and `p_l`, measured at the
/// time the trajectory's `y` equals `p_l.1` on the descent.
fn landing_x_error(skier: &Skier, p0: (f64, f64), alpha: f64, p_l: (f64, f64), v: f64) -> Result<f64, SkiJumpError> {
    Ok(simulate_landing(skier, p0, alpha, p_l, v)?.x - p_l.0)
}

/// Find the takeoff speed `v*` such that flight from `p0` at angle `alpha`
/// passes through `p_l`, via bisection over `[0.1, 200] m/s`.
pub fn invert_fly(skier: &Skier, p0: (f64, f64), alpha: f64, p_l: (f64, f64)) -> Result<f64, SkiJumpError> {
    invert_fly_detailed(skier, p0, alpha, p_l).map(|(v, _)| v)
}

/// As `invert_fly`, but also returns the full flight state at the landing
/// point — the velocity vector there is exactly what the EFH landing-surface
/// construction needs (impact speed and angle), so it can avoid re-flying.
pub fn invert_fly_detailed(
    skier: &Skier,
    p0: (f64, f64),
    alpha: f64,
    p_l: (f64, f64),
) -> Result<(f64, FlightState), SkiJumpError> {
    let mut a = V_MIN;
    let mut b = V_MAX;
    let mut fa = landing_x_error(skier, p0, alpha, p_l, a)?;
    let mut fb = landing_x_error(skier, p0, alpha, p_l, b)?;

    if fa.abs() < X_TOL {
        return Ok((a, simulate_landing(skier, p0, alpha, p_l, a)?));
    }
    if fb.abs() < X_TOL {
        return Ok((b, simulate_landing(skier, p0, alpha, p_l, b)?));
    }
    if fa.signum() == fb.signum() {
        return Err(SkiJumpError::invalid_jump(format!(
            "invert_fly: no bracketing speed in [{V_MIN}, {V_MAX}] m/s (f({a})={fa}, f({b})={fb})"
        )));
    }

    let mut mid = 0.5 * (a + b);
    for _ in 0..MAX_ITER {
        mid = 0.5 * (a + b);
        let fm = landing_x_error(skier, p0, alpha, p_l, mid)?;
        if fm.abs() < X_TOL {
            return Ok((mid, simulate_landing(skier, p0, alpha, p_l, mid)?));
        }
        if fm.signum() == fa.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
            fb = fm;
        }
    }
    let _ = fb;
    Ok((mid, simulate_landing(skier, p0, alpha, p_l, mid)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn invert_fly_then_fly_to_reaches_target() {
        let skier = Skier::default();
        let p0 = (0.0, 20.0);
        let alpha = -0.1_f64;
        let p_l = (40.0, 0.0);

        let v_star = invert_fly(&skier, p0, alpha, p_l).unwrap();

        let ground = skijump_surfaces::Surface::new(vec![-10.0, 1000.0], vec![0.0, 0.0]);
        let outcome = skier
            .fly_to(&ground, p0, v_star * alpha.cos(), v_star * alpha.sin())
            .unwrap();

        assert_abs_diff_eq!(outcome.landing.x, p_l.0, epsilon = 1e-1);
    }
}

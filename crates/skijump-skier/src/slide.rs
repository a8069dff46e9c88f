//! Sliding on a surface: gravity, curvature-induced normal force, Coulomb
//! friction, and quadratic drag.

use skijump_core::{SkiJumpError, SkierParams, G};
use skijump_numerics::{integrate, Direction, EventSpec, OdeOptions};
use skijump_surfaces::Surface;

use crate::Skier;

/// Final state and sampled trajectory of a slide.
#[derive(Clone, Debug)]
pub struct SlideOutcome {
    pub final_x: f64,
    pub final_v: f64,
    /// Whether the skier stalled (`v` reached zero) before reaching the
    /// end of the surface, rather than reaching `x_end`.
    pub stalled: bool,
    pub ts: Vec<f64>,
    pub xs: Vec<f64>,
    pub vs: Vec<f64>,
}

/// State at a single point along the slide.
#[derive(Clone, Copy, Debug)]
pub struct SlideState {
    pub x: f64,
    pub v: f64,
}

impl Skier {
    /// Slide from `x_start` (speed `v0`) to `x_end` along `surface`.
    ///
    /// Terminates either at `x_end` (the intended outcome) or when `v`
    /// reaches zero first (`stalled = true`) — the composer reports this
    /// as the "slow skier" precondition failure.
    pub fn slide_on(
        &self,
        surface: &Surface,
        x_start: f64,
        x_end: f64,
        v0: f64,
    ) -> Result<SlideOutcome, SkiJumpError> {
        let params: SkierParams = self.params;
        let eta = params.eta();
        let mu = params.friction_coeff;

        let rhs = |_t: f64, y: &[f64]| -> Vec<f64> {
            let (x, v) = (y[0], y[1]);
            let theta = surface.slope_at(x).atan();
            let kappa = surface.curvature_at(x);
            let normal_over_m = (G * theta.cos() + kappa * v * v).max(0.0);
            let x_dot = v * theta.cos();
            let v_dot = -G * theta.sin() - eta * v * v - mu * normal_over_m * v.signum();
            vec![x_dot, v_dot]
        };

        let reach_end = |_t: f64, y: &[f64]| y[0] - x_end;
        let stall = |_t: f64, y: &[f64]| y[1];

        let events = [
            EventSpec {
                g: &reach_end,
                terminal: true,
                direction: Direction::Either,
            },
            EventSpec {
                g: &stall,
                terminal: true,
                direction: Direction::Either,
            },
        ];

        let outcome = integrate(rhs, (0.0, 1e4), &[x_start, v0], &events, &OdeOptions::default())?;

        let ts = outcome.ts.clone();
        let xs: Vec<f64> = outcome.ys.iter().map(|y| y[0]).collect();
        let vs: Vec<f64> = outcome.ys.iter().map(|y| y[1]).collect();
        let final_state = outcome.last_y();
        let stalled = matches!(&outcome.event, Some(hit) if hit.index == 1);

        Ok(SlideOutcome {
            final_x: final_state[0],
            final_v: final_state[1],
            stalled,
            ts,
            xs,
            vs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn slide_down_a_flat_slope_gains_speed() {
        let surface = Surface::new(vec![0.0, 100.0], vec![0.0, -30.0]);
        let skier = Skier::default();
        let outcome = skier.slide_on(&surface, 0.0, 80.0, 0.0).unwrap();
        assert!(!outcome.stalled);
        assert_abs_diff_eq!(outcome.final_x, 80.0, epsilon = 1e-3);
        assert!(outcome.final_v > 0.0);
    }

    #[test]
    fn slide_up_a_short_flat_run_can_stall() {
        let surface = Surface::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.3, 0.6]);
        let skier = Skier::default();
        let outcome = skier.slide_on(&surface, 0.0, 2.0, 0.5).unwrap();
        assert!(outcome.stalled || outcome.final_x >= 2.0 - 1e-3);
    }
}

//! Free-flight ballistics with quadratic drag, to a target surface.

use skijump_core::{SkiJumpError, G};
use skijump_numerics::{integrate, Direction, EventSpec, OdeOptions};
use skijump_surfaces::{Surface, Trajectory};

use crate::Skier;

/// State `(x, y, vx, vy)` at a point in flight.
#[derive(Clone, Copy, Debug)]
pub struct FlightState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// The flight trajectory and the point where it met the target surface.
#[derive(Clone, Debug)]
pub struct FlightOutcome {
    pub trajectory: Trajectory,
    pub landing: FlightState,
}

pub(crate) const FLIGHT_T_END: f64 = 1e4;

/// Quadratic-drag free-flight dynamics, shared by `fly_to` (event against a
/// target surface) and `invert_fly` (event against a bare y-level).
pub(crate) fn flight_rhs(eta: f64) -> impl Fn(f64, &[f64]) -> Vec<f64> {
    move |_t: f64, y: &[f64]| {
        let (vx, vy) = (y[2], y[3]);
        vec![vx, vy, -eta * vx.abs() * vx, -G - eta * vy.abs() * vy]
    }
}

impl Skier {
    /// Fly ballistically from `start` with initial velocity `(vx0, vy0)`
    /// until the trajectory crosses from above to on/below `surface`
    /// (`distance_from` descending through zero).
    pub fn fly_to(&self, surface: &Surface, start: (f64, f64), vx0: f64, vy0: f64) -> Result<FlightOutcome, SkiJumpError> {
        let eta = self.params.eta();
        let rhs = flight_rhs(eta);

        let distance_event = |_t: f64, y: &[f64]| surface.distance_from(y[0], y[1]);
        let events = [EventSpec {
            g: &distance_event,
            terminal: true,
            direction: Direction::Falling,
        }];

        let (x0, y0) = start;
        let outcome = integrate(rhs, (0.0, FLIGHT_T_END), &[x0, y0, vx0, vy0], &events, &OdeOptions::default())?;

        let ts = outcome.ts.clone();
        let xs: Vec<f64> = outcome.ys.iter().map(|y| y[0]).collect();
        let ys: Vec<f64> = outcome.ys.iter().map(|y| y[1]).collect();
        let vxs: Vec<f64> = outcome.ys.iter().map(|y| y[2]).collect();
        let vys: Vec<f64> = outcome.ys.iter().map(|y| y[3]).collect();

        let landing = outcome.last_y();
        let landing_state = FlightState {
            x: landing[0],
            y: landing[1],
            vx: landing[2],
            vy: landing[3],
        };

        Ok(FlightOutcome {
            trajectory: Trajectory::new(ts, xs, ys, vxs, vys),
            landing: landing_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flight_apex_never_exceeds_drag_free_bound() {
        let ground = Surface::new(vec![-10.0, 1000.0], vec![-1.0, -1.0]);
        let skier = Skier::default();
        let v0 = 20.0;
        let outcome = skier.fly_to(&ground, (0.0, 0.0), v0 * 0.6, v0 * 0.8).unwrap();
        let bound = v0 * v0 / (2.0 * G);
        assert!(outcome.trajectory.ys().iter().all(|&y| y <= bound + 1e-6));
    }

    #[test]
    fn flight_terminates_on_descent_through_surface() {
        let ground = Surface::new(vec![-10.0, 1000.0], vec![0.0, 0.0]);
        let skier = Skier::default();
        let outcome = skier.fly_to(&ground, (0.0, 1.0), 15.0, 2.0).unwrap();
        assert_abs_diff_eq!(outcome.landing.y, 0.0, epsilon = 1e-3);
        assert!(outcome.landing.vy < 0.0);
    }
}

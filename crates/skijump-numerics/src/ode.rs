//! Adaptive Dormand-Prince RK45 integration with event termination and
//! cubic-Hermite dense output.
//!
//! This is the one piece of shared machinery every surface and skier
//! dynamics routine in the workspace builds on: 1-D slide-on-surface, 2-D
//! fly-to-surface, and the EFH landing surface's backward integration are
//! all expressed as a call into `integrate`.

use crate::NumericError;

/// Which sign transition of an event function counts as a crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Only trigger when `g` goes from negative to positive.
    Rising,
    /// Only trigger when `g` goes from positive to negative.
    Falling,
    /// Trigger on either transition.
    Either,
}

/// An event to watch for during integration: a scalar function of `(t, y)`
/// whose zero crossing is located by bisection on the step's dense
/// (cubic-Hermite) interpolant.
pub struct EventSpec<'a> {
    pub g: &'a dyn Fn(f64, &[f64]) -> f64,
    pub terminal: bool,
    pub direction: Direction,
}

/// Integration tolerances and safety limits.
#[derive(Clone, Copy, Debug)]
pub struct OdeOptions {
    pub rel_tol: f64,
    pub abs_tol: f64,
    pub max_steps: usize,
    /// Absolute floor on the step size; stepping below this raises
    /// `NumericError::Integration`.
    pub min_step: f64,
}

impl Default for OdeOptions {
    fn default() -> Self {
        OdeOptions {
            rel_tol: 1e-6,
            abs_tol: 1e-9,
            max_steps: 1_000_000,
            min_step: 1e-12,
        }
    }
}

/// Which event fired, and where.
#[derive(Clone, Debug)]
pub struct EventHit {
    pub index: usize,
    pub t: f64,
    pub y: Vec<f64>,
}

/// The accepted-step trajectory (not necessarily evenly spaced — this is
/// the integrator's natural adaptive grid) plus an optional terminal event.
#[derive(Clone, Debug)]
pub struct IntegrationOutcome {
    pub ts: Vec<f64>,
    pub ys: Vec<Vec<f64>>,
    pub event: Option<EventHit>,
}

impl IntegrationOutcome {
    pub fn last_y(&self) -> &[f64] {
        self.ys.last().expect("integration always records the initial state")
    }

    pub fn last_t(&self) -> f64 {
        *self.ts.last().expect("integration always records the initial state")
    }
}

// Dormand-Prince RK45(4) Butcher tableau.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];
#[rustfmt::skip]
const A: [[f64; 6]; 6] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0, 0.0, 0.0],
    [9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0, 0.0],
    [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
];
const B5: [f64; 7] = [35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0, 0.0];
const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

fn axpy(out: &mut [f64], a: f64, x: &[f64]) {
    for (o, &xi) in out.iter_mut().zip(x) {
        *o += a * xi;
    }
}

/// A single Dormand-Prince step from `(t, y)` of size `h`, reusing `f0 =
/// f(t, y)` (FSAL: the caller already has this from the previous step's
/// last stage). Returns `(y5, y4, k7)` where `k7 = f(t+h, y5)` becomes the
/// next step's `f0`.
fn dp_step(
    f: &impl Fn(f64, &[f64]) -> Vec<f64>,
    t: f64,
    y: &[f64],
    f0: &[f64],
    h: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut k: Vec<Vec<f64>> = Vec::with_capacity(7);
    k.push(f0.to_vec());

    for stage in 1..7 {
        let mut yi = y.to_vec();
        for (j, kj) in k.iter().enumerate().take(stage) {
            axpy(&mut yi, h * A[stage - 1][j], kj);
        }
        let ti = t + C[stage] * h;
        k.push(f(ti, &yi));
    }

    let mut y5 = y.to_vec();
    let mut y4 = y.to_vec();
    for i in 0..7 {
        if B5[i] != 0.0 {
            axpy(&mut y5, h * B5[i], &k[i]);
        }
        if B4[i] != 0.0 {
            axpy(&mut y4, h * B4[i], &k[i]);
        }
    }
    (y5, y4, k[6].clone())
}

fn error_norm(y_high: &[f64], y_low: &[f64], y_prev: &[f64], opts: &OdeOptions) -> f64 {
    let mut acc = 0.0;
    for i in 0..y_high.len() {
        let scale = opts.abs_tol + opts.rel_tol * y_high[i].abs().max(y_prev[i].abs());
        let e = (y_high[i] - y_low[i]) / scale.max(1e-300);
        acc += e * e;
    }
    (acc / y_high.len() as f64).sqrt()
}

/// Cubic-Hermite dense output within an accepted step, used only to locate
/// events: given the endpoints `(t0,y0,f0)` and `(t1,y1,f1)` of a step,
/// evaluate the interpolant at `t0 + theta*(t1-t0)` for `theta in [0,1]`.
fn hermite_eval(y0: &[f64], f0: &[f64], y1: &[f64], f1: &[f64], h: f64, theta: f64) -> Vec<f64> {
    let h00 = (1.0 + 2.0 * theta) * (1.0 - theta).powi(2);
    let h10 = theta * (1.0 - theta).powi(2);
    let h01 = theta * theta * (3.0 - 2.0 * theta);
    let h11 = theta * theta * (theta - 1.0);
    (0..y0.len())
        .map(|i| h00 * y0[i] + h10 * h * f0[i] + h01 * y1[i] + h11 * h * f1[i])
        .collect()
}

/// Scan an accepted step for a sign change of event `idx`, refining the
/// crossing by bisection on the Hermite dense-output interpolant. If the
/// coarse endpoint check shows no sign change but a double crossing is
/// suspected (two roots inside one step), subdivide into `SCAN_POINTS`
/// sub-intervals and retry — matching the "retry with a refined step if two
/// zero crossings straddle a single step" guidance for ill-conditioned
/// grazing events.
const SCAN_POINTS: usize = 16;

fn locate_event_in_step(
    event: &EventSpec,
    t0: f64,
    y0: &[f64],
    f0: &[f64],
    t1: f64,
    y1: &[f64],
    f1: &[f64],
) -> Option<(f64, Vec<f64>)> {
    let h = t1 - t0;
    let eval = |theta: f64| -> (f64, Vec<f64>) {
        let y = hermite_eval(y0, f0, y1, f1, h, theta);
        let t = t0 + theta * h;
        let g = (event.g)(t, &y);
        (g, y)
    };

    let mut thetas = Vec::with_capacity(SCAN_POINTS + 1);
    for i in 0..=SCAN_POINTS {
        thetas.push(i as f64 / SCAN_POINTS as f64);
    }

    for w in thetas.windows(2) {
        let (ga, _) = eval(w[0]);
        let (gb, _yb) = eval(w[1]);
        if ga == 0.0 {
            if direction_matches(event.direction, ga, gb) || w[0] == 0.0 {
                return Some((t0 + w[0] * h, hermite_eval(y0, f0, y1, f1, h, w[0])));
            }
            continue;
        }
        if ga.signum() != gb.signum() && direction_matches(event.direction, ga, gb) {
            let mut lo = w[0];
            let mut hi = w[1];
            let mut glo = ga;
            for _ in 0..60 {
                let mid = 0.5 * (lo + hi);
                let (gm, ym) = eval(mid);
                if gm.abs() < 1e-10 {
                    return Some((t0 + mid * h, ym));
                }
                if gm.signum() == glo.signum() {
                    lo = mid;
                    glo = gm;
                } else {
                    hi = mid;
                }
            }
            let mid = 0.5 * (lo + hi);
            return Some((t0 + mid * h, hermite_eval(y0, f0, y1, f1, h, mid)));
        }
    }
    None
}

fn direction_matches(dir: Direction, g_before: f64, g_after: f64) -> bool {
    match dir {
        Direction::Either => true,
        Direction::Rising => g_before < g_after,
        Direction::Falling => g_before > g_after,
    }
}

/// Integrate `y' = f(t, y)` from `t_span.0` to `t_span.1` starting at `y0`,
/// with adaptive Dormand-Prince RK45 step control and optional terminal
/// event location.
pub fn integrate(
    f: impl Fn(f64, &[f64]) -> Vec<f64>,
    t_span: (f64, f64),
    y0: &[f64],
    events: &[EventSpec],
    opts: &OdeOptions,
) -> Result<IntegrationOutcome, NumericError> {
    let (t_start, t_end) = t_span;
    let mut t = t_start;
    let mut y = y0.to_vec();
    let mut f0 = f(t, &y);

    let mut ts = vec![t];
    let mut ys = vec![y.clone()];

    let mut g_prev: Vec<f64> = events.iter().map(|e| (e.g)(t, &y)).collect();

    let span = (t_end - t_start).abs().max(1e-12);
    let mut h = (span / 100.0).min(span).max(opts.min_step);
    if t_end < t_start {
        h = -h;
    }

    let safety = 0.9;
    let min_factor = 0.2;
    let max_factor = 5.0;
    let order = 5.0;

    let mut steps = 0usize;

    while (h > 0.0 && t < t_end) || (h < 0.0 && t > t_end) {
        if steps >= opts.max_steps {
            return Err(NumericError::Integration { t });
        }
        steps += 1;

        if h.abs() < opts.min_step {
            return Err(NumericError::Integration { t });
        }

        // Do not overshoot the requested span.
        if (h > 0.0 && t + h > t_end) || (h < 0.0 && t + h < t_end) {
            h = t_end - t;
        }

        let (y5, y4, f_next) = dp_step(&f, t, &y, &f0, h);
        let err = error_norm(&y5, &y4, &y, opts);

        if err <= 1.0 || h.abs() <= opts.min_step * 1.0001 {
            let t_new = t + h;

            // Check each event for a crossing within this accepted step.
            let mut hit: Option<EventHit> = None;
            for (idx, event) in events.iter().enumerate() {
                let g_new = (event.g)(t_new, &y5);
                if g_prev[idx].signum() != g_new.signum()
                    && direction_matches(event.direction, g_prev[idx], g_new)
                {
                    if let Some((t_e, y_e)) =
                        locate_event_in_step(event, t, &y, &f0, t_new, &y5, &f_next)
                    {
                        hit = Some(EventHit { index: idx, t: t_e, y: y_e });
                        break;
                    }
                }
                g_prev[idx] = g_new;
            }

            if let Some(hit) = hit {
                let terminal = events[hit.index].terminal;
                ts.push(hit.t);
                ys.push(hit.y.clone());
                if terminal {
                    return Ok(IntegrationOutcome { ts, ys, event: Some(hit) });
                }
                t = t_new;
                y = y5;
                f0 = f_next;
                ts.push(t);
                ys.push(y.clone());
            } else {
                t = t_new;
                y = y5;
                f0 = f_next;
                ts.push(t);
                ys.push(y.clone());
            }

            let factor = (safety * (1.0 / err.max(1e-12)).powf(1.0 / order))
                .clamp(min_factor, max_factor);
            h *= factor;
        } else {
            let factor = (safety * (1.0 / err).powf(1.0 / order)).clamp(min_factor, max_factor);
            h *= factor;
        }
    }

    if events.iter().any(|e| e.terminal) {
        return Err(NumericError::NoEvent { t_end });
    }

    Ok(IntegrationOutcome { ts, ys, event: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn integrates_exponential_decay() {
        let outcome = integrate(
            |_t, y| vec![-y[0]],
            (0.0, 5.0),
            &[1.0],
            &[],
            &OdeOptions::default(),
        )
        .unwrap();
        let y_final = outcome.last_y()[0];
        assert_abs_diff_eq!(y_final, (-5.0f64).exp(), epsilon = 1e-5);
    }

    #[test]
    fn locates_terminal_event() {
        // y' = 1 (i.e. y = t), event at y = 3.
        let event_fn = |_t: f64, y: &[f64]| y[0] - 3.0;
        let events = [EventSpec {
            g: &event_fn,
            terminal: true,
            direction: Direction::Rising,
        }];
        let outcome = integrate(
            |_t, _y| vec![1.0],
            (0.0, 100.0),
            &[0.0],
            &events,
            &OdeOptions::default(),
        )
        .unwrap();
        assert!(outcome.event.is_some());
        assert_abs_diff_eq!(outcome.last_t(), 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.last_y()[0], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn no_event_raises_no_event_error() {
        let event_fn = |_t: f64, y: &[f64]| y[0] - 1000.0;
        let events = [EventSpec {
            g: &event_fn,
            terminal: true,
            direction: Direction::Rising,
        }];
        let result = integrate(
            |_t, _y| vec![1.0],
            (0.0, 1.0),
            &[0.0],
            &events,
            &OdeOptions::default(),
        );
        assert!(matches!(result, Err(NumericError::NoEvent { .. })));
    }
}

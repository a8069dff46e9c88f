//! The common sampled-curve API shared by every surface specialization in
//! this crate.

use std::cell::RefCell;

use skijump_numerics::{brent_minimize, CubicSpline};

/// An ordered sequence of sample points `(x_i, y_i)` with `x_i` strictly
/// increasing, exposing a cubic-spline interpolant, derivatives, curvature,
/// signed distance, arc length and area quadrature, and a rigid coordinate
/// shift.
///
/// Constructed immutable except for `shift`, which translates every sample
/// in place and invalidates the cached spline — see the reference design's
/// note on interpolator lifetime: lazily building and caching the spline
/// (rather than recomputing it on every query) is the better fit here since
/// `interp_y`/`slope_at`/`curvature_at` are called from tight inner loops
/// (the ODE integrator evaluates them every step).
#[derive(Debug)]
pub struct Surface {
    xs: Vec<f64>,
    ys: Vec<f64>,
    spline: RefCell<Option<CubicSpline>>,
}

impl Clone for Surface {
    fn clone(&self) -> Self {
        Surface {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
            // Don't clone the cache; cheap to rebuild lazily on first use.
            spline: RefCell::new(None),
        }
    }
}

impl Surface {
    /// Build a surface from samples. Panics if fewer than 2 points are
    /// given or `xs` is not strictly increasing — both are constructor
    /// invariants, not runtime conditions a caller can recover from.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        assert!(xs.len() >= 2, "a surface needs at least 2 samples");
        assert_eq!(xs.len(), ys.len(), "xs and ys must have the same length");
        assert!(
            xs.windows(2).all(|w| w[1] > w[0]),
            "surface samples must be strictly increasing in x"
        );
        Surface {
            xs,
            ys,
            spline: RefCell::new(None),
        }
    }

    fn with_spline<R>(&self, f: impl FnOnce(&CubicSpline) -> R) -> R {
        if self.spline.borrow().is_none() {
            let spline = CubicSpline::new(&self.xs, &self.ys);
            *self.spline.borrow_mut() = Some(spline);
        }
        let borrowed = self.spline.borrow();
        f(borrowed.as_ref().expect("just populated"))
    }

    /// Raw x samples, in increasing order.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Raw y samples, aligned with `xs()`.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn num_samples(&self) -> usize {
        self.xs.len()
    }

    /// Cubic-spline value at `x`; linearly extrapolated outside
    /// `[x_min, x_max]`.
    pub fn interp_y(&self, x: f64) -> f64 {
        self.with_spline(|s| s.eval(x))
    }

    /// `dy/dx` at `x`, from the spline derivative.
    pub fn slope_at(&self, x: f64) -> f64 {
        self.with_spline(|s| s.eval_deriv(x))
    }

    /// Signed curvature `y'' / (1 + y'^2)^{3/2}` at `x`.
    pub fn curvature_at(&self, x: f64) -> f64 {
        self.with_spline(|s| {
            let yp = s.eval_deriv(x);
            let ypp = s.eval_deriv2(x);
            ypp / (1.0 + yp * yp).powf(1.5)
        })
    }

    /// Euclidean distance from `(px, py)` to the curve, signed positive
    /// above the curve (in the direction of its upward normal).
    ///
    /// Found by minimizing squared distance to `(x, interp_y(x))` over `x`
    /// with Brent's method, bracketed around (and a couple of segments
    /// past) the sample nearest to `px`, then signing the result by which
    /// side of the local tangent `(px, py)` falls on.
    pub fn distance_from(&self, px: f64, py: f64) -> f64 {
        let lo = (self.x_min()).min(px - (self.x_max() - self.x_min()).max(1.0));
        let hi = (self.x_max()).max(px + (self.x_max() - self.x_min()).max(1.0));

        let sq_dist = |x: f64| {
            let dx = x - px;
            let dy = self.interp_y(x) - py;
            dx * dx + dy * dy
        };
        let (x_star, sq) = brent_minimize(sq_dist, lo, hi, 1e-10, 200);
        let dist = sq.max(0.0).sqrt();

        let slope = self.slope_at(x_star);
        let y_star = self.interp_y(x_star);
        // Upward normal to the tangent (1, slope) is (-slope, 1).
        let sign = (-slope) * (px - x_star) + 1.0 * (py - y_star);
        if sign >= 0.0 {
            dist
        } else {
            -dist
        }
    }

    /// `∫ y dx` between `x_start` and `x_end` (defaulting to the full
    /// sample range), via composite Simpson's rule over the spline.
    pub fn area_under(&self, x_start: Option<f64>, x_end: Option<f64>) -> f64 {
        let a = x_start.unwrap_or_else(|| self.x_min());
        let b = x_end.unwrap_or_else(|| self.x_max());
        simpson_integrate(|x| self.interp_y(x), a, b, 2000)
    }

    /// `∫ √(1 + y'^2) dx` over the full sample range.
    pub fn length(&self) -> f64 {
        let a = self.x_min();
        let b = self.x_max();
        simpson_integrate(|x| (1.0 + self.slope_at(x).powi(2)).sqrt(), a, b, 2000)
    }

    /// Rigidly translate every sample by `(dx, dy)`, invalidating the
    /// cached spline.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        for x in &mut self.xs {
            *x += dx;
        }
        for y in &mut self.ys {
            *y += dy;
        }
        *self.spline.borrow_mut() = None;
    }

    pub fn start(&self) -> (f64, f64) {
        (self.xs[0], self.ys[0])
    }

    pub fn end(&self) -> (f64, f64) {
        let n = self.xs.len();
        (self.xs[n - 1], self.ys[n - 1])
    }

    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    pub fn x_max(&self) -> f64 {
        *self.xs.last().expect("non-empty by construction")
    }
}

/// Composite Simpson's rule over `n` (forced even) panels.
pub(crate) fn simpson_integrate(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        sum += if i % 2 == 0 { 2.0 * f(x) } else { 4.0 * f(x) };
    }
    sum * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line(slope: f64, intercept: f64, n: usize, x_max: f64) -> Surface {
        let xs: Vec<f64> = (0..n).map(|i| i as f64 * x_max / (n - 1) as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| slope * x + intercept).collect();
        Surface::new(xs, ys)
    }

    #[test]
    fn distance_from_is_zero_on_curve() {
        let s = line(0.5, 1.0, 20, 10.0);
        let d = s.distance_from(4.0, 0.5 * 4.0 + 1.0);
        assert_abs_diff_eq!(d, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn distance_from_sign_matches_side() {
        let s = line(0.0, 0.0, 10, 10.0);
        assert!(s.distance_from(5.0, 1.0) > 0.0);
        assert!(s.distance_from(5.0, -1.0) < 0.0);
    }

    #[test]
    fn area_under_is_linear_in_y() {
        let xs: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();
        let y1: Vec<f64> = xs.iter().map(|&x| x.sin()).collect();
        let y2: Vec<f64> = xs.iter().map(|&x| x * x).collect();
        let combo: Vec<f64> = y1.iter().zip(&y2).map(|(&a, &b)| 2.0 * a + 3.0 * b).collect();

        let s1 = Surface::new(xs.clone(), y1);
        let s2 = Surface::new(xs.clone(), y2);
        let s3 = Surface::new(xs, combo);

        let lhs = s3.area_under(None, None);
        let rhs = 2.0 * s1.area_under(None, None) + 3.0 * s2.area_under(None, None);
        assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-6);
    }

    #[test]
    fn shift_then_inverse_shift_is_identity() {
        let mut s = line(0.3, -2.0, 10, 5.0);
        let before_start = s.start();
        s.shift(1.5, -0.75);
        s.shift(-1.5, 0.75);
        let after_start = s.start();
        assert_abs_diff_eq!(before_start.0, after_start.0, epsilon = 1e-9);
        assert_abs_diff_eq!(before_start.1, after_start.1, epsilon = 1e-9);
    }

    #[test]
    fn flat_surface_has_zero_curvature() {
        let s = line(0.4, 0.0, 10, 5.0);
        assert_abs_diff_eq!(s.curvature_at(2.0), 0.0, epsilon = 1e-6);
    }
}

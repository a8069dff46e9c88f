//! Natural cubic spline interpolation with linear extrapolation outside
//! the sample range.

/// A natural cubic spline built from strictly increasing `x` samples.
///
/// Evaluation outside `[x[0], x[n-1]]` falls back to linear extrapolation
/// using the boundary segment's slope, matching the reference design's
/// `interp1d(..., fill_value='extrapolate')` behavior without the
/// pathological curvature a cubic extrapolation would introduce.
#[derive(Clone, Debug)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot, from the natural (`y''=0` at the
    /// ends) tridiagonal solve.
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Build a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// Requires at least 2 points and strictly increasing `xs`.
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        assert!(xs.len() >= 2, "need at least 2 points for interpolation");
        assert_eq!(xs.len(), ys.len(), "xs and ys must have the same length");
        debug_assert!(
            xs.windows(2).all(|w| w[1] > w[0]),
            "xs must be strictly increasing"
        );

        let n = xs.len();
        let y2 = if n == 2 {
            vec![0.0, 0.0]
        } else {
            natural_second_derivatives(xs, ys)
        };

        CubicSpline {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            y2,
        }
    }

    /// Number of knots.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    pub fn x_max(&self) -> f64 {
        *self.xs.last().unwrap()
    }

    /// Locate the segment index `i` such that `xs[i] <= x <= xs[i+1]`,
    /// clamped to the valid range for in-range `x`.
    fn locate(&self, x: f64) -> usize {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return 0;
        }
        if x >= self.xs[n - 1] {
            return n - 2;
        }
        let mut lo = 0usize;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] <= x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Evaluate the spline at `x`, linearly extrapolating outside range.
    pub fn eval(&self, x: f64) -> f64 {
        if x < self.x_min() {
            return self.ys[0] + self.slope_at_knot(0) * (x - self.xs[0]);
        }
        if x > self.x_max() {
            let n = self.xs.len();
            return self.ys[n - 1] + self.slope_at_knot(n - 1) * (x - self.xs[n - 1]);
        }
        let i = self.locate(x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a.powi(3) - a) * self.y2[i] + (b.powi(3) - b) * self.y2[i + 1]) * (h * h) / 6.0
    }

    /// First derivative `dy/dx` at `x`, linearly extrapolated outside range
    /// (i.e. constant, equal to the boundary segment's slope).
    pub fn eval_deriv(&self, x: f64) -> f64 {
        if x < self.x_min() {
            return self.slope_at_knot(0);
        }
        if x > self.x_max() {
            let n = self.xs.len();
            return self.slope_at_knot(n - 1);
        }
        let i = self.locate(x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (self.ys[i + 1] - self.ys[i]) / h
            - (3.0 * a * a - 1.0) / 6.0 * h * self.y2[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2[i + 1]
    }

    /// Second derivative `d2y/dx2` at `x`; zero outside the sample range
    /// (consistent with linear extrapolation).
    pub fn eval_deriv2(&self, x: f64) -> f64 {
        if x < self.x_min() || x > self.x_max() {
            return 0.0;
        }
        let i = self.locate(x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.y2[i] + b * self.y2[i + 1]
    }

    /// The spline's slope at knot `i`, used for linear extrapolation past
    /// either end.
    fn slope_at_knot(&self, knot: usize) -> f64 {
        let n = self.xs.len();
        let i = knot.min(n - 2);
        self.eval_deriv_in_range(self.xs[knot], i)
    }

    /// Internal: evaluate the derivative using segment `i` (clamped to a
    /// valid segment index), bypassing the extrapolation branch in
    /// `eval_deriv` to avoid infinite recursion at the boundary knots.
    fn eval_deriv_in_range(&self, x: f64, knot: usize) -> f64 {
        let n = self.xs.len();
        let i = knot.min(n - 2);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (self.ys[i + 1] - self.ys[i]) / h
            - (3.0 * a * a - 1.0) / 6.0 * h * self.y2[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2[i + 1]
    }
}

/// Solve the standard natural-cubic-spline tridiagonal system for the
/// second derivatives at each knot, via the Thomas algorithm.
fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut h = vec![0.0; n - 1];
    for i in 0..n - 1 {
        h[i] = xs[i + 1] - xs[i];
    }

    // Tridiagonal system for interior knots: sub[i], diag[i], sup[i], rhs[i]
    let mut sub = vec![0.0; n];
    let mut diag = vec![1.0; n];
    let mut sup = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    for i in 1..n - 1 {
        sub[i] = h[i - 1];
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        sup[i] = h[i];
        rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }
    // Natural boundary conditions: y2[0] = y2[n-1] = 0.
    diag[0] = 1.0;
    sup[0] = 0.0;
    rhs[0] = 0.0;
    diag[n - 1] = 1.0;
    sub[n - 1] = 0.0;
    rhs[n - 1] = 0.0;

    thomas_solve(&sub, &diag, &sup, &rhs)
}

/// Thomas algorithm for a tridiagonal linear system `A y = rhs`.
fn thomas_solve(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    c_prime[0] = sup[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n {
        let m = diag[i] - sub[i] * c_prime[i - 1];
        c_prime[i] = sup[i] / m;
        d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / m;
    }

    let mut y = vec![0.0; n];
    y[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        y[i] = d_prime[i] - c_prime[i] * y[i + 1];
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reproduces_linear_data_exactly() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| 2.0 * x + 1.0).collect();
        let spline = CubicSpline::new(&xs, &ys);
        for &x in &[0.5, 3.3, 8.9] {
            assert_abs_diff_eq!(spline.eval(x), 2.0 * x + 1.0, epsilon = 1e-8);
            assert_abs_diff_eq!(spline.eval_deriv(x), 2.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn extrapolates_linearly_outside_range() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 4.0, 9.0]; // roughly x^2
        let spline = CubicSpline::new(&xs, &ys);
        let slope_end = spline.eval_deriv(3.0);
        let y_at_3 = spline.eval(3.0);
        assert_abs_diff_eq!(spline.eval(4.0), y_at_3 + slope_end, epsilon = 1e-8);
        assert_abs_diff_eq!(spline.eval(-1.0), spline.eval(0.0) - spline.eval_deriv(0.0), epsilon = 1e-8);
    }

    #[test]
    fn interpolates_constant_curve() {
        let xs: Vec<f64> = (0..5).map(|i| i as f64 * 2.0).collect();
        let ys = vec![1.0; 5];
        let spline = CubicSpline::new(&xs, &ys);
        assert_abs_diff_eq!(spline.eval(3.21), 1.0, epsilon = 1e-10);
    }
}

//! Bracketed bisection root finding.

use crate::NumericError;

/// Default absolute tolerance on the bracket width.
pub const DEFAULT_TOL: f64 = 1e-6;

/// Find a root of `f` within `[a, b]`, requiring `f(a) * f(b) < 0`.
///
/// Returns once the bracket width is below `tol`. Bisection never
/// diverges and never needs a derivative, at the cost of linear
/// convergence — acceptable here since every caller in this workspace
/// evaluates `f` on cheap scalar geometry, not a full trajectory
/// integration, per call.
pub fn bisect(
    f: impl Fn(f64) -> f64,
    mut a: f64,
    mut b: f64,
    tol: f64,
) -> Result<f64, NumericError> {
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(NumericError::Bracket { a, b, fa, fb });
    }

    let max_iter = 200;
    for _ in 0..max_iter {
        if (b - a).abs() < tol {
            break;
        }
        let mid = 0.5 * (a + b);
        let fm = f(mid);
        if fm == 0.0 {
            return Ok(mid);
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
    Ok(0.5 * (a + b))
}

/// `bisect` with the kernel's default tolerance.
pub fn bisect_default(f: impl Fn(f64) -> f64, a: f64, b: f64) -> Result<f64, NumericError> {
    bisect(f, a, b, DEFAULT_TOL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_sqrt_two() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 1e-10).unwrap();
        assert_abs_diff_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-8);
    }

    #[test]
    fn rejects_non_bracketing_interval() {
        let result = bisect(|x| x * x + 1.0, -1.0, 1.0, 1e-6);
        assert!(matches!(result, Err(NumericError::Bracket { .. })));
    }
}

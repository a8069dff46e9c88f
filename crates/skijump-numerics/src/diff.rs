//! Numeric differentiation of sampled curves.
//!
//! Used where a quick discrete derivative of raw samples is wanted ahead of
//! (or instead of) building a full `CubicSpline` — e.g. to report the raw
//! slope/angle of a newly generated clothoid-circle curve before it is
//! handed to the `Surface` machinery, mirroring the reference design's use
//! of `np.diff(Y) / np.diff(X)` when it first assembles a takeoff curve.

/// Forward difference `dy/dx` between consecutive samples.
///
/// Returns `n - 1` values for `n` input samples; the caller decides how to
/// align these with the original `x` samples (the reference design prepends
/// a zero to keep the arrays the same length).
pub fn forward_difference(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    assert_eq!(xs.len(), ys.len());
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(xw, yw)| (yw[1] - yw[0]) / (xw[1] - xw[0]))
        .collect()
}

/// Central difference `dy/dx` sampled at each interior point, with
/// one-sided differences at the two endpoints. Returns `n` values for `n`
/// input samples, already aligned with `xs`.
pub fn central_difference(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    assert!(n >= 2, "need at least 2 points to differentiate");

    let mut out = Vec::with_capacity(n);
    out.push((ys[1] - ys[0]) / (xs[1] - xs[0]));
    for i in 1..n - 1 {
        out.push((ys[i + 1] - ys[i - 1]) / (xs[i + 1] - xs[i - 1]));
    }
    out.push((ys[n - 1] - ys[n - 2]) / (xs[n - 1] - xs[n - 2]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn central_difference_of_linear_is_exact() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| 3.0 * x - 2.0).collect();
        for d in central_difference(&xs, &ys) {
            assert_abs_diff_eq!(d, 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn forward_difference_length_is_n_minus_one() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 4.0, 9.0];
        assert_eq!(forward_difference(&xs, &ys).len(), 3);
    }
}

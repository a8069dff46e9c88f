//! A straight surface segment — the approach runway and the flat ramp
//! appended to the end of the takeoff transition.

use std::ops::{Deref, DerefMut};

use crate::surface::Surface;

/// A straight segment from `init_pos` of given arc length and signed angle
/// `theta` (negative = descending), sampled uniformly in arc length.
#[derive(Debug, Clone)]
pub struct FlatSurface {
    surface: Surface,
}

impl FlatSurface {
    /// `n` defaults to enough samples for the spline/quadrature machinery
    /// to treat the segment as effectively exact; 50 matches the density
    /// used elsewhere in this crate for analytically straight segments.
    pub fn new(init_pos: (f64, f64), length: f64, theta_rad: f64) -> Self {
        Self::with_samples(init_pos, length, theta_rad, 50)
    }

    pub fn with_samples(init_pos: (f64, f64), length: f64, theta_rad: f64, n: usize) -> Self {
        assert!(length > 0.0, "flat surface length must be positive");
        assert!(n >= 2, "a surface needs at least 2 samples");

        let (x0, y0) = init_pos;
        let cos_t = theta_rad.cos();
        let sin_t = theta_rad.sin();

        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for i in 0..n {
            let s = length * i as f64 / (n - 1) as f64;
            xs.push(x0 + s * cos_t);
            ys.push(y0 + s * sin_t);
        }

        FlatSurface {
            surface: Surface::new(xs, ys),
        }
    }
}

impl Deref for FlatSurface {
    type Target = Surface;
    fn deref(&self) -> &Surface {
        &self.surface
    }
}

impl DerefMut for FlatSurface {
    fn deref_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn slope_matches_requested_angle() {
        let theta = -0.2;
        let s = FlatSurface::new((0.0, 10.0), 20.0, theta);
        assert_abs_diff_eq!(s.slope_at(5.0), theta.tan(), epsilon = 1e-6);
        assert_abs_diff_eq!(s.curvature_at(5.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn endpoints_match_length_and_angle() {
        let theta: f64 = 0.15;
        let s = FlatSurface::new((1.0, 1.0), 10.0, theta);
        let (x1, y1) = s.end();
        assert_abs_diff_eq!(x1, 1.0 + 10.0 * theta.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(y1, 1.0 + 10.0 * theta.sin(), epsilon = 1e-6);
    }
}

//! The equivalent-fall-height (EFH) landing surface.
//!
//! This module holds only the resulting curve's type. The construction
//! algorithm — backward integration of `dy/dx = tan(alpha_s - alpha_v)`
//! from the landing-transition start toward the takeoff — depends on
//! skier flight dynamics (`invert_fly`/`fly_to`) and therefore lives in
//! the composer crate, which hands the finished sample arrays here.

use std::ops::{Deref, DerefMut};

use crate::surface::Surface;

/// The EFH curve from the takeoff lip (`start`) to the landing-transition
/// start (`end`), guaranteeing a bounded equivalent fall height for any
/// skier taking off at or below the design speed.
#[derive(Debug, Clone)]
pub struct LandingSurface {
    surface: Surface,
}

impl LandingSurface {
    /// `xs`/`ys` must already be ordered from the takeoff end to the
    /// landing-transition end (strictly increasing `x`), as produced by
    /// reversing the composer's backward integration.
    pub fn from_samples(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        LandingSurface {
            surface: Surface::new(xs, ys),
        }
    }

    /// `true` when every sample lies at or above the parent slope's line
    /// `y = c*x + d`, within `tol` — the EFH post-condition from the spec.
    pub fn lies_above(&self, parent_c: f64, parent_d: f64, tol: f64) -> bool {
        self.xs()
            .iter()
            .zip(self.ys())
            .all(|(&x, &y)| y >= parent_c * x + parent_d - tol)
    }
}

impl Deref for LandingSurface {
    type Target = Surface;
    fn deref(&self) -> &Surface {
        &self.surface
    }
}

impl DerefMut for LandingSurface {
    fn deref_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lies_above_detects_violation() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, -0.5, -1.0, -1.4];
        let surf = LandingSurface::from_samples(xs, ys);
        assert!(surf.lies_above(-0.5, 0.0, 1e-6));
        assert!(!surf.lies_above(-0.1, 0.0, 1e-6));
    }

    #[test]
    fn start_and_end_are_first_and_last_samples() {
        let xs = vec![0.0, 2.0, 4.0];
        let ys = vec![0.0, 1.0, 3.0];
        let surf = LandingSurface::from_samples(xs, ys);
        assert_abs_diff_eq!(surf.start().0, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(surf.end().0, 4.0, epsilon = 1e-12);
    }
}

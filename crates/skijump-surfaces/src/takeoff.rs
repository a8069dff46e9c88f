//! The full takeoff transition: a clothoid-circle curve with a flat ramp
//! appended at its exit angle.

use std::ops::{Deref, DerefMut};

use crate::clothoid::ClothoidCircleSurface;
use crate::flat::FlatSurface;
use crate::surface::Surface;

/// A `ClothoidCircleSurface` followed by a straight ramp at the takeoff
/// angle, long enough for the skier to spend `ramp_time` seconds on it at
/// the speed they carry out of the clothoid segment.
///
/// The ramp length depends on a skier-dynamics quantity (the slide speed at
/// the end of the clothoid) that this crate has no business computing —
/// per the reference design, that speed comes from invoking `Skier::slide`
/// on the clothoid segment first. The composer does that and passes the
/// resulting speed in, keeping this crate free of a dependency on
/// `skijump-skier`.
#[derive(Debug, Clone)]
pub struct TakeoffSurface {
    surface: Surface,
    pub clothoid: ClothoidCircleSurface,
    pub ramp: FlatSurface,
}

impl TakeoffSurface {
    /// `exit_speed` is the skier's speed at the end of `clothoid` (from
    /// sliding the clothoid segment); `ramp_time` is the reference
    /// design's 0.2 s dwell on the flat ramp.
    pub fn from_clothoid(clothoid: ClothoidCircleSurface, exit_speed: f64, ramp_time: f64) -> Self {
        let ramp_length = (exit_speed * ramp_time).max(1e-3);
        let ramp = FlatSurface::new(clothoid.end(), ramp_length, clothoid.beta);

        let mut xs = clothoid.xs().to_vec();
        let mut ys = clothoid.ys().to_vec();
        // Drop the ramp's first sample; it duplicates the clothoid's last.
        xs.extend_from_slice(&ramp.xs()[1..]);
        ys.extend_from_slice(&ramp.ys()[1..]);

        TakeoffSurface {
            surface: Surface::new(xs, ys),
            clothoid,
            ramp,
        }
    }

    /// The takeoff lip: the last sample of the ramp.
    pub fn lip(&self) -> (f64, f64) {
        self.ramp.end()
    }

    /// The exit tangent angle at the lip, equal to the takeoff angle.
    pub fn exit_angle(&self) -> f64 {
        self.clothoid.beta
    }

    /// Rigidly translate the takeoff by `(dx, dy)`.
    ///
    /// Shadows the `Surface::shift` reached via `Deref` — this type keeps
    /// its own copies of the geometry in `clothoid` and `ramp` (so `lip()`
    /// and `exit_angle()` don't need to re-derive them from the flattened
    /// sample array), and all three must move together.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.surface.shift(dx, dy);
        self.clothoid.shift(dx, dy);
        self.ramp.shift(dx, dy);
    }
}

impl Deref for TakeoffSurface {
    type Target = Surface;
    fn deref(&self) -> &Surface {
        &self.surface
    }
}

impl DerefMut for TakeoffSurface {
    fn deref_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lip_sits_at_end_of_ramp() {
        let clothoid = ClothoidCircleSurface::new((0.0, 0.0), 0.05, 0.15, 15.0, 1.5, 9.81, 0.99, 300);
        let clothoid_end = clothoid.end();
        let takeoff = TakeoffSurface::from_clothoid(clothoid, 14.0, 0.2);
        let (lip_x, _) = takeoff.lip();
        assert!(lip_x > clothoid_end.0);
        assert_abs_diff_eq!(takeoff.exit_angle(), 0.15, epsilon = 1e-9);
    }
}

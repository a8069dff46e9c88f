//! The clothoid-circle-clothoid takeoff transition.
//!
//! Grounded directly on the reference design's `generate_takeoff_curve`: a
//! symmetric clothoid-circle-clothoid curve built in a frame where the
//! bottom of the circular arc sits at the origin, then rotated so the
//! entry tangent matches the parent slope and the exit tangent matches the
//! takeoff angle, then translated to the actual entry point.

use std::ops::{Deref, DerefMut};

use crate::surface::Surface;

/// A clothoid-circle-clothoid curve: a short circular arc (fraction
/// `gamma` of the total turn) flanked by two clothoid tails, smoothly
/// carrying the tangent direction from the parent-slope angle to the
/// takeoff angle `beta`.
///
/// `lam` is the turn's entry magnitude, not the signed slope angle: the
/// curve's actual entry tangent comes out to `-lam`, so a descending slope
/// of `-15deg` is passed as `lam = 15deg`. This keeps `lam + beta` — the
/// total angular sweep the circular arc and clothoid tails must cover —
/// positive for every valid takeoff angle, since the only constraint on
/// the inputs is `beta > -lam` (i.e. the takeoff angle exceeds the signed
/// slope angle).
#[derive(Debug, Clone)]
pub struct ClothoidCircleSurface {
    surface: Surface,
    /// Minimum radius of curvature, at the bottom of the circular arc.
    pub radius_min: f64,
    pub lam: f64,
    pub beta: f64,
}

impl ClothoidCircleSurface {
    /// `lam` is the entry turn magnitude (the curve's entry tangent is
    /// `-lam`; see the struct docs) and `beta` is the signed takeoff angle,
    /// both radians; `entry_speed` is the skier's speed entering the
    /// transition; `tolerable_acc` is the takeoff normal-acceleration
    /// ceiling in multiples of `g`; `gamma` is the fraction of the total
    /// angle span that is circular.
    pub fn new(
        init_pos: (f64, f64),
        lam: f64,
        beta: f64,
        entry_speed: f64,
        tolerable_acc: f64,
        g: f64,
        gamma: f64,
        numpoints: usize,
    ) -> Self {
        let radius_min = entry_speed * entry_speed / (tolerable_acc * g);
        let (xs, ys) = takeoff_curve_points(lam, beta, radius_min, gamma, numpoints);

        let (x0, y0) = init_pos;
        let xs: Vec<f64> = xs.into_iter().map(|x| x + x0).collect();
        let ys: Vec<f64> = ys.into_iter().map(|y| y + y0).collect();

        let (xs, ys) = enforce_strictly_increasing(xs, ys);

        ClothoidCircleSurface {
            surface: Surface::new(xs, ys),
            radius_min,
            lam,
            beta,
        }
    }
}

impl Deref for ClothoidCircleSurface {
    type Target = Surface;
    fn deref(&self) -> &Surface {
        &self.surface
    }
}

impl DerefMut for ClothoidCircleSurface {
    fn deref_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Builds the normalized takeoff curve (entry point at the origin) in the
/// same stitching order as the reference design: two Fresnel-series
/// clothoid tails joined to a circular arc, then rotated so tangents match
/// `lam` at entry and `beta` at exit.
fn takeoff_curve_points(lam: f64, beta: f64, radius_min: f64, gamma: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
    let r = radius_min;
    let theta_cir = 0.5 * gamma * (lam + beta);

    let x_cir_st = -r * theta_cir.sin();
    let x_cir_bound = r * theta_cir.sin();
    let x_cir = linspace(x_cir_st, x_cir_bound, n);

    let a_squared = r * r * (1.0 - gamma) * (lam + beta);
    let a = a_squared.sqrt();
    let clothoid_length = a * ((1.0 - gamma) * (lam + beta)).sqrt();

    let s = linspace(clothoid_length, 0.0, n);
    let x1: Vec<f64> = s
        .iter()
        .map(|&s| s - s.powi(5) / (40.0 * a.powi(4)) + s.powi(9) / (3456.0 * a.powi(8)))
        .collect();
    let y1: Vec<f64> = s
        .iter()
        .map(|&s| s.powi(3) / (6.0 * a * a) - s.powi(7) / (336.0 * a.powi(6)) + s.powi(11) / (42240.0 * a.powi(10)))
        .collect();

    let x1_0 = x1[0];
    let y1_0 = y1[0];
    let x2: Vec<f64> = x1.iter().map(|&x| x - x1_0).collect();
    let y2: Vec<f64> = y1.iter().map(|&y| y - y1_0).collect();

    let theta = (lam + beta) / 2.0;
    let (cos_t, sin_t) = (theta.cos(), theta.sin());
    let x3: Vec<f64> = x2.iter().zip(&y2).map(|(&x, &y)| cos_t * x + sin_t * y).collect();
    let y3: Vec<f64> = x2.iter().zip(&y2).map(|(&x, &y)| -sin_t * x + cos_t * y).collect();

    let x4_0 = x3[0];
    let mut x5: Vec<f64> = x3.iter().map(|&x| -x + 2.0 * x4_0).collect();
    let mut y5: Vec<f64> = y3.clone();

    let mut x4: Vec<f64> = x3.iter().map(|&x| x - r * theta_cir.sin()).collect();
    let mut y4: Vec<f64> = y3.iter().map(|&y| y + r * (1.0 - theta_cir.cos())).collect();
    x4.reverse();
    y4.reverse();

    for x in &mut x5 {
        *x += r * theta_cir.sin();
    }
    for y in &mut y5 {
        *y += r * (1.0 - theta_cir.cos());
    }

    // Circular-arc samples split about x = 0, recomputed so the sagitta
    // formula (rather than the linspace value) is exact at every point.
    let x_l_cir: Vec<f64> = x_cir.iter().copied().filter(|&x| x <= 0.0).collect();
    let y_l_cir: Vec<f64> = x_l_cir.iter().map(|&x| r - (r * r - x * x).sqrt()).collect();
    let x_r_cir: Vec<f64> = x_cir.iter().copied().filter(|&x| x >= 0.0).collect();
    let y_r_cir: Vec<f64> = x_r_cir.iter().map(|&x| r - (r * r - x * x).sqrt()).collect();

    if x_l_cir.len() > 2 {
        x4.extend_from_slice(&x_l_cir[1..x_l_cir.len() - 1]);
        y4.extend_from_slice(&y_l_cir[1..y_l_cir.len() - 1]);
    }
    if x_r_cir.len() > 2 {
        x5 = [&x_r_cir[0..x_r_cir.len() - 2], &x5[..]].concat();
        y5 = [&y_r_cir[0..y_r_cir.len() - 2], &y5[..]].concat();
    }

    let rotation_clothoid = (lam - beta) / 2.0;
    let (cos_r, sin_r) = (rotation_clothoid.cos(), rotation_clothoid.sin());
    let x6: Vec<f64> = x4.iter().zip(&y4).map(|(&x, &y)| cos_r * x + sin_r * y).collect();
    let y6: Vec<f64> = x4.iter().zip(&y4).map(|(&x, &y)| -sin_r * x + cos_r * y).collect();
    let x7: Vec<f64> = x5.iter().zip(&y5).map(|(&x, &y)| cos_r * x + sin_r * y).collect();
    let y7: Vec<f64> = x5.iter().zip(&y5).map(|(&x, &y)| -sin_r * x + cos_r * y).collect();

    let mut x: Vec<f64> = x6.into_iter().chain(x7).collect();
    let mut y: Vec<f64> = y6.into_iter().chain(y7).collect();

    let (min_idx, &min_x) = x
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .expect("non-empty curve");
    let y_at_min = y[min_idx];
    for xi in &mut x {
        *xi -= min_x;
    }
    for yi in &mut y {
        *yi -= y_at_min;
    }

    (x, y)
}

/// Sorts by `x` and drops any sample that would violate strict monotonicity
/// (possible at the clothoid/circle stitch seam, where two independently
/// parametrized pieces meet to within floating-point slack).
fn enforce_strictly_increasing(xs: Vec<f64>, ys: Vec<f64>) -> (Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut out_x = Vec::with_capacity(pairs.len());
    let mut out_y = Vec::with_capacity(pairs.len());
    for (x, y) in pairs {
        let keep = match out_x.last() {
            Some(&last) => x > last,
            None => true,
        };
        if keep {
            out_x.push(x);
            out_y.push(y);
        }
    }
    (out_x, out_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn entry_and_exit_tangents_match_requested_angles() {
        // A -15deg slope into a 10deg takeoff: lam is passed as the 15deg
        // magnitude, so the curve's entry tangent comes out as -lam.
        let lam: f64 = 15f64.to_radians();
        let beta: f64 = 10f64.to_radians();
        let curve = ClothoidCircleSurface::new((0.0, 0.0), lam, beta, 20.0, 1.5, 9.81, 0.99, 400);

        let (x0, _) = curve.start();
        let (x1, _) = curve.end();
        let entry_slope = curve.slope_at(x0 + 1e-3 * (x1 - x0));
        let exit_slope = curve.slope_at(x1 - 1e-3 * (x1 - x0));

        assert_abs_diff_eq!(entry_slope.atan(), -lam, epsilon = 2e-2);
        assert_abs_diff_eq!(exit_slope.atan(), beta, epsilon = 2e-2);
    }

    #[test]
    fn samples_are_strictly_increasing_in_x() {
        let curve = ClothoidCircleSurface::new((0.0, 0.0), 0.2, 0.3, 15.0, 1.5, 9.81, 0.99, 300);
        assert!(curve.xs().windows(2).all(|w| w[1] > w[0]));
    }
}

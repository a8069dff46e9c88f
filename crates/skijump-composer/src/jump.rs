//! The composer's single entry point: `make_jump`.
//!
//! Grounded directly on `skijumpdesign/functions.py::make_jump`'s pipeline
//! (validate -> approach -> takeoff -> flight -> landing transition -> EFH
//! landing -> post-conditions), generalized onto this workspace's surface
//! and skier types, with `log` calls at the same points the original logs.

use skijump_core::{SkiJumpError, SkierParams, G};
use skijump_skier::Skier;
use skijump_surfaces::{ClothoidCircleSurface, FlatSurface, LandingSurface, LandingTransitionSurface, TakeoffSurface, Trajectory};

use crate::{efh, landing_transition};

/// Number of samples used for the clothoid-circle-clothoid takeoff curve.
const CLOTHOID_NUMPOINTS: usize = 500;
/// The parent slope surface is built far longer than any jump needs, so the
/// first (full) flight always has somewhere to land on it.
const SLOPE_LENGTH_MULTIPLE: f64 = 100.0;

/// The complete set of surfaces (and the skier's maximum-velocity flight
/// trajectory) that make up a designed ski jump.
#[derive(Debug, Clone)]
pub struct JumpDesign {
    pub parent_slope: FlatSurface,
    pub approach: FlatSurface,
    pub takeoff: TakeoffSurface,
    pub landing: LandingSurface,
    pub landing_transition: LandingTransitionSurface,
    pub flight: Trajectory,
}

/// Design a ski jump given the parent slope angle, the skier's starting
/// position along it, the approach length, the takeoff ramp angle, and the
/// target equivalent fall height — all in degrees/meters per spec section 6.
pub fn make_jump(
    slope_angle_deg: f64,
    start_pos_m: f64,
    approach_len_m: f64,
    takeoff_angle_deg: f64,
    fall_height_m: f64,
) -> Result<JumpDesign, SkiJumpError> {
    log::info!(
        "make_jump({slope_angle_deg}, {start_pos_m}, {approach_len_m}, {takeoff_angle_deg}, {fall_height_m})"
    );

    if takeoff_angle_deg >= 90.0 || takeoff_angle_deg <= slope_angle_deg {
        return Err(SkiJumpError::value(format!(
            "invalid takeoff angle: enter a value between {slope_angle_deg} and 90 degrees"
        )));
    }
    if fall_height_m <= 0.0 {
        return Err(SkiJumpError::invalid_jump("fall height must be positive"));
    }

    let skier = Skier::default();
    let params: SkierParams = skier.params;

    let slope_angle = slope_angle_deg.to_radians();
    let takeoff_angle = takeoff_angle_deg.to_radians();
    let parent_c = slope_angle.tan();
    let parent_d = 0.0;

    let init_pos = (start_pos_m * slope_angle.cos(), start_pos_m * slope_angle.sin());
    let approach = FlatSurface::new(init_pos, approach_len_m, slope_angle);

    let approach_slide = skier.slide_on(&approach, approach.start().0, approach.end().0, 0.0)?;
    if approach_slide.stalled {
        return Err(SkiJumpError::invalid_jump("slow skier"));
    }
    let approach_exit_speed = approach_slide.final_v;

    // `ClothoidCircleSurface::new` takes `lam` as the slope's turn magnitude
    // (its entry tangent comes out as `-lam`), not the signed slope angle;
    // negating here keeps `lam + beta` positive for every valid takeoff
    // angle (`takeoff_angle > slope_angle` is already checked above).
    let clothoid = ClothoidCircleSurface::new(
        approach.end(),
        -slope_angle,
        takeoff_angle,
        approach_exit_speed,
        params.tolerable_acc_takeoff,
        G,
        params.gamma,
        CLOTHOID_NUMPOINTS,
    );

    let clothoid_slide = skier.slide_on(&clothoid, clothoid.start().0, clothoid.end().0, approach_exit_speed)?;
    if clothoid_slide.stalled {
        return Err(SkiJumpError::invalid_jump("slow skier"));
    }
    let clothoid_exit_speed = clothoid_slide.final_v;

    let takeoff = TakeoffSurface::from_clothoid(clothoid, clothoid_exit_speed, params.ramp_time);

    let takeoff_slide = skier.slide_on(&takeoff, takeoff.start().0, takeoff.end().0, approach_exit_speed)?;
    if takeoff_slide.stalled {
        return Err(SkiJumpError::invalid_jump("slow skier"));
    }
    let design_speed = takeoff_slide.final_v;
    log::info!("takeoff design speed: {design_speed:.3} m/s");

    let takeoff_lip = takeoff.lip();

    let big_slope_length = (SLOPE_LENGTH_MULTIPLE * approach_len_m).max(SLOPE_LENGTH_MULTIPLE);
    let big_slope = FlatSurface::new((0.0, 0.0), big_slope_length, slope_angle);

    let flight_outcome = skier
        .fly_to(
            &big_slope,
            takeoff_lip,
            design_speed * takeoff_angle.cos(),
            design_speed * takeoff_angle.sin(),
        )
        .map_err(|_| SkiJumpError::invalid_jump("skier flies forever"))?;
    log::info!("flight time: {:.3} s", flight_outcome.trajectory.t_max() - flight_outcome.trajectory.t_min());

    let tolerable_accel_landing = params.tolerable_acc_landing * G;
    let landing_trans = landing_transition::search(
        &skier,
        &flight_outcome.trajectory,
        parent_c,
        parent_d,
        tolerable_accel_landing,
    )?;

    let landing = efh::build(
        &skier,
        takeoff_lip,
        takeoff_angle,
        landing_trans.start(),
        fall_height_m,
        parent_c,
        parent_d,
    )?;

    let landing_trans_end = landing_trans.end();
    let parent_slope_length = (landing_trans_end.0.powi(2) + landing_trans_end.1.powi(2)).sqrt() + 1.0;
    let parent_slope = FlatSurface::new((0.0, 0.0), parent_slope_length, slope_angle);

    let budget = crate::snow_budget::snow_budget(&parent_slope, &takeoff, &landing, &landing_trans);
    log::info!("snow budget: {budget:.3} m^2");

    Ok(JumpDesign {
        parent_slope,
        approach,
        takeoff,
        landing,
        landing_transition: landing_trans,
        flight: flight_outcome.trajectory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_succeeds_with_exit_tangent_near_takeoff_angle() {
        let design = make_jump(-15.0, 0.0, 30.0, 10.0, 0.5).unwrap();
        let exit_slope = design.takeoff.slope_at(design.takeoff.end().0 - 1e-3);
        assert!((exit_slope.atan().to_degrees() - 10.0).abs() < 1.0);
    }

    #[test]
    fn scenario_2_zero_fall_height_is_invalid() {
        let result = make_jump(-25.0, 0.0, 30.0, 20.0, 0.0);
        assert!(matches!(result, Err(SkiJumpError::InvalidJump(_))));
    }

    #[test]
    fn scenario_3_fall_height_too_large_is_invalid() {
        let result = make_jump(-15.0, 0.0, 30.0, 15.0, 2.7);
        assert!(result.is_err());
    }

    #[test]
    fn scenario_5_slow_skier_is_invalid() {
        let result = make_jump(-30.0, 0.0, 1.0, 45.0, 0.5);
        assert!(matches!(result, Err(SkiJumpError::InvalidJump(_))));
    }

    #[test]
    fn scenario_6_zero_takeoff_angle_succeeds() {
        let result = make_jump(-45.0, 0.0, 30.0, 0.0, 0.2);
        assert!(result.is_ok());
    }

    #[test]
    fn scenario_7_takeoff_angle_at_90_is_a_value_error() {
        let result = make_jump(-15.0, 0.0, 30.0, 90.0, 0.5);
        assert!(matches!(result, Err(SkiJumpError::Value(_))));
    }

    #[test]
    fn regression_nonzero_start_pos_with_shallow_slope() {
        let result = make_jump(-10.0, 10.0, 30.0, 20.0, 0.2);
        assert!(result.is_ok());
    }
}

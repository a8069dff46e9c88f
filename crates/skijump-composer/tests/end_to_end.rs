//! End-to-end coverage of `make_jump` against the seven concrete scenarios
//! and the additional problematic-input regressions called out in
//! SPEC_FULL.md's supplemented-features section.

use skijump_composer::make_jump;
use skijump_core::SkiJumpError;

#[test]
fn scenario_1_moderate_jump_succeeds_with_matching_exit_tangent() {
    let design = make_jump(-15.0, 0.0, 30.0, 10.0, 0.5).expect("scenario 1 should succeed");
    let (x0, _) = design.takeoff.start();
    let (x1, _) = design.takeoff.end();
    let exit_slope = design.takeoff.slope_at(x1 - 1e-3 * (x1 - x0));
    assert!((exit_slope.atan().to_degrees() - 10.0).abs() < 1.0);
    assert!(design.landing.lies_above(
        design.parent_slope.slope_at(0.0),
        0.0,
        1e-6
    ));
}

#[test]
fn scenario_2_zero_fall_height_is_invalid() {
    let result = make_jump(-25.0, 0.0, 30.0, 20.0, 0.0);
    assert!(matches!(result, Err(SkiJumpError::InvalidJump(_))));
}

#[test]
fn scenario_3_excessive_fall_height_is_invalid() {
    let result = make_jump(-15.0, 0.0, 30.0, 15.0, 2.7);
    assert!(result.is_err());
}

#[test]
fn scenario_4_shallow_takeoff_flies_forever() {
    let result = make_jump(-10.0, 0.0, 30.0, 20.0, 1.5);
    assert!(result.is_err());
}

#[test]
fn scenario_5_short_approach_yields_slow_skier() {
    let result = make_jump(-30.0, 0.0, 1.0, 45.0, 0.5);
    assert!(matches!(result, Err(SkiJumpError::InvalidJump(_))));
}

#[test]
fn scenario_6_zero_takeoff_angle_succeeds() {
    let design = make_jump(-45.0, 0.0, 30.0, 0.0, 0.2).expect("scenario 6 should succeed");
    assert!(design.landing_transition.xs().len() >= 2);
}

#[test]
fn scenario_7_takeoff_angle_of_ninety_is_a_value_error() {
    let result = make_jump(-15.0, 0.0, 30.0, 90.0, 0.5);
    assert!(matches!(result, Err(SkiJumpError::Value(_))));
}

#[test]
fn regression_takeoff_angle_below_slope_angle_is_a_value_error() {
    // takeoff_angle <= slope_angle must also be rejected, not just >= 90.
    let result = make_jump(10.0, 0.0, 30.0, 5.0, 0.5);
    assert!(matches!(result, Err(SkiJumpError::Value(_))));
}

#[test]
fn regression_zero_takeoff_angle_with_nonzero_start_pos() {
    // From `test_problematic_jump_parameters`: a flat-exit takeoff combined
    // with a nonzero starting position along the approach slope.
    let result = make_jump(-10.0, 10.0, 30.0, 20.0, 0.2);
    assert!(result.is_ok());
}

#[test]
fn every_surface_can_be_shifted_so_the_takeoff_lip_becomes_the_origin() {
    // From `test_shift_surface_origin`: once a jump has been designed, every
    // returned surface is a plain `Surface` and can be rigidly relocated by
    // a caller without the composer's involvement.
    let mut design = make_jump(-15.0, 0.0, 30.0, 10.0, 0.5).expect("jump should succeed");
    let (lip_x, lip_y) = design.takeoff.lip();

    design.approach.shift(-lip_x, -lip_y);
    design.takeoff.shift(-lip_x, -lip_y);
    design.landing.shift(-lip_x, -lip_y);
    design.landing_transition.shift(-lip_x, -lip_y);
    design.flight.shift(-lip_x, -lip_y);

    let (shifted_lip_x, shifted_lip_y) = design.takeoff.lip();
    assert!(shifted_lip_x.abs() < 1e-6);
    assert!(shifted_lip_y.abs() < 1e-6);
}

#[test]
fn snow_budget_is_nonnegative_for_a_successful_jump() {
    let design = make_jump(-15.0, 0.0, 30.0, 10.0, 0.5).expect("jump should succeed");
    let budget = skijump_composer::snow_budget(
        &design.parent_slope,
        &design.takeoff,
        &design.landing,
        &design.landing_transition,
    );
    assert!(budget >= 0.0);
}

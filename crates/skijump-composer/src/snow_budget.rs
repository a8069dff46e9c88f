//! Snow-budget area: the cross-sectional area of snow needed (or removed)
//! to build the jump, between the parent slope and the combined takeoff /
//! landing / landing-transition surfaces.
//!
//! Grounded directly on `skijumpdesign/functions.py::snow_budget` — same
//! `|A - B|` arithmetic, same log call sites.

use skijump_surfaces::{FlatSurface, LandingSurface, LandingTransitionSurface, TakeoffSurface};

/// Area between the parent slope and the jump's surfaces, from the takeoff
/// start to the landing-transition end. Presentation (plotting, reporting)
/// is out of scope; this returns the scalar only.
pub fn snow_budget(
    parent_slope: &FlatSurface,
    takeoff: &TakeoffSurface,
    landing: &LandingSurface,
    landing_trans: &LandingTransitionSurface,
) -> f64 {
    if takeoff.ys().iter().any(|&y| y > 0.0)
        || landing.ys().iter().any(|&y| y > 0.0)
        || landing_trans.ys().iter().any(|&y| y > 0.0)
    {
        log::warn!("snow budget invalid since jump is above the x axis");
    }

    log::info!("takeoff start x: {}", takeoff.start().0);
    log::info!("landing transition end x: {}", landing_trans.end().0);

    let a = parent_slope.area_under(Some(takeoff.start().0), Some(landing_trans.end().0));
    let b = takeoff.area_under(None, None) + landing.area_under(None, None) + landing_trans.area_under(None, None);

    log::info!("parent slope area: {a}");
    log::info!("takeoff area: {}", takeoff.area_under(None, None));
    log::info!("landing area: {}", landing.area_under(None, None));
    log::info!("landing transition area: {}", landing_trans.area_under(None, None));
    log::info!("B = {b}");

    (a - b).abs()
}

//! skijump-skier
//!
//! Point-mass skier dynamics over an arbitrary `Surface`: sliding with
//! gravity, curvature-induced normal force, Coulomb friction and drag
//! (`slide`); free-flight ballistics with quadratic drag to a target
//! surface (`fly`); and the pure inverse problem of finding the takeoff
//! speed that lands at a given point (`invert`).

#![forbid(unsafe_code)]

pub mod flight;
pub mod invert;
pub mod slide;

use skijump_core::SkierParams;

/// A point-mass skier, parametrized by `SkierParams`, exposing the three
/// dynamics operations over `Surface`s from `skijump-surfaces`.
#[derive(Clone, Copy, Debug)]
pub struct Skier {
    pub params: SkierParams,
}

impl Skier {
    pub fn new(params: SkierParams) -> Self {
        Skier { params }
    }
}

impl Default for Skier {
    fn default() -> Self {
        Skier::new(SkierParams::default())
    }
}

pub use flight::{FlightOutcome, FlightState};
pub use invert::{invert_fly, invert_fly_detailed};
pub use slide::{SlideOutcome, SlideState};

//! skijump-surfaces
//!
//! Sampled planar curves and the specializations used to assemble a ski
//! jump: flat segments, the clothoid-circle takeoff transition, the full
//! takeoff (transition plus ramp), the flight trajectory as a
//! pseudo-surface, the exponential landing-transition curve, and the EFH
//! landing surface.
//!
//! Every type here is pure geometry. Constructions that need skier
//! sliding or flight dynamics (the landing-transition search and the EFH
//! backward integration) live in `skijump-composer`, which builds on the
//! types exposed here.

#![forbid(unsafe_code)]

pub mod clothoid;
pub mod flat;
pub mod landing;
pub mod landing_transition;
pub mod surface;
pub mod takeoff;
pub mod trajectory;

pub use clothoid::ClothoidCircleSurface;
pub use flat::FlatSurface;
pub use landing::LandingSurface;
pub use landing_transition::{ExponentialCurve, LandingTransitionSurface};
pub use surface::Surface;
pub use takeoff::TakeoffSurface;
pub use trajectory::Trajectory;

//! skijump-composer
//!
//! Orchestrates the full ski jump design pipeline on top of
//! `skijump-surfaces` and `skijump-skier`: approach, takeoff construction,
//! skier slide, takeoff speed, flight, landing-transition search, and EFH
//! landing construction. The one crate in the workspace allowed to log
//! (`log::info!`/`log::warn!`), mirroring the reference design's ambient
//! logging in `make_jump`/`snow_budget`.

#![forbid(unsafe_code)]

pub mod efh;
pub mod jump;
pub mod landing_transition;
pub mod snow_budget;

pub use jump::{make_jump, JumpDesign};
pub use snow_budget::snow_budget;

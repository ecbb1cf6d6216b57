//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock reads
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Square, out_of_bounds, overlaps};
pub use state::{Food, GameEvent, GameState, Hazard, Segment, Snake};
pub use tick::{TickInput, tick};

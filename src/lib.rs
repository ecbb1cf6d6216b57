//! Pear Snake - a pointer-steered snake game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `palette`: Time-keyed color cycling
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `highscores`: Best score and leaderboard records
//! - `settings`: Persisted visual preferences
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod palette;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScore, Leaderboard, NamePrompt, Records};
pub use settings::{ColorMode, Settings};
pub use tuning::{HazardSpawn, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one classic display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Canvas dimensions in CSS pixels
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Snake defaults
    pub const SNAKE_SIZE: f32 = 20.0;
    /// Pixels moved per tick
    pub const SNAKE_SPEED: f32 = 2.0;
    pub const SNAKE_START_X: f32 = 10.0;
    pub const SNAKE_START_Y: f32 = 10.0;
    pub const SEGMENTS_PER_FOOD: usize = 3;
    /// Upper bound for a tuned `segments_per_food`
    pub const MAX_SEGMENTS_PER_FOOD: usize = 100;

    /// Food defaults
    pub const FOOD_SIZE: f32 = 15.0;
    pub const FOOD_START_X: f32 = 100.0;
    pub const FOOD_START_Y: f32 = 100.0;
    pub const SCORE_PER_FOOD: u64 = 10;

    /// Hazard defaults
    pub const HAZARD_SIZE: f32 = 20.0;
    /// A hazard is added every time the score reaches a multiple of this
    pub const HAZARD_EVERY: u64 = 100;
    /// First delayed spawn waits this long (ticks)
    pub const HAZARD_DELAY_BASE_TICKS: u32 = 60;
    /// Each delayed spawn makes the next one wait this much longer (ticks)
    pub const HAZARD_DELAY_STEP_TICKS: u32 = 60;
    /// Spawn retries to keep a new hazard off the snake's head
    pub const HAZARD_PLACEMENT_ATTEMPTS: u32 = 8;

    /// Color timer period (ms)
    pub const COLOR_PERIOD_MS: f64 = 100.0;
    /// Full hue cycle length (ms)
    pub const HUE_CYCLE_MS: f64 = 3000.0;
    /// Hue offset between neighbouring segments, expressed as time (ms)
    pub const SEGMENT_PHASE_MS: f64 = 60.0;
}

/// Unit vector pointing from `from` toward `to`.
///
/// Coincident points give the +x axis, which is what `atan2(0, 0)` yields.
#[inline]
pub fn direction_toward(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a direction vector in radians (screen coordinates, +y down)
#[inline]
pub fn heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

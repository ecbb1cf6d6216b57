//! Data-driven game balance
//!
//! Defaults come from [`crate::consts`]. A JSON override (partial objects
//! allowed) can be stored under `snake_tuning` for playtesting.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::storage::KeyValueStore;

/// When a hazard earned at a score threshold appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardSpawn {
    /// Spawn in the same tick the threshold is reached
    Immediate,
    /// Spawn after a delay that grows each time a delayed spawn fires
    #[default]
    Delayed,
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub canvas_width: f32,
    pub canvas_height: f32,

    pub snake_size: f32,
    /// Pixels per tick
    pub snake_speed: f32,
    pub snake_start: (f32, f32),
    pub segments_per_food: usize,

    pub food_size: f32,
    pub food_start: (f32, f32),
    pub score_per_food: u64,

    pub hazard_size: f32,
    pub hazard_every: u64,
    pub hazard_spawn: HazardSpawn,
    pub hazard_delay_base_ticks: u32,
    pub hazard_delay_step_ticks: u32,

    pub color_period_ms: f64,
    pub hue_cycle_ms: f64,
    pub segment_phase_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            snake_size: SNAKE_SIZE,
            snake_speed: SNAKE_SPEED,
            snake_start: (SNAKE_START_X, SNAKE_START_Y),
            segments_per_food: SEGMENTS_PER_FOOD,

            food_size: FOOD_SIZE,
            food_start: (FOOD_START_X, FOOD_START_Y),
            score_per_food: SCORE_PER_FOOD,

            hazard_size: HAZARD_SIZE,
            hazard_every: HAZARD_EVERY,
            hazard_spawn: HazardSpawn::default(),
            hazard_delay_base_ticks: HAZARD_DELAY_BASE_TICKS,
            hazard_delay_step_ticks: HAZARD_DELAY_STEP_TICKS,

            color_period_ms: COLOR_PERIOD_MS,
            hue_cycle_ms: HUE_CYCLE_MS,
            segment_phase_ms: SEGMENT_PHASE_MS,
        }
    }
}

impl Tuning {
    /// Storage key for the optional override
    pub const STORAGE_KEY: &'static str = "snake_tuning";

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load the override from storage, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring bad tuning override: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Clamp values that would break the simulation
    fn sanitized(mut self) -> Self {
        self.canvas_width = self.canvas_width.max(1.0);
        self.canvas_height = self.canvas_height.max(1.0);
        self.snake_size = self.snake_size.max(1.0);
        self.food_size = self.food_size.clamp(1.0, self.canvas_width.min(self.canvas_height));
        self.hazard_size = self.hazard_size.clamp(1.0, self.canvas_width.min(self.canvas_height));
        self.hazard_every = self.hazard_every.max(1);
        // At most one hazard threshold per food
        self.score_per_food = self.score_per_food.clamp(1, self.hazard_every);
        self.segments_per_food = self.segments_per_food.min(MAX_SEGMENTS_PER_FOOD);
        self.color_period_ms = self.color_period_ms.max(1.0);
        self.hue_cycle_ms = self.hue_cycle_ms.max(1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let tuning = Tuning::from_json(r#"{ "snake_speed": 3.5, "hazard_spawn": "Immediate" }"#)
            .unwrap();
        assert_eq!(tuning.snake_speed, 3.5);
        assert_eq!(tuning.hazard_spawn, HazardSpawn::Immediate);
        assert_eq!(tuning.snake_size, SNAKE_SIZE);
        assert_eq!(tuning.hazard_every, HAZARD_EVERY);
    }

    #[test]
    fn test_zero_increments_are_clamped() {
        let tuning = Tuning::from_json(r#"{ "score_per_food": 0, "hazard_every": 0 }"#).unwrap();
        assert_eq!(tuning.score_per_food, 1);
        assert_eq!(tuning.hazard_every, 1);
    }

    #[test]
    fn test_oversized_increments_are_bounded() {
        let tuning = Tuning::from_json(
            r#"{ "score_per_food": 18446744073709551615, "segments_per_food": 18446744073709551615 }"#,
        )
        .unwrap();
        assert_eq!(tuning.score_per_food, HAZARD_EVERY);
        assert_eq!(tuning.segments_per_food, MAX_SEGMENTS_PER_FOOD);

        let tuning =
            Tuning::from_json(r#"{ "score_per_food": 500, "hazard_every": 250 }"#).unwrap();
        assert_eq!(tuning.score_per_food, 250);
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let mut store = MemoryStore::default();
        store.set(Tuning::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Tuning::load(&store), Tuning::default());
    }

    #[test]
    fn test_load_without_override_is_default() {
        let store = MemoryStore::default();
        assert_eq!(Tuning::load(&store), Tuning::default());
    }
}

//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::{out_of_bounds, overlaps};
use super::state::{GameEvent, GameState};
use crate::tuning::HazardSpawn;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer press in canvas coordinates
    pub steer_to: Option<Vec2>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if let Some(target) = input.steer_to {
        state.snake.aim_at(target);
    }

    state.snake.integrate();

    // Walls end the run; the rest of the tick plays on the fresh world
    let width = state.tuning.canvas_width;
    let height = state.tuning.canvas_height;
    if out_of_bounds(state.snake.head(), width, height) {
        state.game_over();
    }

    state.advance_pending_hazards();

    if overlaps(state.snake.head(), state.food.square()) {
        eat_food(state);
    }

    let head = state.snake.head();
    if state.hazards.iter().any(|h| overlaps(head, h.square())) {
        state.game_over();
    }
}

/// Grow, score, relocate the food, and earn hazards for every score
/// threshold crossed
fn eat_food(state: &mut GameState) {
    let segments = state.tuning.segments_per_food;
    state.snake.grow(segments);

    let before = state.score;
    state.score = state.score.saturating_add(state.tuning.score_per_food);
    state.relocate_food();
    state.push_event(GameEvent::FoodEaten { score: state.score });

    let every = state.tuning.hazard_every;
    let crossings = state.score / every - before / every;
    for _ in 0..crossings {
        match state.tuning.hazard_spawn {
            HazardSpawn::Immediate => state.spawn_hazard(),
            HazardSpawn::Delayed => state.schedule_hazard(),
        }
    }
}

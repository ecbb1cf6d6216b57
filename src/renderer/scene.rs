//! Frame assembly: game state in, triangle list out

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::heading;
use crate::palette::colors;
use crate::settings::Settings;
use crate::sim::GameState;

/// Seed for the grass layout; the field looks the same every session
const GRASS_SEED: u64 = 0x6772_6173_73;

/// Reusable frame builder. Caches the background between frames.
#[derive(Debug, Default)]
pub struct Scene {
    background: Vec<Vertex>,
    /// Canvas size the background was built for
    background_size: Option<(u32, u32)>,
    vertices: Vec<Vertex>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_background(&mut self, width: f32, height: f32) {
        let key = (width as u32, height as u32);
        if self.background_size != Some(key) {
            self.background = shapes::grass(width, height, GRASS_SEED);
            self.background_size = Some(key);
            log::debug!("Grass rebuilt for {}x{}", key.0, key.1);
        }
    }

    /// Build the frame. Draw order: background, body (tail first), head,
    /// food, hazards.
    pub fn build(&mut self, state: &GameState, settings: &Settings) -> &[Vertex] {
        let width = state.tuning.canvas_width;
        let height = state.tuning.canvas_height;
        self.vertices.clear();

        if settings.grass {
            self.ensure_background(width, height);
            self.vertices.extend_from_slice(&self.background);
        }

        let snake = &state.snake;
        let size = snake.size;
        for segment in snake.body.iter().rev() {
            if settings.hex_segments {
                let center = segment.pos + Vec2::splat(size / 2.0);
                self.vertices
                    .extend(shapes::hexagon(center, size, segment.color));
            } else {
                self.vertices
                    .extend(shapes::rect(segment.pos, Vec2::splat(size), segment.color));
            }
        }

        if settings.pear_head {
            let center = snake.head().center();
            self.vertices.extend(shapes::pear_head(
                center,
                size,
                heading(snake.dir),
                snake.color,
            ));
        } else {
            self.vertices
                .extend(shapes::rect(snake.pos, Vec2::splat(size), snake.color));
        }

        let food = &state.food;
        self.vertices
            .extend(shapes::rect(food.pos, Vec2::splat(food.size), food.color));

        for hazard in &state.hazards {
            self.vertices.extend(shapes::rect(
                hazard.pos,
                Vec2::splat(hazard.size),
                colors::HAZARD,
            ));
        }

        &self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Hazard;
    use crate::tuning::Tuning;

    #[test]
    fn test_classic_scene_is_all_squares() {
        let mut state = GameState::new(1, Tuning::default());
        state.snake.grow(2);
        let mut scene = Scene::new();
        let vertices = scene.build(&state, &Settings::classic());
        // 3 segments + head + food
        assert_eq!(vertices.len(), 5 * 6);
    }

    #[test]
    fn test_hazards_are_drawn_last_in_red() {
        let mut state = GameState::new(1, Tuning::default());
        state.hazards.push(Hazard {
            pos: Vec2::new(300.0, 300.0),
            size: 20.0,
        });
        let mut scene = Scene::new();
        let vertices = scene.build(&state, &Settings::default());
        let tail = &vertices[vertices.len() - 6..];
        assert!(tail.iter().all(|v| v.color == colors::HAZARD));
        assert_eq!(tail[0].position, [300.0, 300.0]);
    }

    #[test]
    fn test_grass_is_cached_and_toggleable() {
        let state = GameState::new(1, Tuning::default());
        let mut scene = Scene::new();
        let with_grass = scene.build(&state, &Settings::default()).len();
        let again = scene.build(&state, &Settings::default()).len();
        assert_eq!(with_grass, again);

        let settings = Settings {
            grass: false,
            ..Settings::default()
        };
        let without = scene.build(&state, &settings).len();
        let grass_len = shapes::grass(
            state.tuning.canvas_width,
            state.tuning.canvas_height,
            GRASS_SEED,
        )
        .len();
        assert_eq!(with_grass - without, grass_len);
    }
}

//! Game state and core simulation types
//!
//! The whole world lives in one owned [`GameState`]; `tick` mutates it in
//! place and never touches the platform.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Square, overlaps};
use crate::consts::HAZARD_PLACEMENT_ATTEMPTS;
use crate::direction_toward;
use crate::palette::{self, Rgba, colors};
use crate::settings::ColorMode;
use crate::tuning::Tuning;

/// One body segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub pos: Vec2,
    pub color: Rgba,
}

/// The player's snake
#[derive(Debug, Clone)]
pub struct Snake {
    /// Top-left of the head square
    pub pos: Vec2,
    pub size: f32,
    /// Unit direction (zero until the first press)
    pub dir: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Body segments, head end first. Never empty.
    pub body: Vec<Segment>,
    /// Segment budget; equals `body.len()` after every tick
    pub target_len: usize,
    /// Whole-snake display color
    pub color: Rgba,
}

impl Snake {
    pub fn new(tuning: &Tuning, color: Rgba) -> Self {
        let pos = Vec2::new(tuning.snake_start.0, tuning.snake_start.1);
        Self {
            pos,
            size: tuning.snake_size,
            dir: Vec2::ZERO,
            speed: tuning.snake_speed,
            body: vec![Segment { pos, color }],
            target_len: 1,
            color,
        }
    }

    pub fn head(&self) -> Square {
        Square::new(self.pos, self.size)
    }

    /// Point the snake at `target` (canvas coordinates)
    pub fn aim_at(&mut self, target: Vec2) {
        self.dir = direction_toward(self.pos, target);
    }

    /// Shift segments toward the head, then advance the head
    pub fn integrate(&mut self) {
        for i in (1..self.body.len()).rev() {
            self.body[i].pos = self.body[i - 1].pos;
        }
        if let Some(first) = self.body.first_mut() {
            first.pos = self.pos;
        }
        self.pos += self.dir * self.speed;
    }

    /// Append `count` segments at the head, in the current color
    pub fn grow(&mut self, count: usize) {
        let segment = Segment {
            pos: self.pos,
            color: self.color,
        };
        self.body.extend(std::iter::repeat_n(segment, count));
        self.target_len += count;
    }
}

/// The food square
#[derive(Debug, Clone)]
pub struct Food {
    pub pos: Vec2,
    pub size: f32,
    pub color: Rgba,
}

impl Food {
    pub fn square(&self) -> Square {
        Square::new(self.pos, self.size)
    }
}

/// A static obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub pos: Vec2,
    pub size: f32,
}

impl Hazard {
    pub fn square(&self) -> Square {
        Square::new(self.pos, self.size)
    }
}

/// Things the shell reacts to (persistence, HUD, color timer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { score: u64 },
    HazardScheduled { delay_ticks: u32 },
    HazardSpawned { total: usize },
    GameOver { score: u64, new_best: bool },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub snake: Snake,
    pub food: Food,
    pub hazards: Vec<Hazard>,
    /// Ticks remaining for each delayed hazard
    pub pending_hazards: Vec<u32>,
    /// Delay given to the next delayed hazard
    pub next_hazard_delay: u32,
    pub score: u64,
    pub best_score: u64,
    /// Simulation tick counter (not reset on game over)
    pub time_ticks: u64,
    /// Number of runs that ended
    pub games_played: u32,
    /// Gameplay RNG (food and hazard placement)
    rng: Pcg32,
    /// Cosmetic RNG, kept apart so colors never shift gameplay
    color_rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut color_rng = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
        let color = palette::random_color(&mut color_rng);
        Self {
            seed,
            snake: Snake::new(&tuning, color),
            food: Food {
                pos: Vec2::new(tuning.food_start.0, tuning.food_start.1),
                size: tuning.food_size,
                color: colors::FOOD,
            },
            hazards: Vec::new(),
            pending_hazards: Vec::new(),
            next_hazard_delay: tuning.hazard_delay_base_ticks,
            score: 0,
            best_score: 0,
            time_ticks: 0,
            games_played: 0,
            rng: Pcg32::seed_from_u64(seed),
            color_rng,
            events: Vec::new(),
            tuning,
        }
    }

    /// Seed the best score from persisted data
    pub fn with_best_score(mut self, best: u64) -> Self {
        self.best_score = best;
        self
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Uniformly random top-left position keeping a square of `size` inside
    /// the canvas
    fn random_position(&mut self, size: f32) -> Vec2 {
        let max_x = (self.tuning.canvas_width - size).max(0.0);
        let max_y = (self.tuning.canvas_height - size).max(0.0);
        Vec2::new(
            self.rng.random::<f32>() * max_x,
            self.rng.random::<f32>() * max_y,
        )
    }

    /// Move the food somewhere new
    pub fn relocate_food(&mut self) {
        self.food.pos = self.random_position(self.food.size);
    }

    /// Add one hazard, keeping it off the snake's head when possible
    pub fn spawn_hazard(&mut self) {
        let size = self.tuning.hazard_size;
        let keep_clear = self.snake.head().inflate(self.snake.size * 2.0);
        let mut pos = self.random_position(size);
        for _ in 1..HAZARD_PLACEMENT_ATTEMPTS {
            if !overlaps(Square::new(pos, size), keep_clear) {
                break;
            }
            pos = self.random_position(size);
        }
        self.hazards.push(Hazard { pos, size });
        let total = self.hazards.len();
        log::info!("Hazard #{} at ({:.0}, {:.0})", total, pos.x, pos.y);
        self.push_event(GameEvent::HazardSpawned { total });
    }

    /// Queue one delayed hazard; the delay for the next one is raised when
    /// this one fires
    pub fn schedule_hazard(&mut self) {
        let delay_ticks = self.next_hazard_delay;
        self.pending_hazards.push(delay_ticks);
        self.push_event(GameEvent::HazardScheduled { delay_ticks });
    }

    /// Count down delayed hazards and spawn the ones that are due
    pub fn advance_pending_hazards(&mut self) {
        if self.pending_hazards.is_empty() {
            return;
        }
        let mut due = 0;
        self.pending_hazards.retain_mut(|ticks| {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            self.spawn_hazard();
            self.next_hazard_delay = self
                .next_hazard_delay
                .saturating_add(self.tuning.hazard_delay_step_ticks);
        }
    }

    /// End the run: settle the best score, then reset the world
    pub fn game_over(&mut self) {
        let score = self.score;
        let new_best = score > self.best_score;
        if new_best {
            self.best_score = score;
        }
        self.games_played += 1;
        log::info!(
            "Game over: score {} (best {}{})",
            score,
            self.best_score,
            if new_best { ", new best" } else { "" }
        );
        self.push_event(GameEvent::GameOver { score, new_best });
        self.reset();
    }

    /// Put every per-run value back to its initial state. Best score, tick
    /// counter and RNG streams carry over.
    pub fn reset(&mut self) {
        let color = self.snake.color;
        self.snake = Snake::new(&self.tuning, color);
        self.hazards.clear();
        self.pending_hazards.clear();
        self.next_hazard_delay = self.tuning.hazard_delay_base_ticks;
        self.score = 0;
    }

    /// Recompute snake colors for wall-clock time `now_ms`
    pub fn recolor(&mut self, now_ms: f64, mode: ColorMode) {
        match mode {
            ColorMode::Rainbow => {
                let cycle = self.tuning.hue_cycle_ms;
                let phase = self.tuning.segment_phase_ms;
                self.snake.color = palette::rainbow(now_ms, cycle);
                for (i, segment) in self.snake.body.iter_mut().enumerate() {
                    segment.color = palette::segment_rainbow(now_ms, i, cycle, phase);
                }
            }
            ColorMode::Random => {
                let color = palette::random_color(&mut self.color_rng);
                self.snake.color = color;
                for segment in &mut self.snake.body {
                    segment.color = color;
                }
            }
        }
    }
}

//! Snake color cycling
//!
//! Colors are a pure function of wall-clock time, so the rate at which they
//! are recomputed only affects smoothness, never the hue itself.

use rand::Rng;

/// RGBA color in 0..1 (same layout as vertex colors)
pub type Rgba = [f32; 4];

/// Fixed colors for game elements
pub mod colors {
    use super::Rgba;

    /// Food is blue
    pub const FOOD: Rgba = [0.0, 0.0, 1.0, 1.0];
    /// Hazards are red
    pub const HAZARD: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const BACKGROUND: Rgba = [0.02, 0.02, 0.05, 1.0];
    pub const GRASS: Rgba = [0.16, 0.42, 0.14, 1.0];
    pub const GRASS_BLADE_DARK: Rgba = [0.09, 0.30, 0.08, 1.0];
    pub const GRASS_BLADE_LIGHT: Rgba = [0.30, 0.58, 0.20, 1.0];
    pub const EYE_WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const EYE_PUPIL: Rgba = [0.0, 0.0, 0.0, 1.0];
}

/// Convert HSL (hue in degrees, saturation/lightness in 0..1) to RGBA
pub fn hsl(hue_deg: f32, saturation: f32, lightness: f32) -> Rgba {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Hue (degrees) at wall-clock time `t_ms` for a cycle of `cycle_ms`
pub fn hue_at(t_ms: f64, cycle_ms: f64) -> f32 {
    (t_ms.rem_euclid(cycle_ms) / cycle_ms * 360.0) as f32
}

/// Rainbow color at wall-clock time `t_ms`
pub fn rainbow(t_ms: f64, cycle_ms: f64) -> Rgba {
    hsl(hue_at(t_ms, cycle_ms), 1.0, 0.5)
}

/// Rainbow color for body segment `index`, trailing the head by
/// `index * phase_ms` of hue
pub fn segment_rainbow(t_ms: f64, index: usize, cycle_ms: f64, phase_ms: f64) -> Rgba {
    rainbow(t_ms - index as f64 * phase_ms, cycle_ms)
}

/// Uniformly random opaque color
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    [rng.random(), rng.random(), rng.random(), 1.0]
}

/// Periodic color refresh, driven by the frame loop.
///
/// `poll` fires at most once per call; missed periods are skipped rather
/// than replayed. `restart` cancels the pending firing and re-arms from
/// `now`.
#[derive(Debug, Clone)]
pub struct ColorTimer {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl ColorTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            next_due_ms: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Arm the timer; the first firing is one period after `now_ms`
    pub fn restart(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    /// Returns true when a period has elapsed since the last firing
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let Some(due) = self.next_due_ms else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        let missed = ((now_ms - due) / self.period_ms).floor();
        self.next_due_ms = Some(due + (missed + 1.0) * self.period_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn close(a: Rgba, b: Rgba) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsl(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl(240.0, 1.0, 0.5), [0.0, 0.0, 1.0, 1.0]));
        assert!(close(hsl(360.0, 1.0, 0.5), hsl(0.0, 1.0, 0.5)));
    }

    #[test]
    fn test_rainbow_is_periodic() {
        let cycle = 3000.0;
        for t in [0.0, 125.0, 1777.0, 2999.0] {
            assert!(close(rainbow(t, cycle), rainbow(t + cycle, cycle)));
            assert!(close(rainbow(t, cycle), rainbow(t + 7.0 * cycle, cycle)));
        }
        assert!(!close(rainbow(0.0, cycle), rainbow(cycle / 2.0, cycle)));
    }

    #[test]
    fn test_segments_trail_the_head() {
        let (cycle, phase) = (3000.0, 60.0);
        let t = 10_000.0;
        assert!(close(segment_rainbow(t, 0, cycle, phase), rainbow(t, cycle)));
        assert!(close(segment_rainbow(t, 3, cycle, phase), rainbow(t - 180.0, cycle)));
        assert!(!close(segment_rainbow(t, 0, cycle, phase), segment_rainbow(t, 10, cycle, phase)));
    }

    #[test]
    fn test_hue_handles_negative_time() {
        let hue = hue_at(-750.0, 3000.0);
        assert!((hue - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_random_colors_are_opaque_and_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let c = random_color(&mut rng);
            assert_eq!(c[3], 1.0);
            assert!(c[..3].iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_timer_fires_once_per_period() {
        let mut timer = ColorTimer::new(100.0);
        assert!(!timer.poll(1000.0));
        timer.restart(1000.0);
        assert!(!timer.poll(1050.0));
        assert!(timer.poll(1100.0));
        assert!(!timer.poll(1150.0));
        assert!(timer.poll(1210.0));
    }

    #[test]
    fn test_timer_skips_missed_periods() {
        let mut timer = ColorTimer::new(100.0);
        timer.restart(0.0);
        assert!(timer.poll(950.0));
        assert!(!timer.poll(990.0));
        assert!(timer.poll(1000.0));
    }

    #[test]
    fn test_restart_realigns_phase() {
        let mut timer = ColorTimer::new(100.0);
        timer.restart(0.0);
        timer.restart(70.0);
        assert!(!timer.poll(100.0));
        assert!(timer.poll(170.0));

        timer.cancel();
        assert!(!timer.is_running());
        assert!(!timer.poll(10_000.0));
    }
}

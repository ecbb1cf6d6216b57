//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in canvas pixel coordinates
//! (+y down). The pipeline maps them to clip space.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::palette::{Rgba, colors};

/// Generate vertices for an axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    regular_polygon(center, radius, segments, 0.0, color)
}

/// Generate vertices for a regular polygon (triangle fan from the center)
pub fn regular_polygon(
    center: Vec2,
    radius: f32,
    sides: u32,
    rotation: f32,
    color: Rgba,
) -> Vec<Vertex> {
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity((sides * 3) as usize);

    for i in 0..sides {
        let theta1 = rotation + (i as f32 / sides as f32) * TAU;
        let theta2 = rotation + ((i + 1) as f32 / sides as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Flat-topped hexagon inscribed in a square of side `size`
pub fn hexagon(center: Vec2, size: f32, color: Rgba) -> Vec<Vertex> {
    regular_polygon(center, size / 2.0, 6, 0.0, color)
}

/// Point on a cubic Bezier curve at `t` in 0..1
#[inline]
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Pear curves in unit space: nose at +x, broad end at -x.
/// Each entry is (start, control 1, control 2, end); the outline is closed.
const PEAR_CURVES: [[(f32, f32); 4]; 4] = [
    [(1.0, 0.0), (1.0, -0.45), (0.45, -0.5), (0.1, -0.55)],
    [(0.1, -0.55), (-0.35, -0.6), (-1.05, -0.95), (-1.0, 0.0)],
    [(-1.0, 0.0), (-1.05, 0.95), (-0.35, 0.6), (0.1, 0.55)],
    [(0.1, 0.55), (0.45, 0.5), (1.0, 0.45), (1.0, 0.0)],
];

/// Fan origin inside the pear (unit space)
const PEAR_HUB: Vec2 = Vec2::new(-0.2, 0.0);

/// Closed pear outline around `center`, `radius` from center to nose, nose
/// pointing along `heading` (radians)
pub fn pear_outline(center: Vec2, radius: f32, heading: f32, steps_per_curve: u32) -> Vec<Vec2> {
    let steps = steps_per_curve.max(2);
    let rotation = Vec2::from_angle(heading);
    let mut points = Vec::with_capacity((PEAR_CURVES.len() as u32 * steps) as usize);

    for curve in PEAR_CURVES {
        let [p0, p1, p2, p3] = curve.map(|(x, y)| Vec2::new(x, y));
        // Skip t = 1; the next curve starts there
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            let local = cubic_bezier(p0, p1, p2, p3, t) * radius;
            points.push(center + rotation.rotate(local));
        }
    }

    points
}

/// Pear-shaped head with two eyes looking along `heading`
pub fn pear_head(center: Vec2, size: f32, heading: f32, color: Rgba) -> Vec<Vertex> {
    let radius = size / 2.0;
    let rotation = Vec2::from_angle(heading);
    let outline = pear_outline(center, radius, heading, 8);
    let hub = center + rotation.rotate(PEAR_HUB * radius);

    let mut vertices = Vec::with_capacity(outline.len() * 3 + 4 * 3 * 12);
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::new(hub.x, hub.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    for side in [-1.0, 1.0] {
        let eye = center + rotation.rotate(Vec2::new(0.35, 0.28 * side) * radius);
        let pupil = eye + rotation.rotate(Vec2::new(0.05, 0.0) * radius);
        vertices.extend(circle(eye, 0.16 * radius, colors::EYE_WHITE, 12));
        vertices.extend(circle(pupil, 0.08 * radius, colors::EYE_PUPIL, 12));
    }

    vertices
}

/// Mix two colors (t = 0 gives `a`)
fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Grass field: a green base plus randomly placed blades.
/// The same `seed` and size always give the same field.
pub fn grass(width: f32, height: f32, seed: u64) -> Vec<Vertex> {
    let mut rng = Pcg32::seed_from_u64(seed);
    // One blade per 20x20 cell on average
    let blades = ((width * height) / 400.0).max(0.0) as usize;

    let mut vertices = Vec::with_capacity(6 + blades * 3);
    vertices.extend(rect(Vec2::ZERO, Vec2::new(width, height), colors::GRASS));

    for _ in 0..blades {
        let base = Vec2::new(
            rng.random::<f32>() * width,
            rng.random::<f32>() * height,
        );
        let half_width = rng.random_range(1.0..2.5f32);
        let blade_height = rng.random_range(5.0..12.0f32);
        // Lean up to ~17 degrees either way
        let lean = rng.random_range(-0.3..0.3f32);
        let tip = base + Vec2::from_angle(-PI / 2.0 + lean) * blade_height;
        let color = lerp_color(
            colors::GRASS_BLADE_DARK,
            colors::GRASS_BLADE_LIGHT,
            rng.random::<f32>(),
        );

        vertices.push(Vertex::new(base.x - half_width, base.y, color));
        vertices.push(Vertex::new(base.x + half_width, base.y, color));
        vertices.push(Vertex::new(tip.x, tip.y, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = [1.0; 4];

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }

    #[test]
    fn test_rect_covers_its_box() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), WHITE);
        assert_eq!(v.len(), 6);
        let (min, max) = bounds(&v);
        assert_eq!(min, Vec2::new(10.0, 20.0));
        assert_eq!(max, Vec2::new(40.0, 60.0));
    }

    #[test]
    fn test_hexagon_fits_its_square() {
        let center = Vec2::new(50.0, 50.0);
        let v = hexagon(center, 20.0, WHITE);
        assert_eq!(v.len(), 18);
        let (min, max) = bounds(&v);
        assert!(min.x >= 40.0 - 1e-4 && min.y >= 40.0 - 1e-4);
        assert!(max.x <= 60.0 + 1e-4 && max.y <= 60.0 + 1e-4);
    }

    #[test]
    fn test_bezier_hits_endpoints() {
        let (p0, p1, p2, p3) = (
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 2.0),
            Vec2::new(4.0, 0.0),
        );
        assert_eq!(cubic_bezier(p0, p1, p2, p3, 0.0), p0);
        assert!((cubic_bezier(p0, p1, p2, p3, 1.0) - p3).length() < 1e-6);
        // Symmetric control polygon peaks in the middle
        let mid = cubic_bezier(p0, p1, p2, p3, 0.5);
        assert!((mid - Vec2::new(2.0, 1.5)).length() < 1e-6);
    }

    #[test]
    fn test_pear_curves_are_closed() {
        for i in 0..PEAR_CURVES.len() {
            let end = PEAR_CURVES[i][3];
            let next_start = PEAR_CURVES[(i + 1) % PEAR_CURVES.len()][0];
            assert_eq!(end, next_start);
        }
    }

    #[test]
    fn test_pear_nose_follows_heading() {
        let center = Vec2::new(100.0, 100.0);
        let outline = pear_outline(center, 10.0, PI / 2.0, 8);
        // First point is the nose; heading +y (down the screen)
        assert!((outline[0] - Vec2::new(100.0, 110.0)).length() < 1e-4);
        assert_eq!(outline.len(), 32);
    }

    #[test]
    fn test_pear_head_stays_near_its_square() {
        let center = Vec2::new(100.0, 100.0);
        let v = pear_head(center, 20.0, 0.3, WHITE);
        assert_eq!(v.len() % 3, 0);
        let (min, max) = bounds(&v);
        assert!(min.x > 85.0 && min.y > 85.0);
        assert!(max.x < 115.0 && max.y < 115.0);
    }

    #[test]
    fn test_grass_is_deterministic_and_inside_canvas_base() {
        let a = grass(200.0, 100.0, 11);
        let b = grass(200.0, 100.0, 11);
        assert_eq!(a, b);
        assert_eq!(a.len(), 6 + 50 * 3);
        assert_ne!(a, grass(200.0, 100.0, 12));
        for v in &a {
            assert!(v.position[0] > -5.0 && v.position[0] < 205.0);
            assert!(v.position[1] > -13.0 && v.position[1] <= 100.0);
        }
    }
}

//! Shape generation for 2D primitives
//!
//! Everything is built from triangles in play-field coordinates (origin
//! top-left, y down). The pipeline maps them to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{Boss, Entity};

/// Axis-aligned filled rectangle centered on `center`
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let h = size * 0.5;
    let (l, r, t, b) = (center.x - h.x, center.x + h.x, center.y - h.y, center.y + h.y);
    vec![
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    polygon(center, color, &vec![radius; segments as usize])
}

/// Filled star-shaped polygon with one radius per evenly spaced spoke
fn polygon(center: Vec2, color: [f32; 4], radii: &[f32]) -> Vec<Vertex> {
    let n = radii.len();
    let mut vertices = Vec::with_capacity(n * 3);

    for i in 0..n {
        let j = (i + 1) % n;
        let theta1 = (i as f32 / n as f32) * 2.0 * PI;
        let theta2 = (j as f32 / n as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii[i] * theta1.cos(),
            center.y + radii[i] * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii[j] * theta2.cos(),
            center.y + radii[j] * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Player ship: a nose triangle over two swept wings
pub fn ship(body: &Entity) -> Vec<Vertex> {
    let c = body.pos;
    let h = body.size * 0.5;
    let nose = Vec2::new(c.x, c.y - h.y);
    let tail_l = Vec2::new(c.x - h.x * 0.35, c.y + h.y);
    let tail_r = Vec2::new(c.x + h.x * 0.35, c.y + h.y);

    let mut vertices = vec![
        Vertex::new(nose.x, nose.y, colors::SHIP),
        Vertex::new(tail_l.x, tail_l.y, colors::SHIP),
        Vertex::new(tail_r.x, tail_r.y, colors::SHIP),
    ];
    for side in [-1.0, 1.0] {
        let root = Vec2::new(c.x, c.y);
        let tip = Vec2::new(c.x + side * h.x, c.y + h.y);
        let trail = Vec2::new(c.x + side * h.x * 0.3, c.y + h.y);
        vertices.push(Vertex::new(root.x, root.y, colors::SHIP_WING));
        vertices.push(Vertex::new(tip.x, tip.y, colors::SHIP_WING));
        vertices.push(Vertex::new(trail.x, trail.y, colors::SHIP_WING));
    }
    vertices
}

/// Lumpy asteroid whose outline is derived from its position
///
/// The same asteroid keeps the same silhouette every frame.
pub fn asteroid(body: &Entity) -> Vec<Vertex> {
    const SPOKES: usize = 9;
    let radius = body.size.x.min(body.size.y) * 0.5;
    let mut seed = (body.pos.x.to_bits() ^ body.pos.y.to_bits().rotate_left(16)) | 1;
    let radii: Vec<f32> = (0..SPOKES)
        .map(|_| {
            // xorshift32
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let jitter = (seed % 1000) as f32 / 1000.0;
            radius * (0.7 + 0.3 * jitter)
        })
        .collect();
    polygon(body.pos, colors::ASTEROID, &radii)
}

/// Boss hull with cockpit, cannons and a hit point bar underneath
pub fn boss(boss: &Boss) -> Vec<Vertex> {
    let body = &boss.body;
    let c = body.pos;
    let s = body.size;

    let mut vertices = rect(c, Vec2::new(s.x, s.y * 0.6), colors::BOSS);
    vertices.extend(rect(
        c - Vec2::new(0.0, s.y * 0.3),
        Vec2::new(s.x * 0.4, s.y * 0.4),
        colors::BOSS,
    ));
    vertices.extend(circle(c - Vec2::new(0.0, s.y * 0.25), s.y * 0.15, colors::BOSS_COCKPIT, 12));
    for side in [-1.0, 1.0] {
        vertices.extend(rect(
            c + Vec2::new(side * s.x * 0.35, s.y * 0.35),
            Vec2::new(s.x * 0.1, s.y * 0.3),
            colors::BOSS_CANNON,
        ));
    }
    vertices.extend(hp_bar(boss));
    vertices
}

/// Bar under the boss, filled in proportion to remaining hit points
pub fn hp_bar(boss: &Boss) -> Vec<Vertex> {
    let body = &boss.body;
    let width = body.size.x;
    let height = 6.0;
    let center = Vec2::new(body.pos.x, body.bottom() + 12.0);
    let fraction = if boss.max_hp == 0 {
        0.0
    } else {
        boss.hp as f32 / boss.max_hp as f32
    };

    let mut vertices = rect(center, Vec2::new(width, height), colors::HP_BAR_BACK);
    if fraction > 0.0 {
        let fill = width * fraction;
        let fill_center = Vec2::new(center.x - (width - fill) * 0.5, center.y);
        vertices.extend(rect(fill_center, Vec2::new(fill, height), colors::HP_BAR_FILL));
    }
    vertices
}

pub fn bullet(body: &Entity) -> Vec<Vertex> {
    rect(body.pos, body.size, colors::BULLET)
}

pub fn boss_bullet(body: &Entity) -> Vec<Vertex> {
    circle(body.pos, body.size.x.max(body.size.y) * 0.5, colors::BOSS_BULLET, 10)
}

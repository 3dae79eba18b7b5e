//! Axis-aligned bounding-box collision
//!
//! Every entity's box is centered on its position. Two boxes collide only when
//! their intervals overlap on both axes with nonzero area; edges that merely
//! touch do not count.

use glam::Vec2;

use super::state::Entity;

/// Check overlap between two centered boxes
///
/// `|dx| < (w1 + w2) / 2` and `|dy| < (h1 + h2) / 2`, strict on both axes.
#[inline]
pub fn boxes_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let delta = (a_pos - b_pos).abs();
    let reach = (a_size + b_size) * 0.5;
    delta.x < reach.x && delta.y < reach.y
}

/// Check whether two entities' bounding boxes overlap
#[inline]
pub fn collides(a: &Entity, b: &Entity) -> bool {
    boxes_overlap(a.pos, a.size, b.pos, b.size)
}

/// Manhattan distance between two entity centers
#[inline]
pub fn manhattan_distance(a: &Entity, b: &Entity) -> f32 {
    let d = (a.pos - b.pos).abs();
    d.x + d.y
}

/// Cheap gate run before the ship-versus-boss box test
#[inline]
pub fn within_gate(a: &Entity, b: &Entity, gate: f32) -> bool {
    manhattan_distance(a, b) < gate
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = boxed(100.0, 100.0, 40.0, 40.0);
        let b = boxed(120.0, 110.0, 40.0, 40.0);
        assert!(collides(&a, &b));
    }

    #[test]
    fn test_separated_on_one_axis_misses() {
        let a = boxed(100.0, 100.0, 40.0, 40.0);
        // Overlaps horizontally, far apart vertically
        let b = boxed(100.0, 200.0, 40.0, 40.0);
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let right = boxed(10.0, 0.0, 10.0, 10.0);
        let below = boxed(0.0, 10.0, 10.0, 10.0);
        let corner = boxed(10.0, 10.0, 10.0, 10.0);
        assert!(!collides(&a, &right));
        assert!(!collides(&a, &below));
        assert!(!collides(&a, &corner));
    }

    #[test]
    fn test_contained_box_collides() {
        let big = boxed(400.0, 100.0, 120.0, 80.0);
        let small = boxed(410.0, 90.0, 5.0, 15.0);
        assert!(collides(&big, &small));
        assert!(collides(&small, &big));
    }

    #[test]
    fn test_manhattan_gate() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(20.0, 29.0, 1.0, 1.0);
        assert_eq!(manhattan_distance(&a, &b), 49.0);
        assert!(within_gate(&a, &b, 50.0));
        let c = boxed(20.0, 30.0, 1.0, 1.0);
        assert!(!within_gate(&a, &c, 50.0));
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = boxed(ax, ay, aw, ah);
            let b = boxed(bx, by, bw, bh);
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn prop_collision_matches_intersection_area(
            ax in -64i32..64, ay in -64i32..64, aw in 1i32..32, ah in 1i32..32,
            bx in -64i32..64, by in -64i32..64, bw in 1i32..32, bh in 1i32..32,
        ) {
            // Even integer sizes keep every edge on an exact integer
            let (aw, ah, bw, bh) = (aw * 2, ah * 2, bw * 2, bh * 2);
            let overlap_x = ((ax + aw / 2).min(bx + bw / 2) - (ax - aw / 2).max(bx - bw / 2)).max(0);
            let overlap_y = ((ay + ah / 2).min(by + bh / 2) - (ay - ah / 2).max(by - bh / 2)).max(0);
            let area = overlap_x * overlap_y;

            let a = boxed(ax as f32, ay as f32, aw as f32, ah as f32);
            let b = boxed(bx as f32, by as f32, bw as f32, bh as f32);
            prop_assert_eq!(collides(&a, &b), area > 0);
        }
    }
}

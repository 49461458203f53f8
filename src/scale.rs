//! Conversions between an outer pane's units and an inlay's units.
//!
//! The scale factor of an inlay is the ratio of inner to outer units: an
//! inlay covering 8x8 blocks of a 24x24 pane has a scale factor of 1/3, so
//! multiplying by it turns inner units into outer units and dividing by it
//! does the reverse.

use bevy::math::Vec2;

use crate::geometry::Aabb;
use crate::pane::PANE_SIZE;

pub fn inlay_scale_factor(size: i32) -> f32 {
    assert!(size >= 1, "inlay size must be at least 1, got {size}");
    size as f32 / PANE_SIZE as f32
}

pub fn outer_coord(x: f32, base: f32, sf: f32) -> f32 {
    base + x * sf
}

pub fn inner_coord(x: f32, base: f32, sf: f32) -> f32 {
    (x - base) / sf
}

pub fn outer_point(p: Vec2, anchor: Vec2, sf: f32) -> Vec2 {
    Vec2::new(
        outer_coord(p.x, anchor.x, sf),
        outer_coord(p.y, anchor.y, sf),
    )
}

pub fn inner_point(p: Vec2, anchor: Vec2, sf: f32) -> Vec2 {
    Vec2::new(
        inner_coord(p.x, anchor.x, sf),
        inner_coord(p.y, anchor.y, sf),
    )
}

pub fn outer_edges(edges: &Aabb, anchor: Vec2, sf: f32) -> Aabb {
    edges.map_edges(
        |x| outer_coord(x, anchor.x, sf),
        |y| outer_coord(y, anchor.y, sf),
    )
}

pub fn inner_edges(edges: &Aabb, anchor: Vec2, sf: f32) -> Aabb {
    edges.map_edges(
        |x| inner_coord(x, anchor.x, sf),
        |y| inner_coord(y, anchor.y, sf),
    )
}

/// Re-expresses a velocity in units `sf` times the size of the current
/// ones. Velocities carry no anchor, only the unit change.
pub fn inner_velocity(v: Vec2, sf: f32) -> Vec2 {
    v / sf
}

/// Re-expresses the fractional location of `pos` within `ref_box` as the
/// same fractional location within `to_box`. Points outside `ref_box`
/// extrapolate linearly.
pub fn rebox(ref_box: &Aabb, to_box: &Aabb, pos: Vec2) -> Vec2 {
    let fx = (pos.x - ref_box.min_x) / ref_box.width();
    let fy = (pos.y - ref_box.min_y) / ref_box.height();
    Vec2::new(
        to_box.min_x + fx * to_box.width(),
        to_box.min_y + fy * to_box.height(),
    )
}

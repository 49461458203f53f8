//! Terrain probing around an entity's bounding box.
//!
//! The detector samples a tile grid at sub-block resolution in the context
//! pane and classifies tiles that fall into five probe regions: the box
//! itself and thin bands above, below, left and right of it.

use bevy::log::warn;
use bevy::math::Vec2;

use crate::blocks::{BlockId, BlockTable};
use crate::config::PhysicsConfig;
use crate::geometry::Aabb;
use crate::pane::PaneId;
use crate::scale::inner_edges;
use crate::trace::Context;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Escape preference order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    /// Unit vector in pane coordinates (y grows downward).
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blocked {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Blocked {
    pub fn is(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    pub fn count(&self) -> u8 {
        [self.up, self.down, self.left, self.right]
            .into_iter()
            .filter(|b| *b)
            .count() as u8
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surroundings {
    pub in_wall: bool,
    pub in_liquid: bool,
    pub in_climbable: bool,
    pub on_floor: bool,
    pub on_platform: bool,
    /// Every supporting block below is slippery.
    pub slippery_floor: bool,
    pub smooth_adjacent: bool,
    pub climbable_adjacent: bool,
    pub smooth_above: bool,
    pub climbable_above: bool,
    pub blocked: Blocked,
    pub unblocked: u8,
    /// Average scale of the probed box relative to the entity's pane.
    pub avg_scale: f32,
    /// Distance from the box bottom down to the nearest supporting cell,
    /// in the entity's units. Zero without support.
    pub floor_gap: f32,
}

impl Default for Surroundings {
    fn default() -> Self {
        Self {
            in_wall: false,
            in_liquid: false,
            in_climbable: false,
            on_floor: false,
            on_platform: false,
            slippery_floor: false,
            smooth_adjacent: false,
            climbable_adjacent: false,
            smooth_above: false,
            climbable_above: false,
            blocked: Blocked::default(),
            unblocked: 4,
            avg_scale: 1.0,
            floor_gap: 0.0,
        }
    }
}

/// One sampled tile: its box in the context pane and the block at its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub bounds: Aabb,
    pub block: Option<BlockId>,
}

/// Samples the tile grid covering `ctx.edges` plus a one-tile border. Tiles
/// sit on the entity pane's `tile_resolution` lattice.
pub fn sample_tiles(world: &World, ctx: &Context, config: &PhysicsConfig) -> Vec<Tile> {
    let res = config.tile_resolution;
    let local_min = ctx.from_context(ctx.edges.min());
    let local_max = ctx.from_context(ctx.edges.max());
    let x0 = (local_min.x / res).floor() as i32 - 1;
    let x1 = (local_max.x / res).ceil() as i32 + 1;
    let y0 = (local_min.y / res).floor() as i32 - 1;
    let y1 = (local_max.y / res).ceil() as i32 + 1;
    let depth = ctx.depth + config.tick_depth;

    let mut tiles = Vec::with_capacity(((x1 - x0) * (y1 - y0)).max(0) as usize);
    for ty in y0..y1 {
        for tx in x0..x1 {
            let min = ctx.to_context(Vec2::new(tx as f32 * res, ty as f32 * res));
            let max = ctx.to_context(Vec2::new((tx + 1) as f32 * res, (ty + 1) as f32 * res));
            let bounds = Aabb::new(min.x, min.y, max.x, max.y);
            let block = world.block_in_pane(ctx.pane, bounds.center(), depth);
            tiles.push(Tile { bounds, block });
        }
    }
    tiles
}

/// The five probe regions around `edges`, in the same frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probes {
    pub on: Aabb,
    pub above: Aabb,
    pub below: Aabb,
    pub left: Aabb,
    pub right: Aabb,
}

impl Probes {
    pub fn around(edges: &Aabb, thickness: f32, eps: f32) -> Self {
        let e = edges;
        Self {
            on: e.shrunk(eps),
            above: Aabb::new(e.min_x + eps, e.min_y - thickness, e.max_x - eps, e.min_y),
            below: Aabb::new(e.min_x + eps, e.max_y, e.max_x - eps, e.max_y + thickness),
            left: Aabb::new(e.min_x - thickness, e.min_y + eps, e.min_x, e.max_y - eps),
            right: Aabb::new(e.max_x, e.min_y + eps, e.max_x + thickness, e.max_y - eps),
        }
    }
}

fn blocks_in<'a>(tiles: &'a [Tile], region: &'a Aabb) -> impl Iterator<Item = BlockId> + 'a {
    tiles
        .iter()
        .filter(move |t| t.bounds.overlaps(region))
        .filter_map(|t| t.block)
}

/// Classifies the side or top bands: returns (smooth, climbable, solid).
fn classify_wall(table: &BlockTable, blocks: impl Iterator<Item = BlockId>) -> (bool, bool, bool) {
    let mut any = false;
    let mut all_smooth = true;
    let mut solid = false;
    for b in blocks {
        if table.is_solid(b) {
            solid = true;
        }
        if table.is_solid(b) || table.is_climbable(b) {
            any = true;
            all_smooth &= table.is_smooth(b);
        }
    }
    (any && all_smooth, any && !all_smooth, solid)
}

/// Reads the terrain around `ctx.edges`. `avg_scale` is the footprint
/// scale the caller already measured with [`footprint_scale`].
pub fn detect_surroundings(world: &World, ctx: &Context, avg_scale: f32, config: &PhysicsConfig) -> Surroundings {
    let table = &world.blocks;
    let tiles = sample_tiles(world, ctx, config);
    let thickness = (config.probe_fraction * ctx.edges.width()).min(config.probe_cap * ctx.scale);
    let probes = Probes::around(&ctx.edges, thickness, config.collision_epsilon * ctx.scale);
    let mut s = Surroundings::default();

    for b in blocks_in(&tiles, &probes.on) {
        s.in_wall |= table.is_solid(b);
        s.in_liquid |= table.is_liquid(b);
        s.in_climbable |= table.is_climbable(b);
    }

    // support is read from exact cells so floors inside inlays, which sit
    // off the tile lattice, are found at their true height
    let eps = config.collision_epsilon * ctx.scale;
    let bottom = ctx.edges.max_y;
    let mut all_slippery = true;
    let mut floor_top = f32::INFINITY;
    world.any_block_in(ctx.pane, &probes.below, ctx.depth + config.tick_depth, &mut |b, cell| {
        let solid = table.is_solid(b);
        let platform = table.is_platform(b) && cell.min_y >= bottom - eps;
        if solid || platform {
            s.on_floor |= solid;
            s.on_platform |= platform;
            all_slippery &= table.is_slippery(b);
            floor_top = floor_top.min(cell.min_y);
        }
        false
    });
    if floor_top.is_finite() {
        s.floor_gap = (floor_top - bottom).max(0.0) / ctx.scale;
    }
    s.slippery_floor = (s.on_floor || s.on_platform) && all_slippery;
    if s.on_floor || s.on_platform {
        s.blocked.set(Direction::Down);
    }

    let (_, _, left_solid) = classify_wall(table, blocks_in(&tiles, &probes.left));
    let (_, _, right_solid) = classify_wall(table, blocks_in(&tiles, &probes.right));
    let (smooth, climbable, _) = classify_wall(
        table,
        blocks_in(&tiles, &probes.left).chain(blocks_in(&tiles, &probes.right)),
    );
    s.smooth_adjacent = smooth;
    s.climbable_adjacent = climbable;
    if left_solid {
        s.blocked.set(Direction::Left);
    }
    if right_solid {
        s.blocked.set(Direction::Right);
    }

    let (smooth, climbable, solid) = classify_wall(table, blocks_in(&tiles, &probes.above));
    s.smooth_above = smooth;
    s.climbable_above = climbable;
    if solid {
        s.blocked.set(Direction::Up);
    }

    s.unblocked = 4 - s.blocked.count();
    s.avg_scale = avg_scale;
    s
}

/// Average scale of `ctx.edges` relative to the entity's own pane: 1 when
/// the box lies in that pane only, smaller over deeper inlays and larger
/// over the ancestors around it.
pub fn footprint_scale(world: &World, ctx: &Context, config: &PhysicsConfig) -> f32 {
    average_scale(world, ctx.pane, &ctx.edges, ctx.depth + config.tick_depth) / ctx.scale
}

/// Area-weighted scale of `edges` in `pane`: uncovered area counts as 1,
/// each overlapped inlay as its scale factor times its own average.
pub fn average_scale(world: &World, pane: PaneId, edges: &Aabb, depth: usize) -> f32 {
    let area = edges.area();
    let Some(p) = world.pane(pane) else {
        return 1.0;
    };
    if area <= 0.0 {
        return 1.0;
    }
    let mut covered = 0.0;
    let mut total = 0.0;
    for inlay in p.inlays_overlapping(edges) {
        let Some(clip) = edges.intersection(&inlay.bounds()) else {
            continue;
        };
        let frac = clip.area() / area;
        let sf = inlay.scale_factor();
        let inner = if depth == 0 {
            1.0
        } else {
            let inner_clip = inner_edges(&clip, inlay.anchor(), sf);
            average_scale(world, inlay.id, &inner_clip, depth - 1)
        };
        covered += frac;
        total += frac * sf * inner;
    }
    (1.0 - covered).max(0.0) + total
}

/// Escape velocity for an entity embedded in a wall. Prefers an open
/// direction whose opposite is blocked; falls back to straight up when
/// nothing is open.
pub fn wall_push(s: &Surroundings, config: &PhysicsConfig) -> Vec2 {
    if s.unblocked <= 1 {
        warn!(
            "[Nestworld] entity boxed in ({} open directions); escaping heuristically",
            s.unblocked
        );
    }
    let open = |d: &Direction| !s.blocked.is(*d);
    let dir = Direction::ALL
        .iter()
        .find(|d| open(d) && s.blocked.is(d.opposite()))
        .or_else(|| Direction::ALL.iter().find(|d| open(d)))
        .copied()
        .unwrap_or(Direction::Up);
    dir.vector() * config.wall_push_speed.min(config.max_velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks;
    use crate::pane::{Pane, PaneId};
    use crate::trace::{find_context, TraceStep};
    use bevy::math::IVec2;

    fn world_with(setup: impl FnOnce(&mut Pane)) -> (World, PaneId) {
        let mut world = World::default();
        let id = world.create_pane(None);
        let pane = world.pane_mut(id).unwrap();
        pane.fill(blocks::AIR);
        setup(pane);
        (world, id)
    }

    fn surroundings_at(world: &World, pane: PaneId, center: Vec2, size: f32) -> Surroundings {
        let edges = Aabb::from_center(center, size, size);
        let ctx = find_context(world, &edges, &[TraceStep::root(pane)], 2).unwrap();
        let config = PhysicsConfig::default();
        detect_surroundings(world, &ctx, footprint_scale(world, &ctx, &config), &config)
    }

    #[test]
    fn resting_on_stone_is_on_floor() {
        let (world, id) = world_with(|p| p.fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::STONE));
        let s = surroundings_at(&world, id, Vec2::new(5.0, 11.6), 0.8);
        assert!(s.on_floor);
        assert!(s.blocked.down);
        assert!(!s.in_wall);
        assert!(!s.slippery_floor);
        assert_eq!(s.unblocked, 3);
        assert!((s.avg_scale - 1.0).abs() < 1e-5);
    }

    #[test]
    fn floor_gap_measures_distance_to_support() {
        let (world, id) = world_with(|p| p.fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::STONE));
        let s = surroundings_at(&world, id, Vec2::new(5.0, 11.55), 0.8);
        assert!(s.on_floor);
        assert!((s.floor_gap - 0.05).abs() < 1e-4);
        let s = surroundings_at(&world, id, Vec2::new(5.0, 10.0), 0.8);
        assert!(!s.on_floor);
        assert_eq!(s.floor_gap, 0.0);
    }

    #[test]
    fn ice_floor_is_slippery() {
        let (world, id) = world_with(|p| p.fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::ICE));
        let s = surroundings_at(&world, id, Vec2::new(5.0, 11.6), 0.8);
        assert!(s.on_floor);
        assert!(s.slippery_floor);
    }

    #[test]
    fn mixed_floor_is_not_slippery() {
        let (world, id) = world_with(|p| {
            p.fill_rect(IVec2::new(0, 12), IVec2::new(5, 13), blocks::ICE);
            p.fill_rect(IVec2::new(5, 12), IVec2::new(24, 13), blocks::STONE);
        });
        let s = surroundings_at(&world, id, Vec2::new(5.0, 11.6), 0.8);
        assert!(s.on_floor);
        assert!(!s.slippery_floor);
    }

    #[test]
    fn bridge_is_a_platform() {
        let (world, id) = world_with(|p| p.fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::BRIDGE));
        let s = surroundings_at(&world, id, Vec2::new(5.0, 11.6), 0.8);
        assert!(!s.on_floor);
        assert!(s.on_platform);
        assert!(s.blocked.down);
    }

    #[test]
    fn walls_beside_and_above() {
        let (world, id) = world_with(|p| {
            p.fill_rect(IVec2::new(4, 0), IVec2::new(5, 24), blocks::SMOOTH_STONE);
            p.fill_rect(IVec2::new(0, 9), IVec2::new(24, 10), blocks::BRICK);
        });
        // box [5, 5.8] x [10, 10.8]
        let s = surroundings_at(&world, id, Vec2::new(5.4, 10.4), 0.8);
        assert!(s.blocked.left);
        assert!(!s.blocked.right);
        assert!(s.smooth_adjacent);
        assert!(!s.climbable_adjacent);
        assert!(s.climbable_above);
        assert!(s.blocked.up);
    }

    #[test]
    fn water_and_leaves_inside_the_box() {
        let (world, id) = world_with(|p| {
            p.set_block(IVec2::new(5, 5), blocks::WATER);
            p.set_block(IVec2::new(6, 5), blocks::LEAVES);
        });
        let s = surroundings_at(&world, id, Vec2::new(6.0, 5.5), 0.8);
        assert!(s.in_liquid);
        assert!(s.in_climbable);
        assert!(!s.in_wall);
        assert_eq!(s.unblocked, 4);
    }

    #[test]
    fn wall_push_escapes_through_single_opening() {
        // stone everywhere except a shaft open above (5, 5)
        let (world, id) = world_with(|p| {
            p.fill(blocks::STONE);
            p.fill_rect(IVec2::new(5, 0), IVec2::new(6, 5), blocks::AIR);
        });
        let s = surroundings_at(&world, id, Vec2::new(5.5, 5.5), 1.0);
        assert!(s.in_wall);
        assert_eq!(s.unblocked, 1);
        assert!(!s.blocked.up);
        let push = wall_push(&s, &PhysicsConfig::default());
        assert!(push.y < 0.0);
        assert_eq!(push.x, 0.0);
    }

    #[test]
    fn wall_push_prefers_direction_away_from_blocked_side() {
        let s = Surroundings {
            in_wall: true,
            blocked: Blocked {
                up: true,
                down: false,
                left: false,
                right: true,
            },
            unblocked: 2,
            ..Default::default()
        };
        let push = wall_push(&s, &PhysicsConfig::default());
        assert!(push.x < 0.0);
        let boxed = Surroundings {
            blocked: Blocked {
                up: true,
                down: true,
                left: true,
                right: true,
            },
            unblocked: 0,
            ..Default::default()
        };
        assert!(wall_push(&boxed, &PhysicsConfig::default()).y < 0.0);
    }

    #[test]
    fn average_scale_blends_inlay_coverage() {
        let mut world = World::default();
        let outer = world.create_pane(None);
        let inner = world.create_pane(None);
        world.pane_mut(outer).unwrap().fill(blocks::AIR);
        world.pane_mut(inner).unwrap().fill(blocks::AIR);
        world.inset_pane(outer, IVec2::new(8, 8), inner, 8);
        // half inside the 1/3-scale inlay
        let edges = Aabb::new(7.0, 9.0, 9.0, 10.0);
        let avg = average_scale(&world, outer, &edges, 2);
        assert!((avg - (0.5 + 0.5 / 3.0)).abs() < 1e-5);
        assert_eq!(average_scale(&world, outer, &Aabb::new(1.0, 1.0, 2.0, 2.0), 2), 1.0);

        // the same box seen from inside the inlay is three times larger
        let trace = [
            TraceStep::root(outer),
            TraceStep::entered(IVec2::new(8, 8), inner),
        ];
        let local = crate::scale::inner_edges(&edges, Vec2::new(8.0, 8.0), 1.0 / 3.0);
        let ctx = find_context(&world, &local, &trace, 2).unwrap();
        let fs = footprint_scale(&world, &ctx, &PhysicsConfig::default());
        assert!((fs - 3.0 * (0.5 + 0.5 / 3.0)).abs() < 1e-4);
    }

    #[test]
    fn unknown_pane_samples_as_chaos() {
        let world = World::default();
        let ctx = Context {
            pane: PaneId(42),
            edges: Aabb::from_center(Vec2::new(3.0, 3.0), 0.8, 0.8),
            scale: 1.0,
            depth: 0,
            origin: Vec2::ZERO,
        };
        let config = PhysicsConfig::default();
        assert_eq!(footprint_scale(&world, &ctx, &config), 1.0);
        let s = detect_surroundings(&world, &ctx, 1.0, &config);
        assert!(s.in_wall);
    }
}

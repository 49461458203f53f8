use bevy::log::{debug, warn};
use bevy::math::Vec2;

use crate::config::PhysicsConfig;
use crate::entity::{Boost, Entity, EntityId};
use crate::geometry::Aabb;
use crate::movement::{jump_vector, movement_state, ControlProfile, MovementState};
use crate::pane::PaneId;
use crate::scale::inner_velocity;
use crate::surroundings::{detect_surroundings, footprint_scale, wall_push, Blocked, Surroundings};
use crate::trace::{
    apply_relationship, find_context, hallucinate, trace_pos, trace_relationship, trim_trace,
    Context, TraceRelationship, MAX_TRACE_SHIFT,
};
use crate::world::World;

pub const JUMP: &str = "jump";

#[derive(Default, Clone, Copy, Debug)]
pub struct PhysicsCounters {
    pub collision_checks: u64,
    pub reanchors: u64,
    pub wall_pushes: u64,
}

/// What one tick decided for one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub state: MovementState,
    pub surroundings: Surroundings,
    /// Escape velocity when the entity started the tick inside a wall.
    pub push: Option<Vec2>,
    pub relationship: TraceRelationship,
    /// Pane the surroundings were read in and how far above the entity's
    /// pane it sits.
    pub context_pane: PaneId,
    pub context_depth: usize,
}

/// Box of side `size` centered on `pos`, in the entity's own pane.
pub fn entity_edges(pos: Vec2, size: f32) -> Aabb {
    Aabb::from_center(pos, size, size)
}

/// Advances one entity by `dt` milliseconds and keeps pane membership in
/// step with its trace. Returns `None` for unknown or unplaced entities.
pub fn tick_entity(
    world: &mut World,
    id: EntityId,
    dt: f32,
    config: &PhysicsConfig,
    counters: &mut PhysicsCounters,
) -> Option<TickReport> {
    let mut entity = world.take_entity(id)?;
    let before = entity.current_pane();
    let report = advance(world, &mut entity, dt, config, counters);
    let after = entity.current_pane();
    world.put_entity(entity);
    if let Some(to) = after {
        world.relocate(id, before, to);
    }
    report
}

fn advance(
    world: &World,
    e: &mut Entity,
    dt: f32,
    config: &PhysicsConfig,
    counters: &mut PhysicsCounters,
) -> Option<TickReport> {
    if e.trace.is_empty() {
        warn!("[Nestworld] {} has no trace; skipping tick", e.id);
        return None;
    }
    e.tick_cooldowns(dt);

    let nominal = entity_edges(e.pos, e.size);
    let ctx = find_context(world, &nominal, &e.trace, config.context_depth)?;
    e.footprint_scale = footprint_scale(world, &ctx, config);
    let size = e.size * e.footprint_scale;
    let ctx = ctx.with_local_edges(&entity_edges(e.pos, size));
    let s = detect_surroundings(world, &ctx, e.footprint_scale, config);

    let state = movement_state(&s, &e.capabilities);
    let profile = state.profile();
    let passive = state.passive_acceleration(&s, &e.capabilities, config);
    e.vel += passive * dt;

    apply_control(e, &profile, passive, dt, config);
    apply_jump(e, &s, &profile, dt, config);
    apply_boosts(e, dt);
    cap_velocity(e, &s.blocked, config);

    let push = if s.in_wall {
        let push = wall_push(&s, config);
        counters.wall_pushes += 1;
        e.vel = push;
        e.pos += push * dt;
        Some(push)
    } else {
        if s.blocked.down && s.floor_gap > 0.0 && e.vel.y >= 0.0 {
            settle(world, &ctx, e, size, s.floor_gap, config, counters);
        }
        let params = MotionParams {
            pos: e.pos,
            vel: e.vel,
            size,
            dt,
        };
        let result = resolve_motion(world, &ctx, params, config, counters);
        e.pos = result.pos;
        e.vel = result.vel;
        None
    };

    let relationship = reanchor(world, e, size, config, counters);
    debug!(
        "[Nestworld] {} {} pos=({:.3}, {:.3}) vel=({:.5}, {:.5})",
        e.id,
        state.name(),
        e.pos.x,
        e.pos.y,
        e.vel.x,
        e.vel.y
    );
    Some(TickReport {
        state,
        surroundings: s,
        push,
        relationship,
        context_pane: ctx.pane,
        context_depth: ctx.depth,
    })
}

/// Damping and control force for one axis. Returns the new velocity.
fn control_axis(v: f32, input: f32, mult: f32, traction: bool, cap: f32, accel: f32, dt: f32) -> f32 {
    let c = input * mult;
    let mut v = v;
    if traction && (c == 0.0 || c.signum() != v.signum()) {
        v *= 0.5;
    }
    if c == 0.0 {
        return v;
    }
    let next = v + c * accel * dt;
    if next.abs() > cap {
        cap.copysign(next)
    } else {
        next
    }
}

fn apply_control(e: &mut Entity, profile: &ControlProfile, passive: Vec2, dt: f32, config: &PhysicsConfig) {
    let ctl = Vec2::new(e.ctl.x, e.ctl.y).normalize_or_zero();
    e.vel.x = control_axis(
        e.vel.x,
        ctl.x,
        profile.horiz_control,
        profile.traction_x,
        e.hspeed,
        e.accel,
        dt,
    );
    e.vel.y = control_axis(
        e.vel.y,
        ctl.y,
        profile.vert_control,
        profile.traction_y,
        e.vspeed,
        e.accel,
        dt,
    );
    // resting deadzone, only on axes nothing is pushing
    if ctl.x == 0.0 && passive.x == 0.0 && e.vel.x.abs() < config.rest_deadzone {
        e.vel.x = 0.0;
    }
    if ctl.y == 0.0 && passive.y == 0.0 && e.vel.y.abs() < config.rest_deadzone {
        e.vel.y = 0.0;
    }
}

fn apply_jump(e: &mut Entity, s: &Surroundings, profile: &ControlProfile, dt: f32, config: &PhysicsConfig) {
    if !e.ctl.jump {
        return;
    }
    if profile.jump_control > 0.0 && e.cooldown_ready(JUMP) {
        let dir = jump_vector(s, &e.ctl);
        if dir.x * e.vel.x < 0.0 {
            e.vel.x = 0.0;
        }
        if dir.y * e.vel.y < 0.0 {
            e.vel.y = 0.0;
        }
        e.boosts.insert(
            JUMP.to_string(),
            Boost {
                vector: dir,
                magnitude: e.jump * profile.jump_control,
                elapsed: 0.0,
                duration: config.jump_boost_ms,
                max_duration: config.jump_boost_max_ms,
            },
        );
        e.cooldowns.insert(JUMP.to_string(), config.jump_cooldown_ms);
    } else if let Some(boost) = e.boosts.get_mut(JUMP) {
        if boost.elapsed < boost.max_duration {
            boost.duration = (boost.duration + dt).min(boost.max_duration);
        }
    }
}

fn apply_boosts(e: &mut Entity, dt: f32) {
    for boost in e.boosts.values_mut() {
        e.vel += boost.vector * boost.magnitude * boost.remaining().min(dt);
        boost.elapsed += dt;
    }
    e.boosts.retain(|_, b| !b.finished());
}

fn cap_velocity(e: &mut Entity, blocked: &Blocked, config: &PhysicsConfig) {
    e.vel = e.vel.clamp_length_max(config.max_velocity);
    if e.vel.y > e.tvel {
        e.vel.y = e.tvel;
    }
    if (blocked.down && e.vel.y > 0.0) || (blocked.up && e.vel.y < 0.0) {
        e.vel.y = 0.0;
    }
    if (blocked.right && e.vel.x > 0.0) || (blocked.left && e.vel.x < 0.0) {
        e.vel.x = 0.0;
    }
}

/// Drops a supported entity onto the floor below it unless something is in
/// the way.
fn settle(
    world: &World,
    ctx: &Context,
    e: &mut Entity,
    size: f32,
    gap: f32,
    config: &PhysicsConfig,
    counters: &mut PhysicsCounters,
) {
    let edges = entity_edges(e.pos, size);
    let start_bottom = ctx.project(&edges).max_y;
    let settled = edges.translated(Vec2::new(0.0, gap));
    if !obstructed(world, ctx, &settled, start_bottom, true, config, counters) {
        e.pos.y += gap;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MotionParams {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub dt: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionResult {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// True when `edges` (entity pane units) would overlap an obstacle.
/// Platforms only obstruct downward motion that started above them.
fn obstructed(
    world: &World,
    ctx: &Context,
    edges: &Aabb,
    start_bottom: f32,
    moving_down: bool,
    config: &PhysicsConfig,
    counters: &mut PhysicsCounters,
) -> bool {
    counters.collision_checks += 1;
    let table = &world.blocks;
    let eps = config.collision_epsilon * ctx.scale;
    let query = ctx.project(edges).shrunk(eps);
    world.any_block_in(ctx.pane, &query, ctx.depth + config.tick_depth, &mut |b, cell| {
        table.is_solid(b)
            || (moving_down && table.is_platform(b) && start_bottom <= cell.min_y + eps)
    })
}

/// Moves the box as far along `vel * dt` as it can without entering an
/// obstacle, then slides the remainder along each axis separately.
pub fn resolve_motion(
    world: &World,
    ctx: &Context,
    params: MotionParams,
    config: &PhysicsConfig,
    counters: &mut PhysicsCounters,
) -> MotionResult {
    let MotionParams { pos, vel, size, dt } = params;
    let delta = vel * dt;
    if delta == Vec2::ZERO {
        return MotionResult { pos, vel };
    }
    let start = entity_edges(pos, size);
    let start_bottom = ctx.project(&start).max_y;
    let moving_down = delta.y > 0.0;
    let hits = |offset: Vec2, counters: &mut PhysicsCounters| {
        obstructed(
            world,
            ctx,
            &start.translated(offset),
            start_bottom,
            moving_down,
            config,
            counters,
        )
    };

    if !hits(delta, counters) {
        return MotionResult {
            pos: pos + delta,
            vel,
        };
    }

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..config.collision_steps {
        let mid = (lo + hi) * 0.5;
        if hits(delta * mid, counters) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    let mut offset = delta * lo;
    let rest = delta - offset;
    let mut out_vel = vel;

    let step_x = Vec2::new(rest.x, 0.0);
    if step_x.x != 0.0 {
        if hits(offset + step_x, counters) {
            out_vel.x = 0.0;
        } else {
            offset += step_x;
        }
    }
    let step_y = Vec2::new(0.0, rest.y);
    if step_y.y != 0.0 {
        if hits(offset + step_y, counters) {
            out_vel.y = 0.0;
        } else {
            offset += step_y;
        }
    }
    MotionResult {
        pos: pos + offset,
        vel: out_vel,
    }
}

/// Recomputes the trace from the context ancestor after a move and folds the
/// result into the stored trace.
fn reanchor(
    world: &World,
    e: &mut Entity,
    size: f32,
    config: &PhysicsConfig,
    counters: &mut PhysicsCounters,
) -> TraceRelationship {
    let Some(ctx) = find_context(world, &entity_edges(e.pos, size), &e.trace, config.context_depth) else {
        return TraceRelationship::Same;
    };
    let found = trace_pos(world, ctx.pane, ctx.to_context(e.pos), ctx.depth + MAX_TRACE_SHIFT);
    let full = hallucinate(world, &e.trace, ctx.depth);
    let rel = trace_relationship(&full, &found.trace, ctx.depth);
    if rel == TraceRelationship::Same {
        return rel;
    }
    if rel == TraceRelationship::Unrelated {
        warn!(
            "[Nestworld] {} trace unrelated to its new position; adopting fresh trace",
            e.id
        );
    }
    counters.reanchors += 1;

    // one new unit measured in old units
    let sf = found.scale / ctx.scale;
    let mut trace = apply_relationship(&full, &found.trace, rel);
    trim_trace(&mut trace, config.max_trace_len);
    e.trace = trace;
    e.pos = found.pos;
    e.vel = inner_velocity(e.vel, sf);
    for boost in e.boosts.values_mut() {
        boost.magnitude /= sf;
    }
    e.scale *= sf;
    rel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks;
    use crate::config::EntityTemplate;
    use crate::trace::TraceStep;
    use bevy::math::IVec2;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const DT: f32 = 16.0;

    fn air_world() -> (World, PaneId) {
        let mut world = World::default();
        let id = world.create_pane(None);
        world.pane_mut(id).unwrap().fill(blocks::AIR);
        (world, id)
    }

    fn spawn(world: &mut World, pane: PaneId, pos: Vec2) -> EntityId {
        let e = world.create_entity(None, &EntityTemplate::default());
        world.place_entity(e, pane, pos).unwrap();
        e
    }

    fn solid_overlap(world: &World, pane: PaneId, edges: &Aabb) -> bool {
        let eps = PhysicsConfig::default().collision_epsilon;
        world.any_block_in(pane, &edges.shrunk(eps), 2, &mut |b, _| world.blocks.is_solid(b))
    }

    #[test]
    fn falls_and_lands_on_floor() {
        let (mut world, pane) = air_world();
        world
            .pane_mut(pane)
            .unwrap()
            .fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::STONE);
        let id = spawn(&mut world, pane, Vec2::new(5.0, 10.6));
        let config = PhysicsConfig::default();
        let mut counters = PhysicsCounters::default();
        let mut last = None;
        for _ in 0..200 {
            last = tick_entity(&mut world, id, DT, &config, &mut counters);
            let e = world.entity(id).unwrap();
            let bottom = e.pos.y + e.size * e.footprint_scale / 2.0;
            assert!(bottom <= 12.0 + 1e-3, "penetrated floor: bottom={bottom}");
        }
        let e = world.entity(id).unwrap();
        assert_eq!(e.vel.y, 0.0);
        assert!(e.pos.y > 11.0);
        let report = last.unwrap();
        assert!(report.surroundings.on_floor);
        assert_eq!(report.state, MovementState::Standing);
        assert!(counters.collision_checks > 0);
    }

    #[test]
    fn jump_leaves_the_floor() {
        let (mut world, pane) = air_world();
        world
            .pane_mut(pane)
            .unwrap()
            .fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::STONE);
        let id = spawn(&mut world, pane, Vec2::new(5.0, 11.55));
        let config = PhysicsConfig::default();
        let mut counters = PhysicsCounters::default();
        tick_entity(&mut world, id, DT, &config, &mut counters);
        let start_y = world.entity(id).unwrap().pos.y;
        world.entity_mut(id).unwrap().ctl.jump = true;
        let mut highest = start_y;
        for _ in 0..20 {
            tick_entity(&mut world, id, DT, &config, &mut counters);
            highest = highest.min(world.entity(id).unwrap().pos.y);
        }
        assert!(highest < start_y - 0.5, "start={start_y} highest={highest}");
    }

    #[test]
    fn entering_an_inlay_extends_the_trace() {
        let (mut world, outer) = air_world();
        let inner = world.create_pane(None);
        world.pane_mut(inner).unwrap().fill(blocks::AIR);
        world.inset_pane(outer, IVec2::new(8, 8), inner, 8);
        let id = spawn(&mut world, outer, Vec2::new(6.5, 12.0));
        world.entity_mut(id).unwrap().vel = Vec2::new(0.01, 0.0);
        let config = PhysicsConfig {
            gravity: 0.0,
            ..Default::default()
        };
        let mut counters = PhysicsCounters::default();
        for _ in 0..40 {
            tick_entity(&mut world, id, DT, &config, &mut counters);
            if world.entity(id).unwrap().trace.len() > 1 {
                break;
            }
        }
        let e = world.entity(id).unwrap();
        assert_eq!(e.trace.len(), 2);
        assert_eq!(e.current_pane(), Some(inner));
        assert_eq!(e.trace[1].entry, Some(IVec2::new(8, 8)));
        assert!((e.scale - 8.0 / 24.0).abs() < 1e-5);
        // velocity re-expressed in the smaller units
        assert!((e.vel.x - 0.03).abs() < 1e-4);
        assert!(world.pane(inner).unwrap().entities.contains(&id));
        assert!(!world.pane(outer).unwrap().entities.contains(&id));
        assert!(counters.reanchors >= 1);
    }

    #[test]
    fn leaving_an_inlay_retracts_the_trace() {
        let (mut world, outer) = air_world();
        let inner = world.create_pane(None);
        world.pane_mut(inner).unwrap().fill(blocks::AIR);
        world.inset_pane(outer, IVec2::new(8, 8), inner, 8);
        let id = spawn(&mut world, outer, Vec2::new(12.0, 12.0));
        world.set_trace(
            id,
            vec![TraceStep::root(outer), TraceStep::entered(IVec2::new(8, 8), inner)],
        );
        {
            let e = world.entity_mut(id).unwrap();
            e.pos = Vec2::new(1.5, 12.0);
            e.scale = 8.0 / 24.0;
            e.vel = Vec2::new(-0.03, 0.0);
        }
        assert!(world.pane(inner).unwrap().entities.contains(&id));
        let config = PhysicsConfig {
            gravity: 0.0,
            ..Default::default()
        };
        let mut counters = PhysicsCounters::default();
        let mut relationship = None;
        for _ in 0..40 {
            let report = tick_entity(&mut world, id, DT, &config, &mut counters).unwrap();
            if world.entity(id).unwrap().trace.len() == 1 {
                relationship = Some(report.relationship);
                break;
            }
        }
        assert_eq!(relationship, Some(TraceRelationship::Retracted(1)));
        let e = world.entity(id).unwrap();
        assert_eq!(e.current_pane(), Some(outer));
        assert_eq!(e.trace[0].entry, None);
        assert!((e.scale - 1.0).abs() < 1e-5);
        // velocity re-expressed in the larger units
        assert!((e.vel.x + 0.01).abs() < 1e-4);
        assert!(e.pos.x < 8.0);
        assert!((e.pos.y - 12.0).abs() < 1e-3);
        assert!(world.pane(outer).unwrap().entities.contains(&id));
        assert!(!world.pane(inner).unwrap().entities.contains(&id));
    }

    #[test]
    fn settles_onto_a_floor_inside_an_inlay() {
        let (mut world, outer) = air_world();
        let inner = world.create_pane(None);
        {
            let p = world.pane_mut(inner).unwrap();
            p.fill(blocks::AIR);
            p.fill_rect(IVec2::new(0, 1), IVec2::new(24, 2), blocks::STONE);
        }
        world.inset_pane(outer, IVec2::new(8, 8), inner, 8);
        let id = spawn(&mut world, outer, Vec2::new(12.0, 6.0));
        let config = PhysicsConfig::default();
        let mut counters = PhysicsCounters::default();
        let mut last = None;
        for _ in 0..300 {
            last = tick_entity(&mut world, id, DT, &config, &mut counters);
        }
        let report = last.unwrap();
        assert_eq!(report.state, MovementState::Standing);
        assert!(!report.surroundings.in_wall);
        let e = world.entity(id).unwrap();
        let ebox = entity_edges(e.pos, e.size * e.footprint_scale);
        let ctx = find_context(&world, &ebox, &e.trace, e.trace.len() - 1).unwrap();
        assert_eq!(ctx.pane, outer);
        // stone row 1 of the 1/3-scale inlay starts at 8 + 1/3
        let bottom = ctx.project(&ebox).max_y;
        assert!((bottom - (8.0 + 1.0 / 3.0)).abs() < 1e-3, "bottom={bottom}");
    }

    #[test]
    fn membership_follows_trace_through_inlays() {
        let (mut world, outer) = air_world();
        let inner = world.create_pane(None);
        world.pane_mut(inner).unwrap().fill(blocks::AIR);
        world.inset_pane(outer, IVec2::new(8, 8), inner, 8);
        let id = spawn(&mut world, outer, Vec2::new(4.0, 12.0));
        let config = PhysicsConfig {
            gravity: 0.0,
            ..Default::default()
        };
        let mut counters = PhysicsCounters::default();
        for step in 0..300 {
            world.entity_mut(id).unwrap().ctl.x = if step < 150 { 1.0 } else { -1.0 };
            tick_entity(&mut world, id, DT, &config, &mut counters);
            let e = world.entity(id).unwrap();
            let owner: Vec<PaneId> = world
                .pane_ids()
                .filter(|p| world.pane(*p).unwrap().entities.contains(&id))
                .collect();
            assert_eq!(owner, vec![e.current_pane().unwrap()]);
        }
    }

    #[test]
    fn embedded_entity_is_pushed_toward_the_opening() {
        let (mut world, pane) = air_world();
        {
            let p = world.pane_mut(pane).unwrap();
            p.fill(blocks::STONE);
            p.fill_rect(IVec2::new(5, 0), IVec2::new(6, 5), blocks::AIR);
        }
        let e = world.create_entity(
            None,
            &EntityTemplate {
                size: 1.0,
                ..Default::default()
            },
        );
        world.place_entity(e, pane, Vec2::new(5.5, 5.5)).unwrap();
        let mut counters = PhysicsCounters::default();
        let report = tick_entity(&mut world, e, DT, &PhysicsConfig::default(), &mut counters).unwrap();
        let push = report.push.unwrap();
        assert!(push.y < 0.0);
        assert_eq!(report.surroundings.unblocked, 1);
        assert!(world.entity(e).unwrap().pos.y < 5.5);
        assert_eq!(counters.wall_pushes, 1);
    }

    #[test]
    fn resolved_motion_never_enters_solid_blocks() {
        let mut rng = SmallRng::seed_from_u64(7);
        let config = PhysicsConfig::default();
        let mut counters = PhysicsCounters::default();
        for _ in 0..60 {
            let (mut world, pane) = air_world();
            {
                let p = world.pane_mut(pane).unwrap();
                for _ in 0..6 {
                    let min = IVec2::new(rng.gen_range(0..22), rng.gen_range(0..22));
                    let max = min + IVec2::new(rng.gen_range(1..4), rng.gen_range(1..4));
                    p.fill_rect(min, max, blocks::STONE);
                }
            }
            let size = EntityTemplate::default().size;
            let start = loop {
                let candidate = Vec2::new(rng.gen_range(2.0..22.0), rng.gen_range(2.0..22.0));
                if !solid_overlap(&world, pane, &entity_edges(candidate, size)) {
                    break candidate;
                }
            };
            let id = spawn(&mut world, pane, start);
            world.entity_mut(id).unwrap().vel =
                Vec2::new(rng.gen_range(-0.04..0.04), rng.gen_range(-0.04..0.04));
            tick_entity(&mut world, id, DT, &config, &mut counters);
            let e = world.entity(id).unwrap();
            assert!(
                !solid_overlap(&world, pane, &entity_edges(e.pos, size)),
                "entity entered a solid block at {:?} from {:?}",
                e.pos,
                start
            );
        }
    }

    #[test]
    fn platforms_only_block_from_above() {
        let (mut world, pane) = air_world();
        world
            .pane_mut(pane)
            .unwrap()
            .fill_rect(IVec2::new(0, 12), IVec2::new(24, 13), blocks::BRIDGE);
        let ctx = Context {
            pane,
            edges: entity_edges(Vec2::new(5.0, 11.0), 0.8),
            scale: 1.0,
            depth: 0,
            origin: Vec2::ZERO,
        };
        let config = PhysicsConfig::default();
        let mut counters = PhysicsCounters::default();
        let down = resolve_motion(
            &world,
            &ctx,
            MotionParams {
                pos: Vec2::new(5.0, 11.0),
                vel: Vec2::new(0.0, 0.04),
                size: 0.8,
                dt: DT,
            },
            &config,
            &mut counters,
        );
        assert!(down.pos.y + 0.4 <= 12.0 + 2e-4);
        assert_eq!(down.vel.y, 0.0);
        // rising through the bridge from below is allowed
        let up = resolve_motion(
            &world,
            &ctx,
            MotionParams {
                pos: Vec2::new(5.0, 13.0),
                vel: Vec2::new(0.0, -0.04),
                size: 0.8,
                dt: DT,
            },
            &config,
            &mut counters,
        );
        assert!((up.pos.y - (13.0 - 0.64)).abs() < 1e-4);
    }

    #[test]
    fn control_axis_pins_at_cap() {
        let v = control_axis(0.0079, 1.0, 1.0, true, 0.008, 0.0001, 16.0);
        assert_eq!(v, 0.008);
        // opposing input with traction halves before accelerating
        let v = control_axis(0.004, -1.0, 1.0, true, 0.008, 0.0, 16.0);
        assert_eq!(v, 0.002);
        let v = control_axis(0.004, 0.0, 1.0, false, 0.008, 0.0001, 16.0);
        assert_eq!(v, 0.004);
    }
}

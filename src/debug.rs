use std::collections::HashSet;

use bevy::prelude::{App, IntoSystemConfigs, Plugin, Res, ResMut, Resource, SystemSet, Update, Vec2};

use crate::blocks::BlockId;
use crate::config::PhysicsConfig;
use crate::entity::EntityId;
use crate::physics::SimulationSet;
use crate::physics_core::{entity_edges, TickReport};
use crate::simulation::Simulation;
use crate::surroundings::{sample_tiles, wall_push, Direction};
use crate::trace::find_context;
use crate::world::World;

#[derive(Resource, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct DebugOverlayConfig {
    pub show: bool,
    pub features: HashSet<String>,
    /// Entity whose state is shown; the lowest id when unset.
    pub entity: Option<u32>,
}

/// Text a host can print or draw; refreshed after every simulation tick.
#[derive(Resource, Clone, Default, Debug)]
pub struct DebugOverlayText {
    pub lines: Vec<String>,
}

/// Refreshes `DebugOverlayText`; runs after `SimulationSet`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebugOverlaySet;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DebugOverlayConfig::default())
            .insert_resource(DebugOverlayText::default())
            .add_systems(
                Update,
                update_debug_overlay_text
                    .in_set(DebugOverlaySet)
                    .after(SimulationSet),
            );
    }
}

fn update_debug_overlay_text(
    config: Res<DebugOverlayConfig>,
    sim: Res<Simulation>,
    mut text: ResMut<DebugOverlayText>,
) {
    text.lines.clear();
    if !config.show {
        return;
    }
    let show_all = config.features.is_empty();
    let target = config
        .entity
        .map(EntityId)
        .or_else(|| sim.world.entity_ids().first().copied());
    let Some(id) = target else {
        return;
    };
    if show_all || config.features.contains("state") {
        if let Some(report) = sim.reports.get(&id) {
            text.lines = surroundings_lines(report, &sim.config);
        }
    }
    if show_all || config.features.contains("position") {
        if let Some(snap) = sim.snapshot(id) {
            text.lines.push(format!(
                "{} in pane#{} at ({:.2}, {:.2}) scale {:.4} depth {}",
                id, snap.pane, snap.pos[0], snap.pos[1], snap.scale, snap.trace_len
            ));
        }
    }
}

/// The entity-state overlay: blocked directions, what the entity is inside
/// of, the push-out velocity when embedded, and the movement state.
pub fn surroundings_lines(report: &TickReport, config: &PhysicsConfig) -> Vec<String> {
    let s = &report.surroundings;
    let mut lines = Vec::new();

    let mut blocked = String::from("Blocked:");
    if s.unblocked < 4 {
        for (dir, name) in [
            (Direction::Up, "up"),
            (Direction::Down, "down"),
            (Direction::Left, "left"),
            (Direction::Right, "right"),
        ] {
            if s.blocked.is(dir) {
                blocked.push(' ');
                blocked.push_str(name);
            }
        }
    } else {
        blocked.push_str(" <none>");
    }
    lines.push(blocked);

    let inside: Vec<&str> = [
        (s.in_wall, "wall"),
        (s.in_liquid, "liquid"),
        (s.in_climbable, "climbable"),
    ]
    .into_iter()
    .filter_map(|(flag, name)| flag.then_some(name))
    .collect();
    if !inside.is_empty() {
        lines.push(format!("In: {}", inside.join(" ")));
    }

    if s.in_wall {
        let push = report.push.unwrap_or_else(|| wall_push(s, config));
        lines.push(format!("Pushout ({}): {}, {}", s.unblocked, push.x, push.y));
    }
    lines.push(format!("State: {}", report.state.name()));
    lines
}

/// The surroundings tile grid mapped into the entity's own pane frame:
/// each tile's center and sampled block.
pub fn tile_centers(world: &World, id: EntityId, config: &PhysicsConfig) -> Vec<(Vec2, Option<BlockId>)> {
    let Some(e) = world.entity(id) else {
        return Vec::new();
    };
    let ebox = entity_edges(e.pos, e.size * e.footprint_scale);
    let Some(ctx) = find_context(world, &ebox, &e.trace, config.context_depth) else {
        return Vec::new();
    };
    sample_tiles(world, &ctx, config)
        .into_iter()
        .map(|t| (ctx.rebox_to_local(&ebox, t.bounds.center()), t.block))
        .collect()
}

use std::collections::{BTreeMap, HashSet};

use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use serde::Serialize;

use crate::config::PhysicsConfig;
use crate::entity::EntityId;
use crate::movement::MovementState;
use crate::pane::PaneId;
use crate::physics_core::{entity_edges, tick_entity, PhysicsCounters, TickReport};
use crate::trace::find_context;
use crate::world::World;

/// A world together with the clock that drives it.
#[derive(Resource, Clone, Debug)]
pub struct Simulation {
    pub world: World,
    pub config: PhysicsConfig,
    last_tick_ms: Option<f64>,
    block_timer: f32,
    pub ticks: u64,
    pub counters: PhysicsCounters,
    /// Latest tick report per entity.
    pub reports: BTreeMap<EntityId, TickReport>,
    /// Parentless panes already reported as cutting a context short.
    parentless_warned: HashSet<PaneId>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(World::default(), PhysicsConfig::default())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: u32,
    pub pane: u32,
    pub pos: [f32; 2],
    pub vel: [f32; 2],
    pub scale: f32,
    pub size: f32,
    pub trace_len: usize,
    pub state: Option<MovementState>,
}

impl Simulation {
    pub fn new(world: World, config: PhysicsConfig) -> Self {
        Self {
            world,
            config,
            last_tick_ms: None,
            block_timer: 0.0,
            ticks: 0,
            counters: PhysicsCounters::default(),
            reports: BTreeMap::new(),
            parentless_warned: HashSet::new(),
        }
    }

    /// Forgets the previous timestamp so the next tick only re-arms the clock.
    pub fn reset_clock(&mut self) {
        self.last_tick_ms = None;
        info!("[Nestworld] simulation clock reset");
    }

    /// Runs one frame at host time `now_ms`. The first call after creation
    /// or a clock reset only records the timestamp. Returns the dilated
    /// elapsed time that was simulated.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        let last = self.last_tick_ms.replace(now_ms)?;
        let raw = (now_ms - last) as f32;
        let elapsed = raw.clamp(0.0, self.config.max_elapsed_ms) * self.config.time_dilation;

        for id in self.world.entity_ids() {
            if let Some(report) =
                tick_entity(&mut self.world, id, elapsed, &self.config, &mut self.counters)
            {
                if report.context_depth < self.config.context_depth
                    && self.parentless_warned.insert(report.context_pane)
                {
                    warn!(
                        "[Nestworld] {} has no parents; context for {} stops {} levels up",
                        report.context_pane, id, report.context_depth
                    );
                }
                self.reports.insert(id, report);
            }
        }

        self.block_timer += elapsed;
        let interval = self.config.block_tick_ms;
        if interval > 0.0 && self.block_timer >= interval {
            self.block_timer %= interval;
            let scope = self.panes_in_scope();
            debug!("[Nestworld] ticking blocks in {} panes", scope.len());
            self.world.tick_blocks(&scope);
        }

        self.ticks += 1;
        Some(elapsed)
    }

    /// Every pane near an entity: its context pane plus inlays reachable
    /// from there within the tick depth. Each pane appears once even when
    /// several inlay paths lead to it.
    pub fn panes_in_scope(&self) -> HashSet<PaneId> {
        let mut visited = HashSet::new();
        for id in self.world.entity_ids() {
            let Some(e) = self.world.entity(id) else {
                continue;
            };
            let edges = entity_edges(e.pos, e.size);
            let Some(ctx) = find_context(&self.world, &edges, &e.trace, self.config.context_depth)
            else {
                continue;
            };
            let mut frontier = vec![(ctx.pane, ctx.depth + self.config.tick_depth)];
            while let Some((pane, remaining)) = frontier.pop() {
                if !visited.insert(pane) {
                    continue;
                }
                if remaining == 0 {
                    continue;
                }
                if let Some(p) = self.world.pane(pane) {
                    frontier.extend(p.inlays.iter().map(|inl| (inl.id, remaining - 1)));
                }
            }
        }
        visited
    }

    pub fn snapshot(&self, id: EntityId) -> Option<EntitySnapshot> {
        let e = self.world.entity(id)?;
        Some(EntitySnapshot {
            id: id.0,
            pane: e.current_pane()?.0,
            pos: e.pos.to_array(),
            vel: e.vel.to_array(),
            scale: e.scale,
            size: e.size * e.footprint_scale,
            trace_len: e.trace.len(),
            state: self.reports.get(&id).map(|r| r.state),
        })
    }
}

use bevy::prelude::*;

use crate::simulation::Simulation;

/// Runs the nested-world tick once per frame. Hosts order input systems
/// `.before(SimulationSet)` so control fields are fresh when the tick reads
/// them.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Simulation>()
            .insert_resource(SimulationStats::default())
            .add_systems(Update, tick_simulation.in_set(SimulationSet));
    }
}

/// Per-frame counters published after each tick.
#[derive(Resource, Clone, Default, Debug, serde::Serialize)]
pub struct SimulationStats {
    pub frame_time_ms: f32,
    pub simulated_ms: f32,
    pub ticks: u64,
    pub entity_count: usize,
    pub collision_checks: u64,
    pub reanchors: u64,
    pub wall_pushes: u64,
}

fn tick_simulation(time: Res<Time>, mut sim: ResMut<Simulation>, mut stats: ResMut<SimulationStats>) {
    let before = sim.counters;
    let simulated = sim.tick(time.elapsed_secs_f64() * 1000.0);
    let after = sim.counters;

    stats.frame_time_ms = time.delta_secs() * 1000.0;
    stats.simulated_ms = simulated.unwrap_or(0.0);
    stats.ticks = sim.ticks;
    stats.entity_count = sim.world.entity_ids().len();
    stats.collision_checks = after.collision_checks.saturating_sub(before.collision_checks);
    stats.reanchors = after.reanchors.saturating_sub(before.reanchors);
    stats.wall_pushes = after.wall_pushes.saturating_sub(before.wall_pushes);
}

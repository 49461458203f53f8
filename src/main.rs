use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use nestworld::debug::{DebugOverlayConfig, DebugOverlaySet, DebugOverlayText, DebugPlugin};
use nestworld::levels::demo_world;
use nestworld::{EntityId, Simulation, SimulationPlugin, SimulationSet, StartupConfig};

#[derive(Resource)]
struct Player(EntityId);

#[derive(Resource)]
struct FrameBudget {
    remaining: u32,
    frame: u32,
}

fn load_startup_config() -> StartupConfig {
    let path = std::env::var("NESTWORLD_CONFIG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "nestworld.json".to_string());
    if !std::path::Path::new(&path).exists() {
        return StartupConfig::default();
    }
    match StartupConfig::from_path(&path) {
        Ok(cfg) => {
            println!("[Nestworld] Loaded startup config from {}", path);
            cfg
        }
        Err(e) => {
            eprintln!("[Nestworld] {}; using defaults", e);
            StartupConfig::default()
        }
    }
}

/// Walks right, turning around every five seconds, and hops every second.
fn drive_player(budget: Res<FrameBudget>, player: Res<Player>, mut sim: ResMut<Simulation>) {
    let frame = budget.frame;
    let Some(e) = sim.world.entity_mut(player.0) else {
        return;
    };
    e.ctl.x = if (frame / 300) % 2 == 0 { 1.0 } else { -1.0 };
    e.ctl.jump = frame % 60 < 12;
}

fn report_progress(
    mut budget: ResMut<FrameBudget>,
    player: Res<Player>,
    sim: Res<Simulation>,
    overlay: Res<DebugOverlayText>,
    mut exit: EventWriter<AppExit>,
) {
    budget.frame += 1;
    if budget.frame % 60 == 0 {
        for line in &overlay.lines {
            info!("[Nestworld] {}", line);
        }
    }
    budget.remaining = budget.remaining.saturating_sub(1);
    if budget.remaining == 0 {
        match sim.snapshot(player.0).map(|s| serde_json::to_string_pretty(&s)) {
            Some(Ok(json)) => println!("{json}"),
            Some(Err(e)) => eprintln!("[Nestworld] Failed to encode snapshot: {e}"),
            None => eprintln!("[Nestworld] Player {} has no snapshot", player.0),
        }
        exit.send(AppExit::Success);
    }
}

fn main() {
    let startup = load_startup_config();
    let (world, player) = demo_world(&startup.world_name, startup.seed, &startup.player);
    println!(
        "[Nestworld] Starting HEADLESS run of '{}' for {} frames",
        startup.world_name, startup.frames
    );

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
    )
    .add_plugins(LogPlugin::default())
    .insert_resource(Simulation::new(world, startup.physics))
    .insert_resource(Player(player))
    .insert_resource(FrameBudget {
        remaining: startup.frames.max(1),
        frame: 0,
    })
    .add_plugins(SimulationPlugin)
    .add_plugins(DebugPlugin)
    .insert_resource(DebugOverlayConfig {
        show: true,
        ..default()
    })
    .add_systems(Update, drive_player.before(SimulationSet))
    .add_systems(Update, report_progress.after(DebugOverlaySet));
    app.run();
}

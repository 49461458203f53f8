use serde::{Deserialize, Serialize};

use crate::entity::Capabilities;

/// Default number of ancestor levels examined around an entity.
pub const DEFAULT_CONTEXT_DEPTH: usize = 2;
/// Default number of inlay levels resolved below a context before terrain
/// becomes chaos.
pub const TICK_DEPTH: usize = 2;

/// Tunable simulation constants. Distances are in units of the pane being
/// evaluated, times in milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub time_dilation: f32,
    pub max_elapsed_ms: f32,
    pub gravity: f32,
    /// Upward push per unit of submerged fraction, as a multiple of gravity.
    pub buoyancy: f32,
    pub max_velocity: f32,
    pub rest_deadzone: f32,
    pub context_depth: usize,
    pub tick_depth: usize,
    pub collision_steps: u32,
    pub collision_epsilon: f32,
    pub tile_resolution: f32,
    pub probe_fraction: f32,
    pub probe_cap: f32,
    pub wall_push_speed: f32,
    pub jump_cooldown_ms: f32,
    pub jump_boost_ms: f32,
    pub jump_boost_max_ms: f32,
    pub block_tick_ms: f32,
    pub max_trace_len: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_dilation: 1.0,
            max_elapsed_ms: 50.0,
            gravity: 0.000_05,
            buoyancy: 1.2,
            max_velocity: 0.04,
            rest_deadzone: 0.000_2,
            context_depth: DEFAULT_CONTEXT_DEPTH,
            tick_depth: TICK_DEPTH,
            collision_steps: 6,
            collision_epsilon: 0.000_1,
            tile_resolution: 0.25,
            probe_fraction: 0.15,
            probe_cap: 0.12,
            wall_push_speed: 0.004,
            jump_cooldown_ms: 300.0,
            jump_boost_ms: 100.0,
            jump_boost_max_ms: 220.0,
            block_tick_ms: 1000.0,
            max_trace_len: 64,
        }
    }
}

/// Movement parameters for a newly created entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTemplate {
    pub size: f32,
    pub accel: f32,
    pub hspeed: f32,
    pub vspeed: f32,
    pub tvel: f32,
    pub jump: f32,
    pub capabilities: Capabilities,
}

impl Default for EntityTemplate {
    fn default() -> Self {
        Self {
            size: 0.8,
            accel: 0.000_08,
            hspeed: 0.008,
            vspeed: 0.006,
            tvel: 0.025,
            jump: 0.000_12,
            capabilities: Capabilities::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub world_name: String,
    pub seed: u64,
    /// Frames the headless host runs before exiting.
    pub frames: u32,
    pub physics: PhysicsConfig,
    pub player: EntityTemplate,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            world_name: "main".to_string(),
            seed: 17,
            frames: 600,
            physics: PhysicsConfig::default(),
            player: EntityTemplate {
                capabilities: Capabilities {
                    swim: true,
                    climb: true,
                    hang: true,
                    wall_slide: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }
}

impl StartupConfig {
    pub fn from_json(contents: &str) -> Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| format!("invalid config: {e}"))
    }

    pub fn from_path(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
        Self::from_json(&contents)
    }
}

use bevy::math::Vec2;
use serde::Serialize;

use crate::config::PhysicsConfig;
use crate::entity::{Capabilities, Control};
use crate::surroundings::Surroundings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    Falling,
    Sliding,
    Swimming,
    Floating,
    Climbing,
    Slipping,
    Standing,
}

/// How much of the entity's control input each state honours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlProfile {
    pub horiz_control: f32,
    pub vert_control: f32,
    pub jump_control: f32,
    pub traction_x: bool,
    pub traction_y: bool,
}

impl MovementState {
    pub fn name(self) -> &'static str {
        match self {
            MovementState::Falling => "falling",
            MovementState::Sliding => "sliding",
            MovementState::Swimming => "swimming",
            MovementState::Floating => "floating",
            MovementState::Climbing => "climbing",
            MovementState::Slipping => "slipping",
            MovementState::Standing => "standing",
        }
    }

    pub fn profile(self) -> ControlProfile {
        let (horiz_control, vert_control, jump_control, traction_x, traction_y) = match self {
            MovementState::Falling => (0.3, 0.0, 0.0, false, false),
            MovementState::Sliding => (0.5, 0.0, 1.0, false, false),
            MovementState::Swimming => (0.8, 0.8, 0.0, true, true),
            MovementState::Floating => (0.3, 0.1, 0.0, true, true),
            MovementState::Climbing => (0.6, 0.6, 1.0, true, true),
            MovementState::Slipping => (0.25, 0.0, 1.0, false, false),
            MovementState::Standing => (1.0, 0.0, 1.0, true, false),
        };
        ControlProfile {
            horiz_control,
            vert_control,
            jump_control,
            traction_x,
            traction_y,
        }
    }

    /// Acceleration applied regardless of control input, in units/ms^2.
    pub fn passive_acceleration(self, s: &Surroundings, caps: &Capabilities, config: &PhysicsConfig) -> Vec2 {
        match self {
            MovementState::Falling => Vec2::new(0.0, config.gravity),
            MovementState::Sliding => Vec2::new(0.0, config.gravity * 0.5),
            MovementState::Floating => {
                if caps.neutral_buoyancy {
                    Vec2::ZERO
                } else {
                    let lift = config.buoyancy * submerged_portion(s);
                    Vec2::new(0.0, config.gravity * (1.0 - lift))
                }
            }
            _ => Vec2::ZERO,
        }
    }
}

/// Fraction of the entity below the liquid surface.
///
/// Liquid depth is not modeled yet: any contact with liquid counts as full
/// submersion.
pub fn submerged_portion(s: &Surroundings) -> f32 {
    if s.in_liquid {
        1.0
    } else {
        0.0
    }
}

/// Picks the movement state for this tick. Liquid wins over support, support
/// over climbing, climbing over sliding.
pub fn movement_state(s: &Surroundings, caps: &Capabilities) -> MovementState {
    if s.in_liquid {
        return if caps.swim {
            MovementState::Swimming
        } else {
            MovementState::Floating
        };
    }
    if s.on_floor || s.on_platform {
        return if s.slippery_floor && !caps.skate {
            MovementState::Slipping
        } else {
            MovementState::Standing
        };
    }
    let climbing = (caps.climb && (s.climbable_adjacent || s.in_climbable))
        || (caps.climb_smooth && s.smooth_adjacent)
        || (caps.hang && s.climbable_above)
        || (caps.hang_smooth && s.smooth_above);
    if climbing {
        return MovementState::Climbing;
    }
    let sliding =
        (caps.wall_slide && s.climbable_adjacent) || (caps.slide_smooth && s.smooth_adjacent);
    if sliding {
        return MovementState::Sliding;
    }
    MovementState::Falling
}

/// Direction of a jump given what the entity is pressed against.
pub fn jump_vector(s: &Surroundings, ctl: &Control) -> Vec2 {
    let b = &s.blocked;
    if b.up && !b.down {
        // hanging from a ceiling: kick sideways, or let go
        return if ctl.x > 0.0 {
            Vec2::X
        } else if ctl.x < 0.0 {
            Vec2::NEG_X
        } else {
            Vec2::Y
        };
    }
    if s.on_floor || s.on_platform {
        return Vec2::NEG_Y;
    }
    if b.left && !b.right {
        return Vec2::new(0.6, -0.8);
    }
    if b.right && !b.left {
        return Vec2::new(-0.6, -0.8);
    }
    Vec2::NEG_Y
}

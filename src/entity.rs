use std::collections::BTreeMap;
use std::fmt;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::EntityTemplate;
use crate::pane::{PaneId, PANE_SIZE};
use crate::trace::Trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Movement affordances. All off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub swim: bool,
    pub climb: bool,
    pub climb_smooth: bool,
    pub hang: bool,
    pub hang_smooth: bool,
    pub wall_slide: bool,
    pub slide_smooth: bool,
    pub skate: bool,
    pub neutral_buoyancy: bool,
}

/// Written by input translation once per frame, read by the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Control {
    pub x: f32,
    pub y: f32,
    pub jump: bool,
}

/// A time-limited velocity injection. `magnitude` is an acceleration in
/// units/ms^2 applied along `vector` while `elapsed < duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boost {
    pub vector: Vec2,
    pub magnitude: f32,
    pub elapsed: f32,
    pub duration: f32,
    pub max_duration: f32,
}

impl Boost {
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Appearance {
    pub color: String,
    pub border_color: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: "#429".to_string(),
            border_color: "#63b".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Home {
    pub pane: PaneId,
    pub pos: Vec2,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    /// Side length in units of the current pane.
    pub size: f32,
    pub appearance: Appearance,
    pub home: Option<Home>,
    pub trace: Trace,
    /// Position in units of the current pane (the trace's last step).
    pub pos: Vec2,
    /// Units per ms.
    pub vel: Vec2,
    /// Cumulative scale relative to the home pane.
    pub scale: f32,
    /// Footprint scale relative to the current pane from the last tick.
    pub footprint_scale: f32,
    pub accel: f32,
    pub hspeed: f32,
    pub vspeed: f32,
    pub tvel: f32,
    pub jump: f32,
    pub ctl: Control,
    pub capabilities: Capabilities,
    /// Named countdown timers in ms.
    pub cooldowns: BTreeMap<String, f32>,
    pub boosts: BTreeMap<String, Boost>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self::from_template(id, &EntityTemplate::default())
    }

    pub fn from_template(id: EntityId, template: &EntityTemplate) -> Self {
        Self {
            id,
            size: template.size,
            appearance: Appearance::default(),
            home: None,
            trace: Vec::new(),
            pos: Vec2::splat(PANE_SIZE as f32 / 2.0),
            vel: Vec2::ZERO,
            scale: 1.0,
            footprint_scale: 1.0,
            accel: template.accel,
            hspeed: template.hspeed,
            vspeed: template.vspeed,
            tvel: template.tvel,
            jump: template.jump,
            ctl: Control::default(),
            capabilities: template.capabilities,
            cooldowns: BTreeMap::new(),
            boosts: BTreeMap::new(),
        }
    }

    /// Innermost pane of the trace, if the entity has been placed.
    pub fn current_pane(&self) -> Option<PaneId> {
        self.trace.last().map(|step| step.pane)
    }

    pub fn cooldown_ready(&self, name: &str) -> bool {
        self.cooldowns.get(name).map_or(true, |t| *t <= 0.0)
    }

    pub fn tick_cooldowns(&mut self, dt: f32) {
        for t in self.cooldowns.values_mut() {
            *t = (*t - dt).max(0.0);
        }
    }
}

//! Traces: an entity's materialized path of embeddings, and the context
//! resolution that walks it.
//!
//! A trace is ordered outermost first. Every step after the first records
//! the anchor, in the previous step's units, of the inlay that was entered.
//! When a trace is too short for a requested context depth the missing
//! ancestors are hallucinated from each pane's canonical parent. All walks
//! are bounded by explicit depths, never by cycle detection, because panes
//! may embed themselves.

use bevy::log::{debug, warn};
use bevy::math::{IVec2, Vec2};

use crate::geometry::Aabb;
use crate::scale::{inner_point, outer_edges, rebox};
use crate::world::World;
use crate::pane::PaneId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceStep {
    /// Anchor of the inlay entered, in the previous step's units.
    pub entry: Option<IVec2>,
    pub pane: PaneId,
}

impl TraceStep {
    pub fn root(pane: PaneId) -> Self {
        Self { entry: None, pane }
    }

    pub fn entered(at: IVec2, pane: PaneId) -> Self {
        Self {
            entry: Some(at),
            pane,
        }
    }
}

pub type Trace = Vec<TraceStep>;

/// The pane and frame in which an entity's surroundings are evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Context {
    pub pane: PaneId,
    /// The query box expressed in `pane`'s units.
    pub edges: Aabb,
    /// Size of one unit of the entity's own pane in `pane`'s units.
    pub scale: f32,
    /// How many levels above the entity's pane `pane` sits.
    pub depth: usize,
    /// Where the entity's pane origin lands in `pane`'s units.
    pub origin: Vec2,
}

impl Context {
    /// Maps a point from the entity's own pane into the context pane.
    pub fn to_context(&self, p: Vec2) -> Vec2 {
        self.origin + p * self.scale
    }

    pub fn from_context(&self, p: Vec2) -> Vec2 {
        inner_point(p, self.origin, self.scale)
    }

    /// Re-projects a box from the entity's pane into the context pane.
    pub fn project(&self, local: &Aabb) -> Aabb {
        let min = self.to_context(local.min());
        let max = self.to_context(local.max());
        Aabb::new(min.x, min.y, max.x, max.y)
    }

    /// Same frame, different query box (given in the entity's own units).
    pub fn with_local_edges(&self, local: &Aabb) -> Context {
        Context {
            edges: self.project(local),
            ..*self
        }
    }

    /// Maps a point given in the context frame back into the entity's pane
    /// frame using the reference box the context was built from.
    pub fn rebox_to_local(&self, local_box: &Aabb, p: Vec2) -> Vec2 {
        rebox(&self.edges, local_box, p)
    }
}

/// Walks up to `depth` steps outward from the end of `trace`, converting
/// `edges` (given in the trace's innermost pane) into each ancestor's units.
/// Returns `None` only for an empty trace. The achieved depth is smaller
/// than requested when a parentless pane blocks hallucination.
pub fn find_context(world: &World, edges: &Aabb, trace: &[TraceStep], depth: usize) -> Option<Context> {
    let Some(last) = trace.last() else {
        warn!("[Nestworld] empty trace has no context");
        return None;
    };
    let mut ctx = Context {
        pane: last.pane,
        edges: *edges,
        scale: 1.0,
        depth: 0,
        origin: Vec2::ZERO,
    };
    // Index of the step whose pane is `ctx.pane`; `None` once hallucinating.
    let mut idx = Some(trace.len() - 1);
    for _ in 0..depth {
        let step = match idx {
            Some(i) if i > 0 => {
                let parent = trace[i - 1].pane;
                let Some(at) = trace[i].entry else {
                    warn!("[Nestworld] trace step {i} has no entry point");
                    break;
                };
                let Some(sf) = world.scale_factor_at(parent, at) else {
                    warn!("[Nestworld] {parent} has no inlay at {at} for trace step {i}");
                    break;
                };
                idx = Some(i - 1);
                (parent, at, sf)
            }
            _ => {
                idx = None;
                let Some((parent, inlay)) = world.canonical_inlay(ctx.pane) else {
                    debug!("[Nestworld] {} has no parents; context stops at depth {}", ctx.pane, ctx.depth);
                    break;
                };
                (parent, inlay.at, inlay.scale_factor())
            }
        };
        let (parent, at, sf) = step;
        let anchor = at.as_vec2();
        ctx.edges = outer_edges(&ctx.edges, anchor, sf);
        ctx.origin = anchor + ctx.origin * sf;
        ctx.scale *= sf;
        ctx.pane = parent;
        ctx.depth += 1;
    }
    Some(ctx)
}

/// Prepends canonical ancestors until the trace holds at least `depth + 1`
/// steps, or a parentless pane is reached. This materializes exactly the
/// ancestors `find_context` hallucinates.
pub fn hallucinate(world: &World, trace: &[TraceStep], depth: usize) -> Trace {
    let mut out: Trace = trace.to_vec();
    while out.len() < depth + 1 {
        let Some(head) = out.first().map(|s| s.pane) else {
            break;
        };
        let Some((parent, inlay)) = world.canonical_inlay(head) else {
            break;
        };
        out[0].entry = Some(inlay.at);
        out.insert(0, TraceStep::root(parent));
    }
    out
}

/// Result of locating a position from a base pane downward.
#[derive(Clone, Debug, PartialEq)]
pub struct TracedPosition {
    pub trace: Trace,
    /// Position in the innermost pane's units.
    pub pos: Vec2,
    /// Size of one innermost unit in base-pane units.
    pub scale: f32,
}

/// Descends from `pane` into whichever inlay contains `pos`, at most
/// `depth` times.
pub fn trace_pos(world: &World, pane: PaneId, pos: Vec2, depth: usize) -> TracedPosition {
    let mut out = TracedPosition {
        trace: vec![TraceStep::root(pane)],
        pos,
        scale: 1.0,
    };
    let mut current = pane;
    for _ in 0..depth {
        let Some(inlay) = world.pane(current).and_then(|p| p.inlay_containing(out.pos)) else {
            break;
        };
        let sf = inlay.scale_factor();
        out.pos = inner_point(out.pos, inlay.anchor(), sf);
        out.scale *= sf;
        out.trace.push(TraceStep::entered(inlay.at, inlay.id));
        current = inlay.id;
    }
    out
}

/// Largest number of steps a single re-anchoring may add or remove.
pub const MAX_TRACE_SHIFT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceRelationship {
    Same,
    /// Descended into this many new inlays.
    Extended(usize),
    /// Ascended out of this many inlays.
    Retracted(usize),
    /// Left some inlays and entered others under a shared ancestor.
    Rerouted { retract: usize, extend: usize },
    Unrelated,
}

/// Classifies `novel`, whose root is `root_depth` levels above the end of
/// `orig`, against `orig`. Only the last `root_depth + 1` steps of `orig`
/// are examined and shifts beyond `MAX_TRACE_SHIFT` count as unrelated.
pub fn trace_relationship(orig: &[TraceStep], novel: &[TraceStep], root_depth: usize) -> TraceRelationship {
    if novel.is_empty() || root_depth >= orig.len() {
        return TraceRelationship::Unrelated;
    }
    let root = orig.len() - 1 - root_depth;
    if orig[root].pane != novel[0].pane {
        return TraceRelationship::Unrelated;
    }
    let old_tail = &orig[root + 1..];
    let new_tail = &novel[1..];
    let shared = old_tail
        .iter()
        .zip(new_tail)
        .take_while(|(a, b)| a == b)
        .count();
    let retract = old_tail.len() - shared;
    let extend = new_tail.len() - shared;
    if retract > MAX_TRACE_SHIFT || extend > MAX_TRACE_SHIFT {
        return TraceRelationship::Unrelated;
    }
    match (retract, extend) {
        (0, 0) => TraceRelationship::Same,
        (0, e) => TraceRelationship::Extended(e),
        (r, 0) => TraceRelationship::Retracted(r),
        (r, e) => TraceRelationship::Rerouted {
            retract: r,
            extend: e,
        },
    }
}

/// Builds the entity's next trace from its old one and a fresh candidate.
pub fn apply_relationship(orig: &[TraceStep], novel: &[TraceStep], rel: TraceRelationship) -> Trace {
    let mut out: Trace = orig.to_vec();
    let (retract, extend) = match rel {
        TraceRelationship::Same => (0, 0),
        TraceRelationship::Extended(e) => (0, e),
        TraceRelationship::Retracted(r) => (r, 0),
        TraceRelationship::Rerouted { retract, extend } => (retract, extend),
        TraceRelationship::Unrelated => return novel.to_vec(),
    };
    out.truncate(out.len().saturating_sub(retract));
    out.extend_from_slice(&novel[novel.len() - extend..]);
    out
}

/// Drops outermost steps so at most `max_len` remain.
pub fn trim_trace(trace: &mut Trace, max_len: usize) {
    let max_len = max_len.max(1);
    if trace.len() > max_len {
        let excess = trace.len() - max_len;
        trace.drain(..excess);
        trace[0].entry = None;
    }
}

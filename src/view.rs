//! Read-only queries for drawing a nested world. Views use the same frame
//! arithmetic as physics so visual and physical nesting agree.

use std::collections::BTreeSet;

use crate::config::PhysicsConfig;
use crate::entity::EntityId;
use crate::geometry::Aabb;
use crate::pane::{Pane, PaneId};
use crate::physics_core::entity_edges;
use crate::trace::{find_context, Context};
use crate::world::{Frame, World};

/// One pane to draw: where its full grid lands in the root frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaneView {
    pub pane: PaneId,
    pub edges: Aabb,
    pub depth: usize,
}

/// Lists `root` and every inlay below it down to `depth` levels, outermost
/// first, in `root`'s units. Unknown panes are skipped.
pub fn nested_views(world: &World, root: PaneId, depth: usize) -> Vec<PaneView> {
    let mut out = Vec::new();
    collect_views(world, root, Frame::IDENTITY, 0, depth, &mut out);
    out
}

fn collect_views(world: &World, id: PaneId, frame: Frame, level: usize, max: usize, out: &mut Vec<PaneView>) {
    let Some(pane) = world.pane(id) else {
        return;
    };
    out.push(PaneView {
        pane: id,
        edges: frame.box_to_top(&Pane::bounds()),
        depth: level,
    });
    if level == max {
        return;
    }
    for inlay in &pane.inlays {
        collect_views(world, inlay.id, frame.enter(inlay), level + 1, max, out);
    }
}

pub fn visible_panes(views: &[PaneView]) -> BTreeSet<PaneId> {
    views.iter().map(|v| v.pane).collect()
}

/// An entity's footprint in its own pane.
pub fn entity_box(world: &World, id: EntityId) -> Option<Aabb> {
    let e = world.entity(id)?;
    Some(entity_edges(e.pos, e.size * e.footprint_scale))
}

/// The context a renderer centers on for `id`, plus the panes to draw
/// around it.
pub fn entity_view(world: &World, id: EntityId, config: &PhysicsConfig) -> Option<(Context, Vec<PaneView>)> {
    let e = world.entity(id)?;
    let ebox = entity_box(world, id)?;
    let ctx = find_context(world, &ebox, &e.trace, config.context_depth)?;
    let views = nested_views(world, ctx.pane, ctx.depth + config.tick_depth);
    Some((ctx, views))
}

use std::collections::{BTreeMap, HashSet};

use bevy::log::{info, warn};
use bevy::math::{IVec2, Vec2};

use crate::blocks::{self, BlockId, BlockTable};
use crate::config::EntityTemplate;
use crate::entity::{Entity, EntityId, Home};
use crate::geometry::Aabb;
use crate::pane::{Inlay, Pane, PaneId, PANE_SIZE};
use crate::scale::{inner_edges, inner_point, inlay_scale_factor};
use crate::trace::{Trace, TraceStep};

/// Maps points of a nested pane into the frame a query started from:
/// `top = origin + local * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub origin: Vec2,
    pub scale: f32,
}

impl Frame {
    pub const IDENTITY: Frame = Frame {
        origin: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn to_top(&self, p: Vec2) -> Vec2 {
        self.origin + p * self.scale
    }

    pub fn box_to_top(&self, b: &Aabb) -> Aabb {
        let min = self.to_top(b.min());
        let max = self.to_top(b.max());
        Aabb::new(min.x, min.y, max.x, max.y)
    }

    pub fn enter(&self, inlay: &Inlay) -> Frame {
        Frame {
            origin: self.to_top(inlay.anchor()),
            scale: self.scale * inlay.scale_factor(),
        }
    }
}

/// Owns every pane and entity of one world. Panes refer to each other by id
/// only, so self-embedding and cycles are ordinary graph edges.
#[derive(Clone, Debug)]
pub struct World {
    pub name: String,
    pub seed: u64,
    pub blocks: BlockTable,
    panes: BTreeMap<PaneId, Pane>,
    entities: BTreeMap<EntityId, Entity>,
    next_pane_id: u32,
    next_entity_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new("main", 17)
    }
}

impl World {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            seed,
            blocks: BlockTable::builtin(),
            panes: BTreeMap::new(),
            entities: BTreeMap::new(),
            next_pane_id: 0,
            next_entity_id: 0,
        }
    }

    // === Panes ===

    /// Creates an empty (all chaos) pane, replacing any pane with the same id.
    pub fn create_pane(&mut self, id: Option<PaneId>) -> PaneId {
        let id = id.unwrap_or_else(|| {
            let id = PaneId(self.next_pane_id);
            self.next_pane_id += 1;
            id
        });
        self.next_pane_id = self.next_pane_id.max(id.0 + 1);
        if self.panes.insert(id, Pane::new(id)).is_some() {
            warn!("[Nestworld] create_pane replacing {id}");
        }
        id
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    pub fn pane_ids(&self) -> impl Iterator<Item = PaneId> + '_ {
        self.panes.keys().copied()
    }

    /// Embeds `child` into `parent` at `at` with side `size`, registers the
    /// parent on the child and voids the footprint in the parent's grid.
    /// `parent` and `child` may be the same pane.
    pub fn inset_pane(&mut self, parent: PaneId, at: IVec2, child: PaneId, size: i32) {
        assert!(size >= 1, "inset_pane: inlay size must be positive, got {size}");
        assert!(
            at.x >= 0 && at.y >= 0 && at.x + size <= PANE_SIZE && at.y + size <= PANE_SIZE,
            "inset_pane: inlay at {at} with size {size} leaves the pane"
        );
        assert!(self.panes.contains_key(&child), "inset_pane: unknown child {child}");
        let Some(parent_pane) = self.panes.get_mut(&parent) else {
            panic!("inset_pane: unknown parent {parent}");
        };
        parent_pane.inlays.push(Inlay { at, size, id: child });
        parent_pane.fill_rect(at, at + IVec2::splat(size), blocks::VOID);
        if let Some(child_pane) = self.panes.get_mut(&child) {
            if !child_pane.parents.contains(&parent) {
                child_pane.parents.push(parent);
            }
        }
    }

    /// First-registered parent. Panes with several parents resolve upward
    /// through this one only; the tie-break is arbitrary but stable.
    pub fn canonical_parent(&self, id: PaneId) -> Option<PaneId> {
        self.pane(id).and_then(|p| p.parents.first().copied())
    }

    /// The canonical parent together with the first inlay embedding `id` there.
    pub fn canonical_inlay(&self, id: PaneId) -> Option<(PaneId, Inlay)> {
        let parent = self.canonical_parent(id)?;
        let inlay = self
            .pane(parent)?
            .inlays
            .iter()
            .find(|inl| inl.id == id)
            .copied()?;
        Some((parent, inlay))
    }

    /// Scale factor of the inlay anchored at `at` in `outer`.
    pub fn scale_factor_at(&self, outer: PaneId, at: IVec2) -> Option<f32> {
        self.pane(outer)?
            .inlay_at(at)
            .map(|inl| inlay_scale_factor(inl.size))
    }

    /// Most deeply nested block containing `pos`, descending at most `depth`
    /// inlay levels. Past that the answer is chaos. `None` outside the pane.
    pub fn block_in_pane(&self, pane: PaneId, pos: Vec2, depth: usize) -> Option<BlockId> {
        let Some(p) = self.pane(pane) else {
            return Some(blocks::CHAOS);
        };
        if !Pane::bounds().contains_point(pos) {
            return None;
        }
        if let Some(inlay) = p.inlay_containing(pos) {
            if depth == 0 {
                return Some(blocks::CHAOS);
            }
            let inner = inner_point(pos, inlay.anchor(), inlay.scale_factor());
            return self.block_in_pane(inlay.id, inner, depth - 1);
        }
        p.block_at(pos.floor().as_ivec2())
    }

    /// Calls `pred` with every block cell (and its bounds in `pane`'s frame)
    /// that strictly overlaps `edges`, descending into inlays up to `depth`
    /// levels; inlays past the ceiling report a single chaos cell. Stops at
    /// the first cell for which `pred` returns true.
    pub fn any_block_in(
        &self,
        pane: PaneId,
        edges: &Aabb,
        depth: usize,
        pred: &mut impl FnMut(BlockId, &Aabb) -> bool,
    ) -> bool {
        self.any_block_in_frame(pane, edges, Frame::IDENTITY, depth, pred)
    }

    fn any_block_in_frame(
        &self,
        pane: PaneId,
        edges: &Aabb,
        frame: Frame,
        depth: usize,
        pred: &mut impl FnMut(BlockId, &Aabb) -> bool,
    ) -> bool {
        let Some(p) = self.pane(pane) else {
            return match edges.intersection(&Pane::bounds()) {
                Some(clip) => pred(blocks::CHAOS, &frame.box_to_top(&clip)),
                None => false,
            };
        };
        let x0 = (edges.min_x.floor() as i32).max(0);
        let x1 = (edges.max_x.ceil() as i32).min(PANE_SIZE);
        let y0 = (edges.min_y.floor() as i32).max(0);
        let y1 = (edges.max_y.ceil() as i32).min(PANE_SIZE);
        for y in y0..y1 {
            for x in x0..x1 {
                let cell = Aabb::grid(Vec2::new(x as f32, y as f32), 1.0);
                if !cell.overlaps(edges) {
                    continue;
                }
                if let Some(block) = p.block_at(IVec2::new(x, y)) {
                    if block != blocks::VOID && pred(block, &frame.box_to_top(&cell)) {
                        return true;
                    }
                }
            }
        }
        for inlay in p.inlays_overlapping(edges) {
            if depth == 0 {
                if let Some(clip) = edges.intersection(&inlay.bounds()) {
                    if pred(blocks::CHAOS, &frame.box_to_top(&clip)) {
                        return true;
                    }
                }
                continue;
            }
            let inner = inner_edges(edges, inlay.anchor(), inlay.scale_factor());
            if self.any_block_in_frame(inlay.id, &inner, frame.enter(inlay), depth - 1, pred) {
                return true;
            }
        }
        false
    }

    /// Advances every ticking block in the given panes by one step.
    pub fn tick_blocks(&mut self, panes: &HashSet<PaneId>) {
        let table = &self.blocks;
        for id in panes {
            if let Some(pane) = self.panes.get_mut(id) {
                for b in pane.blocks.iter_mut() {
                    if let Some(next) = table.successor(*b) {
                        *b = next;
                    }
                }
            }
        }
    }

    // === Entities ===

    pub fn create_entity(&mut self, id: Option<EntityId>, template: &EntityTemplate) -> EntityId {
        let id = id.unwrap_or_else(|| {
            let id = EntityId(self.next_entity_id);
            self.next_entity_id += 1;
            id
        });
        self.next_entity_id = self.next_entity_id.max(id.0 + 1);
        if self
            .entities
            .insert(id, Entity::from_template(id, template))
            .is_some()
        {
            warn!("[Nestworld] create_entity replacing {id}");
        }
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub(crate) fn take_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub(crate) fn put_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    pub fn current_pane(&self, id: EntityId) -> Option<&Pane> {
        self.entity(id)
            .and_then(|e| e.current_pane())
            .and_then(|pid| self.pane(pid))
    }

    pub fn set_home(&mut self, id: EntityId, pane: PaneId, pos: Vec2) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.home = Some(Home { pane, pos });
        }
    }

    /// Moves entity membership between pane entity sets.
    pub(crate) fn relocate(&mut self, id: EntityId, from: Option<PaneId>, to: PaneId) {
        if from == Some(to) {
            return;
        }
        if let Some(old) = from.and_then(|pid| self.panes.get_mut(&pid)) {
            old.entities.remove(&id);
        }
        if let Some(new) = self.panes.get_mut(&to) {
            new.entities.insert(id);
        }
    }

    /// Places an entity on a pane, resetting its trace to just that pane.
    pub fn place_entity(&mut self, id: EntityId, pane: PaneId, pos: Vec2) -> Result<(), String> {
        if !self.panes.contains_key(&pane) {
            return Err(format!("cannot place {id} on unknown {pane}"));
        }
        let Some(entity) = self.entities.get_mut(&id) else {
            return Err(format!("unknown {id}"));
        };
        let from = entity.current_pane();
        entity.trace = vec![TraceStep::root(pane)];
        entity.pos = pos;
        self.relocate(id, from, pane);
        info!("[Nestworld] placed {id} on {pane} at ({:.2}, {:.2})", pos.x, pos.y);
        Ok(())
    }

    /// Replaces an entity's trace, keeping pane membership in step with the
    /// trace's last element.
    pub fn set_trace(&mut self, id: EntityId, trace: Trace) {
        let Some(to) = trace.last().map(|s| s.pane) else {
            warn!("[Nestworld] refusing empty trace for {id}");
            return;
        };
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        let from = entity.current_pane();
        entity.trace = trace;
        self.relocate(id, from, to);
    }

    /// Sends an entity back to its home, discarding its trace.
    pub fn warp_home(&mut self, id: EntityId) -> Result<(), String> {
        let home = self
            .entity(id)
            .and_then(|e| e.home)
            .ok_or_else(|| format!("{id} has no home"))?;
        let result = self.place_entity(id, home.pane, home.pos);
        if let Some(e) = self.entities.get_mut(&id) {
            e.vel = Vec2::ZERO;
            e.scale = 1.0;
            e.boosts.clear();
        }
        result
    }
}

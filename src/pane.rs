use std::collections::BTreeSet;
use std::fmt;

use bevy::math::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::blocks::{self, BlockId};
use crate::entity::EntityId;
use crate::geometry::Aabb;
use crate::scale::inlay_scale_factor;

/// Side length of every pane's block grid.
pub const PANE_SIZE: i32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(pub u32);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// A child pane embedded at `at` (in the parent's units) with side `size`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Inlay {
    pub at: IVec2,
    pub size: i32,
    pub id: PaneId,
}

impl Inlay {
    pub fn anchor(&self) -> Vec2 {
        self.at.as_vec2()
    }

    pub fn scale_factor(&self) -> f32 {
        inlay_scale_factor(self.size)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::grid(self.anchor(), self.size as f32)
    }
}

#[derive(Clone, Debug)]
pub struct Pane {
    pub id: PaneId,
    pub blocks: Vec<BlockId>,
    pub inlays: Vec<Inlay>,
    /// Panes embedding this one, in registration order. The first is canonical.
    pub parents: Vec<PaneId>,
    pub entities: BTreeSet<EntityId>,
    /// Set by whatever generated the contents; `None` means not generated yet.
    pub provenance: Option<String>,
}

impl Pane {
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            blocks: vec![blocks::CHAOS; (PANE_SIZE * PANE_SIZE) as usize],
            inlays: Vec::new(),
            parents: Vec::new(),
            entities: BTreeSet::new(),
            provenance: None,
        }
    }

    pub fn in_bounds(pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < PANE_SIZE && pos.y < PANE_SIZE
    }

    pub fn bounds() -> Aabb {
        Aabb::grid(Vec2::ZERO, PANE_SIZE as f32)
    }

    fn index(pos: IVec2) -> usize {
        (pos.x + pos.y * PANE_SIZE) as usize
    }

    /// `None` outside the grid. Callers treat that as "no terrain".
    pub fn block_at(&self, pos: IVec2) -> Option<BlockId> {
        if !Self::in_bounds(pos) {
            return None;
        }
        Some(self.blocks[Self::index(pos)])
    }

    pub fn set_block(&mut self, pos: IVec2, block: BlockId) {
        if Self::in_bounds(pos) {
            self.blocks[Self::index(pos)] = block;
        }
    }

    pub fn fill(&mut self, block: BlockId) {
        self.blocks.fill(block);
    }

    pub fn fill_rect(&mut self, min: IVec2, max: IVec2, block: BlockId) {
        for y in min.y..max.y {
            for x in min.x..max.x {
                self.set_block(IVec2::new(x, y), block);
            }
        }
    }

    /// Overwrites a frame `width` cells thick around the edges.
    pub fn set_border(&mut self, block: BlockId, width: i32) {
        for y in 0..PANE_SIZE {
            for x in 0..PANE_SIZE {
                if x < width || y < width || x >= PANE_SIZE - width || y >= PANE_SIZE - width {
                    self.set_block(IVec2::new(x, y), block);
                }
            }
        }
    }

    /// Inlay anchored exactly at `at`.
    pub fn inlay_at(&self, at: IVec2) -> Option<&Inlay> {
        self.inlays.iter().find(|inl| inl.at == at)
    }

    /// Inlay whose footprint contains `pos` (half-open).
    pub fn inlay_containing(&self, pos: Vec2) -> Option<&Inlay> {
        self.inlays
            .iter()
            .find(|inl| inl.bounds().contains_point(pos))
    }

    pub fn inlays_overlapping<'a>(&'a self, edges: &'a Aabb) -> impl Iterator<Item = &'a Inlay> + 'a {
        self.inlays
            .iter()
            .filter(move |inl| inl.bounds().overlaps(edges))
    }

    pub fn needs_generation(&self) -> bool {
        self.provenance.is_none()
    }

    pub fn mark_generated(&mut self, provenance: impl Into<String>) {
        self.provenance = Some(provenance.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pane_is_all_chaos_and_ungenerated() {
        let pane = Pane::new(PaneId(3));
        assert_eq!(pane.blocks.len(), (PANE_SIZE * PANE_SIZE) as usize);
        assert!(pane.blocks.iter().all(|&b| b == blocks::CHAOS));
        assert!(pane.needs_generation());
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let pane = Pane::new(PaneId(0));
        assert_eq!(pane.block_at(IVec2::new(-1, 0)), None);
        assert_eq!(pane.block_at(IVec2::new(0, PANE_SIZE)), None);
        assert_eq!(pane.block_at(IVec2::new(5, 5)), Some(blocks::CHAOS));
    }

    #[test]
    fn border_has_requested_width() {
        let mut pane = Pane::new(PaneId(0));
        pane.fill(blocks::AIR);
        pane.set_border(blocks::DIRT, 2);
        assert_eq!(pane.block_at(IVec2::new(1, 10)), Some(blocks::DIRT));
        assert_eq!(pane.block_at(IVec2::new(10, 22)), Some(blocks::DIRT));
        assert_eq!(pane.block_at(IVec2::new(2, 2)), Some(blocks::AIR));
    }

    #[test]
    fn set_block_ignores_out_of_bounds() {
        let mut pane = Pane::new(PaneId(0));
        pane.fill(blocks::AIR);
        pane.set_block(IVec2::new(PANE_SIZE, 0), blocks::STONE);
        assert!(pane.blocks.iter().all(|&b| b == blocks::AIR));
    }
}

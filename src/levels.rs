//! Hand-built levels for tests and the headless host.

use bevy::log::info;
use bevy::math::{IVec2, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::blocks::{self, BlockId};
use crate::config::EntityTemplate;
use crate::entity::EntityId;
use crate::pane::{PaneId, PANE_SIZE};
use crate::world::World;

/// Where the cave's self-inlay sits and how big it is.
pub const CAVE_INLAY_AT: IVec2 = IVec2::new(15, 12);
pub const CAVE_INLAY_SIZE: i32 = 8;
/// Where the scatter pane sits inside the cave.
pub const SCATTER_AT: IVec2 = IVec2::new(1, 11);
pub const SCATTER_SIZE: i32 = 4;
pub const PLAYER_HOME: Vec2 = Vec2::new(2.5, 18.0);

/// Turns `id` into a cave that inlays itself, so walking into the inlay
/// leads into a smaller copy of the same cave and walking out of the left
/// opening leads into a bigger one.
pub fn fill_test_pane(world: &mut World, id: PaneId) {
    let Some(pane) = world.pane_mut(id) else {
        return;
    };
    pane.fill(blocks::AIR);
    pane.set_border(blocks::DIRT, 1);
    for x in 0..PANE_SIZE {
        for y in (0..3).chain(20..PANE_SIZE) {
            pane.set_block(IVec2::new(x, y), blocks::DIRT);
        }
    }
    // left-hand opening
    for y in 2..20 {
        pane.set_block(IVec2::new(0, y), blocks::AIR);
    }

    // sloped ceiling on the left
    for x in 1..14 {
        for y in 3..10 {
            if x - 1 > y - 3 && x < 6 && y < 4 {
                pane.set_block(IVec2::new(x, y), blocks::DIRT);
            } else if x - 6 >= y - 3 {
                pane.set_block(IVec2::new(x, y), blocks::STONE);
            }
        }
    }
    // stone mass above the inlay, hollowed into a dirt chamber
    for x in 14..PANE_SIZE - 1 {
        for y in 3..11 {
            pane.set_block(IVec2::new(x, y), blocks::STONE);
        }
    }
    for x in 18..23 {
        for y in 3..12 {
            if x - 18 > y - 3 || x - 18 > 12 - y {
                pane.set_block(IVec2::new(x, y), blocks::DIRT);
            }
        }
    }
    for x in 14..20 {
        pane.set_block(IVec2::new(x, 11), blocks::DIRT);
    }
    for x in 11..15 {
        pane.set_block(IVec2::new(x, 19), blocks::DIRT);
    }
    // mounds on the floor
    for y in 19..PANE_SIZE {
        for x in 1..12 {
            if x - 1 >= 24 - y && 13 - x >= 24 - y {
                pane.set_block(IVec2::new(x, y), blocks::STONE);
            }
        }
        for x in 11..22 {
            if x - 10 >= 24 - y && 21 - x >= y - 19 {
                pane.set_block(IVec2::new(x, y), blocks::STONE);
            }
        }
    }

    pane.set_block(IVec2::new(8, 16), blocks::BLINK_1);
    pane.set_block(IVec2::new(10, 15), blocks::BLINK_2);
    pane.set_block(IVec2::new(9, 13), blocks::BLINK_3);
    pane.mark_generated("test_cave");

    world.inset_pane(id, CAVE_INLAY_AT, id, CAVE_INLAY_SIZE);
}

const SCATTER_BLOCKS: [BlockId; 4] = [blocks::ICE, blocks::WATER, blocks::TRUNK, blocks::ICE_BRIDGE];

/// A walled room with seeded patches of ice, water, trunk and ice bridge
/// over a dirt floor.
pub fn fill_scatter_pane(world: &mut World, id: PaneId, seed: u64) {
    let Some(pane) = world.pane_mut(id) else {
        return;
    };
    let mut rng = SmallRng::seed_from_u64(seed);
    pane.fill(blocks::AIR);
    pane.set_border(blocks::STONE, 1);
    pane.fill_rect(IVec2::new(1, 20), IVec2::new(PANE_SIZE - 1, PANE_SIZE - 1), blocks::DIRT);
    for _ in 0..8 {
        let block = SCATTER_BLOCKS[rng.gen_range(0..SCATTER_BLOCKS.len())];
        let min = IVec2::new(rng.gen_range(2..18), rng.gen_range(4..18));
        let size = IVec2::new(rng.gen_range(1..5), rng.gen_range(1..3));
        pane.fill_rect(min, min + size, block);
    }
    pane.mark_generated(format!("scatter:{seed}"));
}

/// The demo world: the endless cave with a scatter room inlaid in it and a
/// player placed at home. Returns the world and the player's id.
pub fn demo_world(name: &str, seed: u64, player: &EntityTemplate) -> (World, EntityId) {
    let mut world = World::new(name, seed);
    let cave = world.create_pane(None);
    fill_test_pane(&mut world, cave);
    let scatter = world.create_pane(None);
    fill_scatter_pane(&mut world, scatter, seed);
    world.inset_pane(cave, SCATTER_AT, scatter, SCATTER_SIZE);

    let id = world.create_entity(None, player);
    world.set_home(id, cave, PLAYER_HOME);
    if let Err(e) = world.warp_home(id) {
        bevy::log::warn!("[Nestworld] demo player not placed: {e}");
    }
    info!(
        "[Nestworld] demo world '{}' ready: {} panes, player {}",
        world.name,
        world.pane_ids().count(),
        id
    );
    (world, id)
}

pub type BlockId = u8;

pub const CHAOS: BlockId = 0;
pub const AIR: BlockId = 1;
pub const DIRT: BlockId = 2;
pub const BRIDGE: BlockId = 3;
pub const STONE: BlockId = 4;
pub const SMOOTH_STONE: BlockId = 5;
pub const ICE: BlockId = 6;
pub const ICE_BRIDGE: BlockId = 7;
pub const TRUNK: BlockId = 8;
pub const BRANCHES: BlockId = 9;
pub const LEAVES: BlockId = 10;
pub const WATER: BlockId = 11;
pub const BRICK: BlockId = 12;
pub const BLINK_1: BlockId = 13;
pub const BLINK_2: BlockId = 14;
pub const BLINK_3: BlockId = 15;
/// Cells underneath an inlay. The inlay is authoritative there.
pub const VOID: BlockId = 16;

#[derive(Clone, Debug, Default)]
pub struct BlockDef {
    pub name: &'static str,
    pub color: &'static str,
    pub accent: &'static str,
    pub solid: bool,
    pub platform: bool,
    pub climbable: bool,
    pub liquid: bool,
    pub smooth: bool,
    pub slippery: bool,
    /// Block this one turns into on each block tick.
    pub ticks_to: Option<BlockId>,
}

impl BlockDef {
    fn new(name: &'static str, color: &'static str, accent: &'static str) -> Self {
        Self {
            name,
            color,
            accent,
            ..Default::default()
        }
    }

    fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    fn platform(mut self) -> Self {
        self.platform = true;
        self
    }

    fn climbable(mut self) -> Self {
        self.climbable = true;
        self
    }

    fn liquid(mut self) -> Self {
        self.liquid = true;
        self
    }

    fn smooth(mut self) -> Self {
        self.smooth = true;
        self
    }

    fn slippery(mut self) -> Self {
        self.slippery = true;
        self
    }

    fn ticks_to(mut self, next: BlockId) -> Self {
        self.ticks_to = Some(next);
        self
    }
}

/// Trait lookup for block ids. Unknown ids behave like chaos.
#[derive(Clone, Debug)]
pub struct BlockTable {
    pub defs: Vec<BlockDef>,
}

impl Default for BlockTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockTable {
    pub fn builtin() -> Self {
        // Order must match the id constants above.
        let defs = vec![
            BlockDef::new("chaos", "#500", "#300").solid(),
            BlockDef::new("air", "#fff", "#eef"),
            BlockDef::new("dirt", "#730", "#620").solid(),
            BlockDef::new("bridge", "#b84", "#a53").platform(),
            BlockDef::new("stone", "#999", "#888").solid(),
            BlockDef::new("smooth_stone", "#777", "#666").solid().smooth(),
            BlockDef::new("ice", "#ccf", "#aaf").solid().smooth().slippery(),
            BlockDef::new("ice_bridge", "#abf", "#89f").platform().slippery(),
            BlockDef::new("trunk", "#b70", "#940").climbable(),
            BlockDef::new("branches", "#c80", "#a50").climbable(),
            BlockDef::new("leaves", "#191", "#3b2").climbable(),
            BlockDef::new("water", "#44b", "#008").liquid(),
            BlockDef::new("brick", "#a64", "#cc9").solid(),
            BlockDef::new("blink_1", "#185", "#3d7").solid().ticks_to(BLINK_2),
            BlockDef::new("blink_2", "#aec", "#7ea").ticks_to(BLINK_3),
            BlockDef::new("blink_3", "#cfe", "#8fb").ticks_to(BLINK_1),
            BlockDef::new("void", "#000", "#000"),
        ];
        Self { defs }
    }

    pub fn def(&self, id: BlockId) -> &BlockDef {
        self.defs
            .get(id as usize)
            .unwrap_or(&self.defs[CHAOS as usize])
    }

    pub fn by_name(&self, name: &str) -> Option<BlockId> {
        self.defs
            .iter()
            .position(|d| d.name == name)
            .map(|i| i as BlockId)
    }

    pub fn name(&self, id: BlockId) -> &'static str {
        self.def(id).name
    }

    pub fn color(&self, id: BlockId) -> &'static str {
        self.def(id).color
    }

    pub fn accent_color(&self, id: BlockId) -> &'static str {
        self.def(id).accent
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.def(id).solid
    }

    pub fn is_platform(&self, id: BlockId) -> bool {
        self.def(id).platform
    }

    pub fn is_climbable(&self, id: BlockId) -> bool {
        self.def(id).climbable
    }

    pub fn is_liquid(&self, id: BlockId) -> bool {
        self.def(id).liquid
    }

    pub fn is_smooth(&self, id: BlockId) -> bool {
        self.def(id).smooth
    }

    pub fn is_slippery(&self, id: BlockId) -> bool {
        self.def(id).slippery
    }

    pub fn successor(&self, id: BlockId) -> Option<BlockId> {
        self.def(id).ticks_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_line_up_with_names() {
        let table = BlockTable::builtin();
        assert_eq!(table.by_name("chaos"), Some(CHAOS));
        assert_eq!(table.by_name("water"), Some(WATER));
        assert_eq!(table.by_name("blink_3"), Some(BLINK_3));
        assert_eq!(table.by_name("void"), Some(VOID));
        assert_eq!(table.by_name("lava"), None);
    }

    #[test]
    fn chaos_is_impassable_and_void_is_not() {
        let table = BlockTable::builtin();
        assert!(table.is_solid(CHAOS));
        assert!(!table.is_solid(VOID));
        assert!(!table.is_solid(AIR));
        // unknown ids fall back to chaos
        assert!(table.is_solid(200));
    }

    #[test]
    fn blinking_blocks_cycle() {
        let table = BlockTable::builtin();
        let mut id = BLINK_1;
        for _ in 0..3 {
            id = table.successor(id).unwrap();
        }
        assert_eq!(id, BLINK_1);
        assert_eq!(table.successor(STONE), None);
    }

    #[test]
    fn ice_is_slippery_smooth_and_solid() {
        let table = BlockTable::builtin();
        assert!(table.is_solid(ICE) && table.is_smooth(ICE) && table.is_slippery(ICE));
        assert!(table.is_platform(ICE_BRIDGE) && table.is_slippery(ICE_BRIDGE));
    }
}

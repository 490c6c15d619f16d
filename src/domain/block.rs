/// Block types and the catalog that registers them.
/// Behavior lives entirely in `BlockFlags`; a block instance is a small
/// immutable value, relocated (never mutated) when pushed or falling.

use std::fmt;
use std::sync::OnceLock;

/// Unique block identity, independent of the display glyph.
/// Built-ins live in the `cavefall` namespace; unregistered level glyphs
/// become `deco:<glyph>` decorations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockId {
    Air,
    Water,
    Platform,
    Ladder,
    Start,
    Goal,
    Wall,
    Spike,
    Crate,
    Sand,
    Decoration(char),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Air => write!(f, "cavefall:air"),
            BlockId::Water => write!(f, "cavefall:water"),
            BlockId::Platform => write!(f, "cavefall:platform"),
            BlockId::Ladder => write!(f, "cavefall:ladder"),
            BlockId::Start => write!(f, "cavefall:start"),
            BlockId::Goal => write!(f, "cavefall:goal"),
            BlockId::Wall => write!(f, "cavefall:wall"),
            BlockId::Spike => write!(f, "cavefall:spike"),
            BlockId::Crate => write!(f, "cavefall:crate"),
            BlockId::Sand => write!(f, "cavefall:sand"),
            BlockId::Decoration(g) => write!(f, "deco:{g}"),
        }
    }
}

/// Behavior flags, fixed at construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockFlags {
    /// Entities standing on this block are supported (do not fall through).
    pub solid: bool,
    /// Blocks horizontal movement into the cell.
    pub collidable: bool,
    /// Can be displaced horizontally by the player.
    pub pushable: bool,
    /// Unsupported instances fall until they rest.
    pub gravity: bool,
    /// Contact at ground level kills the player.
    pub lethal: bool,
    /// Vertical traversal into the cell from above / from below.
    pub climbable_from_top: bool,
    pub climbable_from_bottom: bool,
}

impl BlockFlags {
    /// Baseline: solid ground with no special behavior.
    pub const DEFAULT: BlockFlags = BlockFlags {
        solid: true,
        collidable: false,
        pushable: false,
        gravity: false,
        lethal: false,
        climbable_from_top: false,
        climbable_from_bottom: false,
    };

    const NON_SOLID: BlockFlags = BlockFlags { solid: false, ..Self::DEFAULT };
}

/// Color hint for the renderer. Kept out of crossterm terms so the
/// simulation layer stays presentation-free.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tint {
    Plain,
    Blue,
    Magenta,
    Green,
    Red,
    Cyan,
    Yellow,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Block {
    pub id: BlockId,
    pub glyph: char,
    pub tint: Tint,
    pub flags: BlockFlags,
}

impl Block {
    const fn new(id: BlockId, glyph: char, tint: Tint, flags: BlockFlags) -> Self {
        Block { id, glyph, tint, flags }
    }

    pub fn is_air(self) -> bool {
        self.id == BlockId::Air
    }
}

/// The fixed catalog of block types. Constructed once per process and
/// shared by every world (`Catalog::shared`); membership and flags never
/// change after startup.
pub struct Catalog {
    registered: Vec<Block>,
}

pub const AIR: Block = Block::new(BlockId::Air, ' ', Tint::Plain, BlockFlags::NON_SOLID);
pub const WATER: Block = Block::new(BlockId::Water, '~', Tint::Blue, BlockFlags::NON_SOLID);
pub const PLATFORM: Block = Block::new(BlockId::Platform, '-', Tint::Plain, BlockFlags::DEFAULT);
pub const LADDER: Block = Block::new(
    BlockId::Ladder,
    'H',
    Tint::Magenta,
    BlockFlags {
        climbable_from_top: true,
        climbable_from_bottom: true,
        ..BlockFlags::DEFAULT
    },
);
pub const START: Block = Block::new(BlockId::Start, 'S', Tint::Plain, BlockFlags::NON_SOLID);
pub const GOAL: Block = Block::new(BlockId::Goal, 'O', Tint::Green, BlockFlags::NON_SOLID);
pub const WALL: Block = Block::new(
    BlockId::Wall,
    '0',
    Tint::Plain,
    BlockFlags { collidable: true, ..BlockFlags::DEFAULT },
);
pub const SPIKE: Block = Block::new(
    BlockId::Spike,
    '^',
    Tint::Red,
    BlockFlags { lethal: true, ..BlockFlags::DEFAULT },
);
pub const CRATE: Block = Block::new(
    BlockId::Crate,
    'x',
    Tint::Cyan,
    BlockFlags {
        collidable: true,
        pushable: true,
        gravity: true,
        ..BlockFlags::DEFAULT
    },
);
pub const SAND: Block = Block::new(
    BlockId::Sand,
    '*',
    Tint::Yellow,
    BlockFlags { gravity: true, ..BlockFlags::DEFAULT },
);

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            registered: vec![
                AIR, WATER, PLATFORM, LADDER, START, GOAL, WALL, SPIKE, CRATE, SAND,
            ],
        }
    }

    /// Process-wide shared catalog.
    pub fn shared() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::new)
    }

    /// Resolve a level-file glyph. Unregistered glyphs become inert
    /// decoration blocks so arbitrary characters render but never
    /// affect the simulation.
    pub fn lookup_by_glyph(&self, glyph: char) -> Block {
        self.registered
            .iter()
            .copied()
            .find(|b| b.glyph == glyph)
            .unwrap_or(Block::new(
                BlockId::Decoration(glyph),
                glyph,
                Tint::Plain,
                BlockFlags::NON_SOLID,
            ))
    }
}

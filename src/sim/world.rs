/// The world grid: a 2D field of block values with auto-expanding storage.
///
/// ## Reads and writes
///
/// `get` never fails: positions outside the stored field (including
/// negative ones) read as air. `set` grows the field as needed and rejects
/// negative positions (logged, dropped). Rows are ragged — each row only
/// grows as far as it has been written.
///
/// ## Gravity settle
///
/// Writing a gravity-flagged block settles it immediately: while the cell
/// below is in bounds and air, the block relocates one row down. A single
/// `set` therefore leaves the field in its resting configuration — there is
/// no deferred physics tick for blocks.
///
/// ## Bounds
///
/// `max_x`/`max_y` are the bounding box of the *loaded* content and drive
/// rendering; later writes may grow storage past them without widening the
/// viewport. Containment is authoritative on rows only: a position is
/// inside iff it is non-negative and its row exists.

use log::warn;

use crate::domain::block::{self, Block, BlockId, Catalog};
use crate::domain::pos::Pos;

pub struct Grid {
    field: Vec<Vec<Block>>,
    max_x: i32,
    max_y: i32,
    start: Pos,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            field: vec![],
            max_x: 0,
            max_y: 0,
            start: Pos::new(0, 0),
        }
    }

    /// Reset and fill the grid from rows of level-file glyphs.
    /// The start glyph records the player start position and is stored
    /// as air; every other glyph resolves through the catalog.
    pub fn load(&mut self, rows: &[String], catalog: &Catalog) {
        self.field.clear();
        self.max_x = 0;
        self.max_y = 0;
        self.start = Pos::new(0, 0);

        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let pos = Pos::new(x as i32, y as i32);
                let block = catalog.lookup_by_glyph(glyph);
                if block.id == BlockId::Start {
                    self.start = pos;
                    self.set(pos, block::AIR);
                } else {
                    self.set(pos, block);
                }
                if pos.x > self.max_x {
                    self.max_x = pos.x;
                }
            }
            if y as i32 > self.max_y {
                self.max_y = y as i32;
            }
        }
    }

    /// Block at `pos`; air for anything outside the stored field.
    pub fn get(&self, pos: Pos) -> Block {
        if pos.is_negative() {
            return block::AIR;
        }
        self.field
            .get(pos.uy())
            .and_then(|row| row.get(pos.ux()))
            .copied()
            .unwrap_or(block::AIR)
    }

    /// Write `block` at `pos`, then settle it if it has gravity.
    /// Negative positions are dropped.
    pub fn set(&mut self, pos: Pos, block: Block) {
        if pos.is_negative() {
            warn!("dropped block write at negative position ({}, {})", pos.x, pos.y);
            return;
        }
        self.write(pos, block);

        // Settle: relocate downward while the cell below is in-bounds air.
        let mut cur = pos;
        while self.get(cur).flags.gravity {
            let below = cur.add(0, 1);
            if !self.contains(below) || !self.get(below).is_air() {
                break;
            }
            let falling = self.get(cur);
            self.write(below, falling);
            self.write(cur, block::AIR);
            cur = below;
        }
    }

    /// Non-negative and within the stored rows. The row count is the
    /// authoritative bound; x is not enforced on reads.
    pub fn contains(&self, pos: Pos) -> bool {
        !pos.is_negative() && pos.uy() < self.field.len()
    }

    /// The full field, for the renderer.
    pub fn field_state(&self) -> &[Vec<Block>] {
        &self.field
    }

    pub fn start_pos(&self) -> Pos {
        self.start
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Raw write with auto-grow, no settle.
    fn write(&mut self, pos: Pos, block: Block) {
        let (x, y) = (pos.ux(), pos.uy());
        while self.field.len() <= y {
            self.field.push(vec![]);
        }
        let row = &mut self.field[y];
        while row.len() <= x {
            row.push(block::AIR);
        }
        row[x] = block;
    }
}

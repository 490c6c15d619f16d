/// Player state machine: position, life/goal status, free-fall tracking,
/// and the 3×3 texture the renderer overlays on the grid.
///
/// The stored position is the torso of a 3-row-tall sprite; the head sits
/// one row up, the legs one row down, and the ground reference two rows
/// down. All movement offsets are relative to the torso.

use super::pos::Pos;

/// Appearance switches to Falling once the free-fall counter passes this.
pub const FALL_FLAIL_AFTER: u32 = 2;
/// Landing with a counter above this is fatal.
pub const LETHAL_FALL: u32 = 5;

/// Rendering hint derived from the free-fall counter and alive flag.
/// Not simulation state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Appearance {
    Normal,
    Falling,
    Dead,
}

type Texture = [[char; 3]; 3];

const REGULAR_TEXTURE: Texture = [
    [' ', 'o', ' '],
    ['/', '|', '\\'],
    ['/', ' ', '\\'],
];
const FALLING_TEXTURE: Texture = [
    ['\\', 'o', '/'],
    [' ', '|', ' '],
    ['/', ' ', '\\'],
];
const DEAD_TEXTURE: Texture = [
    [' ', ' ', ' '],
    ['/', '-', 'X'],
    ['/', ' ', '\\'],
];

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Pos,
    alive: bool,
    reached_goal: bool,
    fall_length: u32,
    appearance: Appearance,
}

impl Player {
    pub fn new(start: Pos) -> Self {
        Player {
            pos: start,
            alive: true,
            reached_goal: false,
            fall_length: 0,
            appearance: Appearance::Normal,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn has_reached_goal(&self) -> bool {
        self.reached_goal
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn fall_length(&self) -> u32 {
        self.fall_length
    }

    /// Terminal: dead players stay dead.
    pub fn kill(&mut self) {
        self.appearance = Appearance::Dead;
        self.alive = false;
    }

    /// Non-exclusive with being alive; the session loop decides to stop.
    pub fn reach_goal(&mut self) {
        self.reached_goal = true;
    }

    /// Ground reference is water: falling into it is always safe.
    pub fn reset_fall(&mut self) {
        self.fall_length = 0;
    }

    /// One settle step without support below.
    pub fn note_unsupported(&mut self) {
        self.fall_length += 1;
        if self.fall_length > FALL_FLAIL_AFTER {
            self.appearance = Appearance::Falling;
        }
    }

    /// Support found. Applies fall damage from the accumulated counter.
    pub fn note_landed(&mut self) {
        self.appearance = Appearance::Normal;
        if self.fall_length > LETHAL_FALL {
            self.kill();
        }
        self.fall_length = 0;
    }

    fn texture(&self) -> &'static Texture {
        match self.appearance {
            Appearance::Normal => &REGULAR_TEXTURE,
            Appearance::Falling => &FALLING_TEXTURE,
            Appearance::Dead => &DEAD_TEXTURE,
        }
    }

    /// The texture character covering world cell (x, y), if any.
    /// The texture is centered on the torso: row 0 is the head row.
    /// Space cells are transparent.
    pub fn mask_char_at(&self, x: i32, y: i32) -> Option<char> {
        let tx = x - self.pos.x + 1;
        let ty = y - self.pos.y + 1;
        if !(0..3).contains(&tx) || !(0..3).contains(&ty) {
            return None;
        }
        let ch = self.texture()[ty as usize][tx as usize];
        if ch == ' ' {
            None
        } else {
            Some(ch)
        }
    }
}

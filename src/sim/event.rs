/// Events emitted while resolving a move.
/// The presentation layer consumes these to animate the outcome; the
/// simulation itself resolves instantaneously.

use crate::domain::pos::Pos;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveEvent {
    /// The player occupied a new position by walking, climbing, or
    /// stepping up.
    Stepped { to: Pos },
    /// One row of free fall. `depth` counts consecutive unsupported rows
    /// and drives the animation pacing.
    Fell { to: Pos, depth: u32 },
    /// The player came to rest after falling.
    Landed { at: Pos },
    /// Terminal outcomes, in the order they occurred.
    Died,
    ReachedGoal,
}

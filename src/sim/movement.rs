/// Movement resolution: one directional command in, grid + player
/// mutations out.
///
/// ## Offsets
///
/// The player's stored position is the torso; `+1` row is the legs, `+2`
/// rows is the ground reference. Horizontal moves check the destination
/// legs cell ("feet") for collision and the destination torso cell for the
/// diagonal step-up.
///
/// ## Resolution order for a horizontal move
///
///   1. Push any pushable chain at the feet destination. Pushing commits
///      even when the move itself then fails.
///   2. Feet destination not collidable → move there, then nudge gravity
///      on the block the player vacated (two rows below the old position).
///   3. Feet collidable but torso destination non-solid → step diagonally
///      up onto the obstruction.
///   4. Otherwise the move fails with no player state change.
///
/// ## Falling
///
/// Every placement settles synchronously: while the ground reference is
/// non-solid the player descends one row, emitting a `MoveEvent::Fell` per
/// row so the presentation layer can animate what the simulation already
/// resolved. Death (out of bounds, fall damage, lethal contact) and goal
/// detection happen inside the same settle loop.

use crate::domain::block::{self, BlockId};
use crate::domain::player::Player;
use crate::domain::pos::Pos;
use super::event::MoveEvent;
use super::world::Grid;

/// A directional command. Anything unparseable is ignored upstream.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
}

impl Command {
    /// `w a s d` (either case), with space as the alternate "up".
    pub fn from_char(c: char) -> Option<Command> {
        match c {
            'w' | 'W' | ' ' => Some(Command::Up),
            'a' | 'A' => Some(Command::Left),
            's' | 'S' => Some(Command::Down),
            'd' | 'D' => Some(Command::Right),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct MoveOutcome {
    /// Did the player's position change?
    pub moved: bool,
    /// Observable position updates, in order.
    pub events: Vec<MoveEvent>,
}

/// Resolve one command against the world.
pub fn apply(grid: &mut Grid, player: &mut Player, cmd: Command) -> MoveOutcome {
    let mut events = Vec::new();
    let moved = match cmd {
        Command::Left => walk(grid, player, -1, &mut events),
        Command::Right => walk(grid, player, 1, &mut events),
        Command::Up => climb_up(grid, player, &mut events),
        Command::Down => climb_down(grid, player, &mut events),
    };
    MoveOutcome { moved, events }
}

fn walk(grid: &mut Grid, player: &mut Player, dx: i32, events: &mut Vec<MoveEvent>) -> bool {
    let from = player.pos;
    let torso_dest = from.add(dx, 0);
    let feet_dest = from.add(dx, 1);

    // Push commits before the collision check.
    push_chain(grid, feet_dest, dx);

    if !grid.get(feet_dest).flags.collidable {
        place(grid, player, torso_dest, events);
        // The block the player was standing on may now be unsupported.
        nudge_gravity(grid, from.add(0, 2));
        true
    } else if !grid.get(torso_dest).flags.solid {
        // Step diagonally up onto the obstruction.
        place(grid, player, from.add(dx, -1), events);
        true
    } else {
        false
    }
}

fn climb_up(grid: &mut Grid, player: &mut Player, events: &mut Vec<MoveEvent>) -> bool {
    let pos = player.pos;
    if grid.get(pos.add(0, 1)).flags.climbable_from_bottom
        || grid.get(pos.add(0, 2)).flags.climbable_from_bottom
    {
        place(grid, player, pos.add(0, -1), events);
        true
    } else {
        false
    }
}

fn climb_down(grid: &mut Grid, player: &mut Player, events: &mut Vec<MoveEvent>) -> bool {
    let pos = player.pos;
    if grid.get(pos.add(0, 2)).flags.climbable_from_top
        || grid.get(pos.add(0, 3)).flags.climbable_from_top
    {
        place(grid, player, pos.add(0, 1), events);
        true
    } else {
        false
    }
}

/// Push the pushable chain starting at `target` one cell in `dx`.
///
/// The contiguous chain is collected first, then relocated farthest link
/// first, so a vacated cell (including one opened by a pushed block
/// falling) frees the next link. A link whose destination is not air stays
/// put, and with it everything behind it.
fn push_chain(grid: &mut Grid, target: Pos, dx: i32) {
    let mut chain = vec![];
    let mut link = target;
    while grid.get(link).flags.pushable {
        chain.push(link);
        link = link.add(dx, 0);
    }
    for &link in chain.iter().rev() {
        let dest = link.add(dx, 0);
        if grid.get(dest).is_air() {
            let pushed = grid.get(link);
            grid.set(dest, pushed);
            grid.set(link, block::AIR);
        }
    }
}

/// If the block at `cell` has gravity and nothing under it, drop it one
/// row; the grid's settle cascade carries it the rest of the way down.
fn nudge_gravity(grid: &mut Grid, cell: Pos) {
    let block = grid.get(cell);
    if block.flags.gravity && grid.get(cell.add(0, 1)).is_air() {
        grid.set(cell.add(0, 1), block);
        grid.set(cell, block::AIR);
    }
}

/// Place the player and run the life-cycle checks, descending until
/// support is found or a terminal state is reached.
fn place(grid: &Grid, player: &mut Player, to: Pos, events: &mut Vec<MoveEvent>) {
    let mut pos = to;
    let mut fell = false;

    loop {
        if !grid.contains(pos) {
            player.kill();
            events.push(MoveEvent::Died);
            return;
        }
        player.pos = pos;
        if fell {
            events.push(MoveEvent::Fell { to: pos, depth: player.fall_length() });
        } else {
            events.push(MoveEvent::Stepped { to: pos });
        }

        if grid.get(pos).id == BlockId::Goal && !player.has_reached_goal() {
            player.reach_goal();
            events.push(MoveEvent::ReachedGoal);
        }

        let ground = grid.get(pos.add(0, 2));
        if ground.id == BlockId::Water {
            player.reset_fall();
        }

        if !ground.flags.solid {
            player.note_unsupported();
            fell = true;
            pos = pos.add(0, 1);
            continue;
        }

        player.note_landed();
        if fell {
            events.push(MoveEvent::Landed { at: pos });
        }
        if !player.is_alive() {
            // Fall damage.
            events.push(MoveEvent::Died);
            return;
        }
        if ground.flags.lethal {
            player.kill();
            events.push(MoveEvent::Died);
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::{BlockId, Catalog};
    use crate::domain::player::Player;

    /// Build a grid from a diagram and spawn the player at the start
    /// glyph.  Legend: '0'=wall  '-'=platform  'H'=ladder  '^'=spike
    /// 'x'=crate  '*'=sand  '~'=water  'O'=goal  'S'=start
    fn world_from(rows: &[&str]) -> (Grid, Player) {
        let rows: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
        let mut grid = Grid::new();
        grid.load(&rows, Catalog::shared());
        let player = Player::new(grid.start_pos());
        (grid, player)
    }

    fn row_glyphs(grid: &Grid, y: i32, width: i32) -> String {
        (0..width).map(|x| grid.get(Pos::new(x, y)).glyph).collect()
    }

    // ── Walking ──

    #[test]
    fn walk_on_flat_ground() {
        let (mut g, mut p) = world_from(&[
            "S  ",
            "   ",
            "000",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(1, 0));
        assert!(p.is_alive());
    }

    #[test]
    fn walk_blocked_by_wall() {
        let (mut g, mut p) = world_from(&[
            "S0 ",
            " 0 ",
            "000",
        ]);
        // feet destination and torso destination are both wall
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(!out.moved);
        assert_eq!(p.pos, Pos::new(0, 0));
    }

    #[test]
    fn step_up_onto_obstruction() {
        let (mut g, mut p) = world_from(&[
            "   ",
            "S  ",
            " 0 ",
            "000",
        ]);
        // feet destination (1,2) collides, torso destination (1,1) is air
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(1, 0));
    }

    #[test]
    fn step_up_blocked_by_solid_torso() {
        let (mut g, mut p) = world_from(&[
            "SH ",
            " 0 ",
            "000",
        ]);
        // feet (1,1) collides and torso destination (1,0) is a ladder,
        // which is solid: stuck
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(!out.moved);
        assert_eq!(p.pos, Pos::new(0, 0));
    }

    #[test]
    fn walking_off_the_left_edge_is_fatal() {
        let (mut g, mut p) = world_from(&[
            "S  ",
            "   ",
            "000",
        ]);
        let out = apply(&mut g, &mut p, Command::Left);
        assert!(out.moved);
        assert!(!p.is_alive());
        assert!(out.events.contains(&MoveEvent::Died));
    }

    // ── Climbing ──

    #[test]
    fn climb_up_ladder() {
        let (mut g, mut p) = world_from(&[
            "   ",
            "S  ",
            "H  ",
            "000",
        ]);
        // legs on the ladder
        let out = apply(&mut g, &mut p, Command::Up);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(0, 0));
    }

    #[test]
    fn climb_up_needs_a_ladder() {
        let (mut g, mut p) = world_from(&[
            "   ",
            "S  ",
            "   ",
            "000",
        ]);
        let out = apply(&mut g, &mut p, Command::Up);
        assert!(!out.moved);
        assert_eq!(p.pos, Pos::new(0, 1));
    }

    #[test]
    fn climb_down_ladder() {
        let (mut g, mut p) = world_from(&[
            "S  ",
            "   ",
            "H  ",
            "H  ",
            "000",
        ]);
        // ground reference (0,2) is the ladder top
        let out = apply(&mut g, &mut p, Command::Down);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(0, 1));
    }

    #[test]
    fn climb_down_through_floor_is_denied() {
        let (mut g, mut p) = world_from(&[
            "S  ",
            "   ",
            "000",
        ]);
        let out = apply(&mut g, &mut p, Command::Down);
        assert!(!out.moved);
    }

    // ── Pushing ──

    #[test]
    fn push_single_crate_into_space() {
        let (mut g, mut p) = world_from(&[
            "S   ",
            " x  ",
            "0000",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(1, 0));
        assert_eq!(row_glyphs(&g, 1, 4), "  x ");
    }

    #[test]
    fn push_two_crates_into_one_space() {
        let (mut g, mut p) = world_from(&[
            "S   ",
            " xx ",
            "0000",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert_eq!(row_glyphs(&g, 1, 4), "  xx");
    }

    #[test]
    fn push_chain_against_wall_moves_nothing() {
        let (mut g, mut p) = world_from(&[
            "    ",
            "S   ",
            " xx0",
            "0000",
        ]);
        // the chain is pinned; zero crates move, and the player instead
        // steps up onto the near crate
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(1, 0));
        assert_eq!(row_glyphs(&g, 2, 4), " xx0");
    }

    #[test]
    fn pushed_crate_falls_off_a_ledge() {
        let (mut g, mut p) = world_from(&[
            "S   ",
            " x  ",
            "00  ",
            "0000",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        // crate slid to (2,1), then settled through the gap onto the floor
        assert!(g.get(Pos::new(2, 1)).is_air());
        assert_eq!(g.get(Pos::new(2, 2)).id, BlockId::Crate);
    }

    #[test]
    fn crate_pushed_off_the_world_edge_is_gone() {
        let (mut g, mut p) = world_from(&[
            " S ",
            "x  ",
            "000",
        ]);
        let out = apply(&mut g, &mut p, Command::Left);
        assert!(out.moved);
        // the write at x = -1 is dropped; the crate leaves the world
        assert_eq!(row_glyphs(&g, 1, 3), "   ");
        assert_eq!(p.pos, Pos::new(0, 0));
    }

    // ── Vacated-block gravity ──

    #[test]
    fn sand_falls_once_the_player_steps_off() {
        let (mut g, mut p) = world_from(&[
            "S    ",
            "     ",
            "*00  ",
            "     ",
            "00000",
        ]);
        // standing on floating sand; stepping off lets it drop
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert_eq!(p.pos, Pos::new(1, 0));
        assert!(g.get(Pos::new(0, 2)).is_air());
        assert_eq!(g.get(Pos::new(0, 3)).id, BlockId::Sand);
    }

    // ── Falling and fall damage ──

    #[test]
    fn short_fall_is_survivable() {
        let (mut g, mut p) = world_from(&[
            " S   ",
            "     ",
            " 0   ",
            "     ",
            "     ",
            "     ",
            "     ",
            "00000",
        ]);
        // stepping right off the ledge drops five rows, right at the threshold
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(p.is_alive());
        assert_eq!(p.pos, Pos::new(2, 5));
        assert!(out.events.contains(&MoveEvent::Landed { at: Pos::new(2, 5) }));
    }

    #[test]
    fn long_fall_is_fatal() {
        let (mut g, mut p) = world_from(&[
            " S   ",
            "     ",
            " 0   ",
            "     ",
            "     ",
            "     ",
            "     ",
            "     ",
            "00000",
        ]);
        // same ledge, one row deeper: six rows of free fall
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(!p.is_alive());
        assert_eq!(out.events.last(), Some(&MoveEvent::Died));
    }

    #[test]
    fn water_breaks_a_long_fall() {
        let (mut g, mut p) = world_from(&[
            " S   ",
            "     ",
            " 0   ",
            "     ",
            "     ",
            "     ",
            "     ",
            "  ~  ",
            "00000",
        ]);
        // water near the bottom of the shaft resets the counter
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(p.is_alive());
    }

    #[test]
    fn fall_events_carry_increasing_depth() {
        let (mut g, mut p) = world_from(&[
            " S   ",
            "     ",
            " 0   ",
            "     ",
            "     ",
            "00000",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        let depths: Vec<u32> = out
            .events
            .iter()
            .filter_map(|e| match e {
                MoveEvent::Fell { depth, .. } => Some(*depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn falling_out_of_the_world_is_fatal() {
        let (mut g, mut p) = world_from(&[
            " S ",
            "   ",
            " 0 ",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(!p.is_alive());
        assert_eq!(out.events.last(), Some(&MoveEvent::Died));
    }

    // ── Lethal contact ──

    #[test]
    fn spike_between_walls_kills_the_falling_player() {
        let (mut g, mut p) = world_from(&[
            "S  ",
            "   ",
            "0  ",
            "0^0",
        ]);
        // stepping right drops the player into the spike pit
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(!p.is_alive());
        assert_eq!(p.pos, Pos::new(1, 1));
        assert_eq!(out.events.last(), Some(&MoveEvent::Died));
    }

    #[test]
    fn lethal_contact_kills_even_when_supported() {
        let (mut g, mut p) = world_from(&[
            "S  ",
            "   ",
            "^00",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(p.is_alive());
        // walking back over the spike: supported by it, and killed by it
        let out = apply(&mut g, &mut p, Command::Left);
        assert!(out.moved);
        assert!(!p.is_alive());
    }

    // ── Goal ──

    #[test]
    fn reaching_the_goal_does_not_kill() {
        let (mut g, mut p) = world_from(&[
            "SO ",
            "   ",
            "000",
        ]);
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(p.has_reached_goal());
        assert!(p.is_alive());
        assert!(out.events.contains(&MoveEvent::ReachedGoal));
    }

    #[test]
    fn goal_is_detected_mid_fall() {
        let (mut g, mut p) = world_from(&[
            " S  ",
            "    ",
            " 0O ",
            "    ",
            "    ",
            "0000",
        ]);
        // the goal cell is passed through on the way down
        let out = apply(&mut g, &mut p, Command::Right);
        assert!(out.moved);
        assert!(p.has_reached_goal());
        assert!(p.is_alive());
        assert_eq!(p.pos, Pos::new(2, 3));
    }

    // ── Input mapping ──

    #[test]
    fn command_chars_are_case_insensitive() {
        assert_eq!(Command::from_char('w'), Some(Command::Up));
        assert_eq!(Command::from_char('W'), Some(Command::Up));
        assert_eq!(Command::from_char(' '), Some(Command::Up));
        assert_eq!(Command::from_char('a'), Some(Command::Left));
        assert_eq!(Command::from_char('S'), Some(Command::Down));
        assert_eq!(Command::from_char('d'), Some(Command::Right));
    }

    #[test]
    fn unrecognized_input_is_ignored() {
        assert_eq!(Command::from_char('q'), None);
        assert_eq!(Command::from_char('7'), None);
    }
}

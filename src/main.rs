/// Entry point: argument handling, world sequencing, and the session loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::style::Color;

use config::{GameConfig, PacingConfig};
use domain::block::Catalog;
use domain::player::Player;
use sim::event::MoveEvent;
use sim::level::{self, WorldDef};
use sim::movement;
use sim::world::Grid;
use ui::input::{self, CommandSource, SessionCmd};
use ui::renderer::Renderer;
use ui::screens;

/// How one session ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SessionEnd {
    Dead,
    GoalReached,
    Aborted,
}

#[derive(Default)]
struct Args {
    help: bool,
    test: bool,
    level: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args();
    if args.help {
        for line in screens::usage() {
            println!("{line}");
        }
        return Ok(());
    }

    let cfg = GameConfig::load();

    let worlds = match &args.level {
        Some(path) => vec![level::read_world_file(std::path::Path::new(path))?],
        None => level::discover(&cfg.worlds_dir),
    };

    // One line of command characters per world.
    let scripts: Vec<String> = if args.test {
        std::fs::read_to_string(&cfg.test_inputs)
            .map(|s| s.lines().map(|l| l.to_string()).collect())
            .unwrap_or_default()
    } else {
        vec![]
    };

    let mut renderer = Renderer::new();
    renderer.init()?;
    let result = play_all(&mut renderer, &worlds, &scripts, &args, &cfg);
    renderer.cleanup()?;
    result
}

/// Play every world in order. Halts on death or abort, continues on goal.
fn play_all(
    renderer: &mut Renderer,
    worlds: &[WorldDef],
    scripts: &[String],
    args: &Args,
    cfg: &GameConfig,
) -> Result<()> {
    if !args.test {
        renderer.draw_page(&screens::intro(), Color::Yellow)?;
        input::wait_for_key()?;
        renderer.draw_page(&screens::guide(), Color::White)?;
        input::wait_for_key()?;
    }

    let catalog = Catalog::shared();
    for (idx, def) in worlds.iter().enumerate() {
        let mut grid = Grid::new();
        grid.load(&def.rows, catalog);
        let mut player = Player::new(grid.start_pos());

        let mut source = if args.test {
            let line = scripts.get(idx).map(String::as_str).unwrap_or("");
            CommandSource::scripted(line, cfg.pacing.script_step_ms)
        } else {
            CommandSource::Interactive
        };

        let end = run_session(renderer, &mut grid, &mut player, &mut source, &def.name, &cfg.pacing)?;
        match end {
            SessionEnd::Dead => {
                renderer.draw_page(&screens::death(), Color::Red)?;
                if !args.test {
                    input::wait_for_key()?;
                }
                return Ok(());
            }
            SessionEnd::Aborted => return Ok(()),
            SessionEnd::GoalReached => {}
        }
    }

    let page = if args.level.is_some() {
        screens::level_cleared()
    } else {
        screens::victory()
    };
    renderer.draw_page(&page, Color::Green)?;
    if !args.test {
        input::wait_for_key()?;
    }
    Ok(())
}

/// Drive one world to a terminal state, replaying resolver events so
/// falls are visible one row at a time.
fn run_session(
    renderer: &mut Renderer,
    grid: &mut Grid,
    player: &mut Player,
    source: &mut CommandSource,
    name: &str,
    pacing: &PacingConfig,
) -> Result<SessionEnd> {
    let status = format!("{name}   ·   W A S D to move, Esc to quit");
    renderer.draw(grid, player, &status)?;

    loop {
        if !player.is_alive() {
            return Ok(SessionEnd::Dead);
        }
        if player.has_reached_goal() {
            return Ok(SessionEnd::GoalReached);
        }

        let cmd = match source.next_command()? {
            None | Some(SessionCmd::Quit) => return Ok(SessionEnd::Aborted),
            Some(SessionCmd::Move(cmd)) => cmd,
        };

        let outcome = movement::apply(grid, player, cmd);
        if !outcome.moved {
            continue;
        }

        // Replay position updates; the simulation already finished.
        let final_pos = player.pos;
        for ev in &outcome.events {
            match *ev {
                MoveEvent::Stepped { to } => {
                    player.pos = to;
                    renderer.draw(grid, player, &status)?;
                }
                MoveEvent::Fell { to, depth } => {
                    player.pos = to;
                    renderer.draw(grid, player, &status)?;
                    thread::sleep(fall_delay(pacing, depth));
                }
                MoveEvent::Landed { .. } | MoveEvent::Died | MoveEvent::ReachedGoal => {}
            }
        }
        player.pos = final_pos;
        renderer.draw(grid, player, &status)?;
    }
}

/// Falls speed up with depth, down to the configured floor.
fn fall_delay(pacing: &PacingConfig, depth: u32) -> Duration {
    Duration::from_millis(pacing.fall_base_ms / u64::from(depth.max(1)) + pacing.fall_floor_ms)
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "-t" | "--test" => args.test = true,
            "-l" | "--level" => args.level = iter.next(),
            other => {
                eprintln!("Unknown argument: {other}");
                args.help = true;
            }
        }
    }
    args
}

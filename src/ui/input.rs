/// Command sources.
///
/// A session pulls one command at a time from whichever source it was
/// given: the keyboard, or a scripted line of command characters for
/// automated playthroughs. Unrecognized characters are ignored by both;
/// the keyboard source keeps waiting and the script skips ahead.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::sim::movement::Command;

/// What the session loop receives per pull.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionCmd {
    Move(Command),
    Quit,
}

pub enum CommandSource {
    /// Blocking keyboard reads. Esc or Ctrl-C quits.
    Interactive,
    /// Pre-recorded command characters, replayed with a fixed delay so
    /// the run is watchable.
    Scripted {
        chars: Vec<char>,
        index: usize,
        step: Duration,
    },
}

impl CommandSource {
    pub fn scripted(line: &str, step_ms: u64) -> Self {
        CommandSource::Scripted {
            chars: line.chars().collect(),
            index: 0,
            step: Duration::from_millis(step_ms),
        }
    }

    /// Next command, or `None` when a script is exhausted.
    pub fn next_command(&mut self) -> anyhow::Result<Option<SessionCmd>> {
        match self {
            CommandSource::Interactive => loop {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    if key.code == KeyCode::Esc {
                        return Ok(Some(SessionCmd::Quit));
                    }
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                    {
                        return Ok(Some(SessionCmd::Quit));
                    }
                    if let KeyCode::Char(c) = key.code {
                        if let Some(cmd) = Command::from_char(c) {
                            return Ok(Some(SessionCmd::Move(cmd)));
                        }
                        // not a command; keep waiting
                    }
                }
            },
            CommandSource::Scripted { chars, index, step } => {
                while *index < chars.len() {
                    let c = chars[*index];
                    *index += 1;
                    if let Some(cmd) = Command::from_char(c) {
                        thread::sleep(*step);
                        return Ok(Some(SessionCmd::Move(cmd)));
                    }
                }
                Ok(None)
            }
        }
    }
}

/// Block until any key press (page turn).
pub fn wait_for_key() -> anyhow::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(());
            }
        }
    }
}

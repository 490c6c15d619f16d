/// Presentation layer: crossterm terminal renderer.
///
/// Raw mode + alternate screen for the lifetime of the game. Each frame
/// repaints the whole world from the top-left corner; worlds are a few
/// hundred cells, so diffing would buy nothing. All commands are batched
/// with `queue!` and flushed once per frame.
///
/// Draw priority at the player's cells: a pushable block covers the
/// player texture (the crate slides in front of the sprite); every other
/// non-space texture char covers the block behind it.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::block::{self, Tint};
use crate::domain::player::{Appearance, Player};
use crate::sim::world::Grid;

pub struct Renderer {
    out: BufWriter<Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { out: BufWriter::new(io::stdout()) }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        queue!(self.out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        self.out.flush()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()
    }

    /// Repaint the world and the player overlay, plus a status line.
    pub fn draw(&mut self, grid: &Grid, player: &Player, status: &str) -> io::Result<()> {
        let field = grid.field_state();
        let player_color = match player.appearance() {
            Appearance::Dead => Color::Red,
            _ => Color::Yellow,
        };
        queue!(self.out, MoveTo(0, 0))?;
        for y in 0..=grid.max_y() {
            let row = field.get(y as usize).map(Vec::as_slice).unwrap_or(&[]);
            for x in 0..=grid.max_x() {
                let block = row.get(x as usize).copied().unwrap_or(block::AIR);
                match player.mask_char_at(x, y) {
                    Some(ch) if !block.flags.pushable => {
                        queue!(
                            self.out,
                            SetForegroundColor(player_color),
                            Print(ch)
                        )?;
                    }
                    _ => {
                        queue!(
                            self.out,
                            SetForegroundColor(tint_color(block.tint)),
                            Print(block.glyph)
                        )?;
                    }
                }
            }
            queue!(self.out, ResetColor, Clear(ClearType::UntilNewLine), Print("\r\n"))?;
        }
        queue!(
            self.out,
            Clear(ClearType::UntilNewLine),
            Print("\r\n"),
            SetForegroundColor(Color::DarkGrey),
            Print(status),
            ResetColor,
            Clear(ClearType::UntilNewLine)
        )?;
        self.out.flush()
    }

    /// Show a full-screen text page in one color.
    pub fn draw_page(&mut self, lines: &[String], color: Color) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0), SetForegroundColor(color))?;
        for line in lines {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Plain => Color::White,
        Tint::Blue => Color::Blue,
        Tint::Magenta => Color::Magenta,
        Tint::Green => Color::Green,
        Tint::Red => Color::Red,
        Tint::Cyan => Color::Cyan,
        Tint::Yellow => Color::Yellow,
    }
}

/// Level discovery and parsing.
///
/// ## Sources (priority order):
///   1. `*.world.txt` files in the configured worlds directory, played in
///      sorted filename order
///   2. Built-in embedded worlds
///
/// ## File format
///
/// Plain text, one row per line, one glyph per column. Glyphs resolve
/// through the block catalog; `'S'` marks the player start and anything
/// unregistered renders as inert decoration. There is nothing to validate:
/// any readable text file is a playable (if strange) world.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One world, ready to load into a grid.
pub struct WorldDef {
    pub name: String,
    pub rows: Vec<String>,
}

/// All worlds for a run: directory files in sorted order, or the embedded
/// set when the directory yields nothing.
pub fn discover(worlds_dir: &Path) -> Vec<WorldDef> {
    let mut found = vec![];
    if let Ok(entries) = std::fs::read_dir(worlds_dir) {
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .map_or(false, |n| n.to_string_lossy().ends_with(".world.txt"))
            })
            .collect();
        paths.sort();
        for path in paths {
            if let Ok(def) = read_world_file(&path) {
                found.push(def);
            }
        }
    }
    if found.is_empty() {
        embedded_worlds()
    } else {
        found
    }
}

/// Read a single world file.
pub fn read_world_file(path: &Path) -> Result<WorldDef> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading world file {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(WorldDef { name, rows: parse_rows(&content) })
}

/// Split file content into rows, dropping trailing blank lines.
fn parse_rows(content: &str) -> Vec<String> {
    let mut rows: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }
    rows
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback worlds
// ══════════════════════════════════════════════════════════════

fn embedded_worlds() -> Vec<WorldDef> {
    vec![
        make_embedded("1 - First Steps", &[
            "                          ",
            "                          ",
            "  S                    O  ",
            "             0            ",
            "00000000000000000000000000",
        ]),
        make_embedded("2 - Crate Expectations", &[
            "                          ",
            "  S                  O    ",
            "      x                   ",
            "000000000000 0000000000000",
            "            0             ",
        ]),
        make_embedded("3 - The Deep", &[
            "  S                       ",
            "                          ",
            " 000                      ",
            "                      O   ",
            "    ~                     ",
            "    ~                H000 ",
            "                     H    ",
            "                     H    ",
            "00000000000000000000000000",
        ]),
    ]
}

fn make_embedded(name: &str, map: &[&str]) -> WorldDef {
    WorldDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::Catalog;
    use crate::domain::pos::Pos;
    use crate::sim::world::Grid;

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let rows = parse_rows("0 0\n000\n\n  \n");
        assert_eq!(rows, vec!["0 0".to_string(), "000".to_string()]);
    }

    #[test]
    fn embedded_worlds_have_start_and_goal() {
        for def in embedded_worlds() {
            assert!(
                def.rows.iter().any(|r| r.contains('S')),
                "{} has no start",
                def.name
            );
            assert!(
                def.rows.iter().any(|r| r.contains('O')),
                "{} has no goal",
                def.name
            );
        }
    }

    #[test]
    fn embedded_worlds_load() {
        for def in embedded_worlds() {
            let mut grid = Grid::new();
            grid.load(&def.rows, Catalog::shared());
            assert!(grid.max_y() > 0, "{} is empty", def.name);
            assert!(grid.contains(grid.start_pos()));
            assert_ne!(grid.start_pos(), Pos::new(0, 0), "{} start not found", def.name);
        }
    }

    #[test]
    fn missing_directory_falls_back_to_embedded() {
        let defs = discover(Path::new("/nonexistent/worlds"));
        assert_eq!(defs.len(), embedded_worlds().len());
    }
}

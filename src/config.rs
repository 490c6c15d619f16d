/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub pacing: PacingConfig,
    pub worlds_dir: PathBuf,
    pub test_inputs: PathBuf,
}

/// Presentation pacing. The simulation resolves instantly; these delays
/// only shape how the outcome is replayed on screen.
#[derive(Clone, Debug)]
pub struct PacingConfig {
    /// Per-row fall delay is `fall_base_ms / depth + fall_floor_ms`, so a
    /// long fall visibly accelerates.
    pub fall_base_ms: u64,
    pub fall_floor_ms: u64,
    /// Delay between scripted commands in test mode.
    pub script_step_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    pacing: TomlPacing,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPacing {
    #[serde(default = "default_fall_base")]
    fall_base_ms: u64,
    #[serde(default = "default_fall_floor")]
    fall_floor_ms: u64,
    #[serde(default = "default_script_step")]
    script_step_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_worlds_dir")]
    worlds_dir: String,
    #[serde(default = "default_test_inputs")]
    test_inputs: String,
}

// ── Defaults ──

fn default_fall_base() -> u64 { 100 }
fn default_fall_floor() -> u64 { 50 }
fn default_script_step() -> u64 { 100 }
fn default_worlds_dir() -> String { "worlds".into() }
fn default_test_inputs() -> String { "test_inputs.txt".into() }

impl Default for TomlPacing {
    fn default() -> Self {
        TomlPacing {
            fall_base_ms: default_fall_base(),
            fall_floor_ms: default_fall_floor(),
            script_step_ms: default_script_step(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            worlds_dir: default_worlds_dir(),
            test_inputs: default_test_inputs(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let worlds_dir = resolve_dir(&search_dirs, &toml_cfg.general.worlds_dir);
        let test_inputs = resolve_file(&search_dirs, &toml_cfg.general.test_inputs);

        GameConfig {
            pacing: PacingConfig {
                fall_base_ms: toml_cfg.pacing.fall_base_ms,
                fall_floor_ms: toml_cfg.pacing.fall_floor_ms,
                script_step_ms: toml_cfg.pacing.script_step_ms,
            },
            worlds_dir,
            test_inputs,
        }
    }
}

/// Resolve a possibly-relative directory against the search dirs.
fn resolve_dir(search_dirs: &[PathBuf], value: &str) -> PathBuf {
    if PathBuf::from(value).is_absolute() {
        return PathBuf::from(value);
    }
    search_dirs
        .iter()
        .map(|d| d.join(value))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from(value))
}

/// Resolve a possibly-relative file path against the search dirs.
fn resolve_file(search_dirs: &[PathBuf], value: &str) -> PathBuf {
    if PathBuf::from(value).is_absolute() {
        return PathBuf::from(value);
    }
    search_dirs
        .iter()
        .map(|d| d.join(value))
        .find(|p| p.is_file())
        .unwrap_or_else(|| PathBuf::from(value))
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (resolve symlinks)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gets_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.pacing.fall_base_ms, 100);
        assert_eq!(cfg.general.worlds_dir, "worlds");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[pacing]\nfall_base_ms = 40\n",
        )
        .unwrap();
        assert_eq!(cfg.pacing.fall_base_ms, 40);
        assert_eq!(cfg.pacing.fall_floor_ms, 50);
        assert_eq!(cfg.general.test_inputs, "test_inputs.txt");
    }
}

/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), or from
/// an explicit `--config` path.
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::sim::resources::BUILTIN_LEVELS;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Directory holding `levelN.txt`, `companions.txt` and `banners.txt`.
    /// `None` when the configured directory does not exist.
    pub data_dir: Option<PathBuf>,
    pub level_count: usize,
    pub gamepad: GamepadConfig,
    pub sound_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub advance: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    sound: TomlSound,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_data_dir")]
    data_dir: String,
    #[serde(default = "default_level_count")]
    level_count: usize,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_advance")]
    advance: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

// ── Defaults ──

fn default_data_dir() -> String { "data".into() }
fn default_level_count() -> usize { BUILTIN_LEVELS }
fn default_advance() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_sound_enabled() -> bool { true }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            data_dir: default_data_dir(),
            level_count: default_level_count(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            advance: default_advance(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `explicit`, or from `config.toml` in the search dirs.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = match explicit {
            Some(path) => read_toml(path).unwrap_or_default(),
            None => load_toml(&search_dirs),
        };
        Self::resolve(toml_cfg, &search_dirs)
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve data directory
        let dir_str = &toml_cfg.general.data_dir;
        let data_dir = if Path::new(dir_str).is_absolute() {
            Some(PathBuf::from(dir_str)).filter(|p| p.is_dir())
        } else {
            search_dirs.iter().map(|d| d.join(dir_str)).find(|p| p.is_dir())
        };
        debug!("data directory: {data_dir:?}");

        GameConfig {
            data_dir,
            level_count: toml_cfg.general.level_count,
            gamepad: GamepadConfig {
                advance: toml_cfg.gamepad.advance,
                quit: toml_cfg.gamepad.quit,
            },
            sound_enabled: toml_cfg.sound.enabled,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its data.
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
    search_dirs
        .iter()
        .map(|dir| dir.join("config.toml"))
        .find(|path| path.exists())
        .and_then(|path| read_toml(&path))
        .unwrap_or_default()
}

/// Read and parse one file. Problems are logged and yield None.
fn read_toml(path: &Path) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_toml(&text, path),
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            None
        }
    }
}

fn parse_toml(text: &str, path: &Path) -> Option<TomlConfig> {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!("{} parse error: {e}; using default settings", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TomlConfig {
        parse_toml(text, Path::new("config.toml")).unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("");
        assert_eq!(cfg.general.data_dir, "data");
        assert_eq!(cfg.general.level_count, BUILTIN_LEVELS);
        assert_eq!(cfg.gamepad.advance, vec!["Start".to_string()]);
        assert!(cfg.sound.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse("[general]\nlevel_count = 8\n\n[sound]\nenabled = false\n");
        assert_eq!(cfg.general.level_count, 8);
        assert_eq!(cfg.general.data_dir, "data");
        assert!(!cfg.sound.enabled);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(parse_toml("[general\nlevel_count = ", Path::new("x.toml")).is_none());
        assert!(parse_toml("[general]\nlevel_count = \"many\"", Path::new("x.toml")).is_none());
    }

    #[test]
    fn explicit_config_file_is_read() {
        let path = std::env::temp_dir()
            .join(format!("keytrail-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[general]\nlevel_count = 7\n\n[gamepad]\nquit = [\"B\"]\n\n[sound]\nenabled = false\n",
        )
        .unwrap();
        let cfg = GameConfig::load(Some(&path));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.level_count, 7);
        assert!(!cfg.sound_enabled);
        assert_eq!(cfg.gamepad.quit, vec!["B".to_string()]);
        assert_eq!(cfg.gamepad.advance, vec!["Start".to_string()]);
    }

    #[test]
    fn missing_explicit_file_gives_defaults() {
        let cfg = GameConfig::load(Some(Path::new("/no/such/keytrail.toml")));
        assert_eq!(cfg.level_count, BUILTIN_LEVELS);
        assert!(cfg.sound_enabled);
    }

    #[test]
    fn missing_data_dir_resolves_to_none() {
        let mut toml_cfg = TomlConfig::default();
        toml_cfg.general.data_dir = "no-such-dir-for-keytrail".into();
        let cfg = GameConfig::resolve(toml_cfg, &[PathBuf::from(".")]);
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn shipped_data_dir_is_found() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let cfg = GameConfig::resolve(TomlConfig::default(), &[root.clone()]);
        assert_eq!(cfg.data_dir, Some(root.join("data")));
    }
}

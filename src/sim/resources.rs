/// Game data sources: level grids, companion messages and banner messages.
///
/// ## Sources (priority order, chosen in `main`):
///   1. `--builtin` forces the embedded pack
///   2. `--data-dir <DIR>` (missing files are fatal)
///   3. `data_dir` from config.toml, if that directory exists
///   4. Built-in embedded pack
///
/// ## Directory layout:
///   `level1.txt` .. `levelN.txt`, `companions.txt`, `banners.txt`
///   Message files hold one message per line.

use std::path::{Path, PathBuf};

use crate::error::{GameError, GameResult};

pub trait ResourceSource {
    fn level_count(&self) -> usize;
    /// Zero-based level index.
    fn read_level_text(&self, index: usize) -> GameResult<String>;
    fn read_companion_messages(&self) -> GameResult<Vec<String>>;
    /// File-supplied banners only; the greeting is added by the session.
    fn read_banner_messages(&self) -> GameResult<Vec<String>>;
}

/// The first banner of every run.
pub fn greeting(name: &str) -> String {
    format!("       Happy Birthday {name}!!!       Use w, a, s, d to move to the Exit E")
}

fn split_messages(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim_end_matches('\r').to_string()).collect()
}

// ══════════════════════════════════════════════════════════════
// Directory source
// ══════════════════════════════════════════════════════════════

pub struct DirResources {
    dir: PathBuf,
    level_count: usize,
}

impl DirResources {
    pub fn new(dir: impl Into<PathBuf>, level_count: usize) -> Self {
        DirResources { dir: dir.into(), level_count }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, file: &str) -> GameResult<String> {
        let path = self.dir.join(file);
        std::fs::read_to_string(&path).map_err(|source| GameError::ResourceLoad {
            name: path.display().to_string(),
            source,
        })
    }
}

impl ResourceSource for DirResources {
    fn level_count(&self) -> usize {
        self.level_count
    }

    fn read_level_text(&self, index: usize) -> GameResult<String> {
        self.read(&format!("level{}.txt", index + 1))
    }

    fn read_companion_messages(&self) -> GameResult<Vec<String>> {
        self.read("companions.txt").map(|t| split_messages(&t))
    }

    fn read_banner_messages(&self) -> GameResult<Vec<String>> {
        self.read("banners.txt").map(|t| split_messages(&t))
    }
}

// ══════════════════════════════════════════════════════════════
// Embedded pack
// ══════════════════════════════════════════════════════════════

const EMBEDDED_LEVELS: &[&str] = &[
    include_str!("../../data/level1.txt"),
    include_str!("../../data/level2.txt"),
    include_str!("../../data/level3.txt"),
    include_str!("../../data/level4.txt"),
];
const EMBEDDED_COMPANIONS: &str = include_str!("../../data/companions.txt");
const EMBEDDED_BANNERS: &str = include_str!("../../data/banners.txt");

/// Number of levels shipped with the game.
pub const BUILTIN_LEVELS: usize = 4;

pub struct EmbeddedResources;

impl ResourceSource for EmbeddedResources {
    fn level_count(&self) -> usize {
        EMBEDDED_LEVELS.len()
    }

    fn read_level_text(&self, index: usize) -> GameResult<String> {
        EMBEDDED_LEVELS
            .get(index)
            .map(|t| t.to_string())
            .ok_or_else(|| GameError::ResourceLoad {
                name: format!("built-in level {}", index + 1),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such built-in level"),
            })
    }

    fn read_companion_messages(&self) -> GameResult<Vec<String>> {
        Ok(split_messages(EMBEDDED_COMPANIONS))
    }

    fn read_banner_messages(&self) -> GameResult<Vec<String>> {
        Ok(split_messages(EMBEDDED_BANNERS))
    }
}

// ══════════════════════════════════════════════════════════════
// In-memory source (tests)
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    pub levels: Vec<String>,
    pub companions: Vec<String>,
    pub banners: Vec<String>,
}

#[cfg(test)]
impl MemoryResources {
    pub fn with_levels(levels: &[&str]) -> Self {
        MemoryResources {
            levels: levels.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl ResourceSource for MemoryResources {
    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn read_level_text(&self, index: usize) -> GameResult<String> {
        self.levels.get(index).cloned().ok_or_else(|| GameError::ResourceLoad {
            name: format!("level {}", index + 1),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such level"),
        })
    }

    fn read_companion_messages(&self) -> GameResult<Vec<String>> {
        Ok(self.companions.clone())
    }

    fn read_banner_messages(&self) -> GameResult<Vec<String>> {
        Ok(self.banners.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{parse_level, MessageDeck};

    #[test]
    fn embedded_pack_parses() {
        let res = EmbeddedResources;
        assert_eq!(res.level_count(), BUILTIN_LEVELS);
        let mut banners = vec![greeting("Tess")];
        banners.extend(res.read_banner_messages().unwrap());
        let mut deck = MessageDeck::new(res.read_companion_messages().unwrap(), banners);
        for i in 0..res.level_count() {
            let text = res.read_level_text(i).unwrap();
            parse_level(&text, &mut deck).unwrap_or_else(|e| panic!("level {}: {e}", i + 1));
        }
    }

    #[test]
    fn missing_directory_is_a_resource_error() {
        let res = DirResources::new("/definitely/not/here", 2);
        match res.read_level_text(0) {
            Err(GameError::ResourceLoad { name, .. }) => assert!(name.ends_with("level1.txt")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(res.read_companion_messages().is_err());
    }

    #[test]
    fn shipped_data_dir_matches_embedded() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let res = DirResources::new(dir.clone(), BUILTIN_LEVELS);
        assert_eq!(res.dir(), dir.as_path());
        assert_eq!(res.read_level_text(0).unwrap(), EmbeddedResources.read_level_text(0).unwrap());
        assert_eq!(
            res.read_companion_messages().unwrap(),
            EmbeddedResources.read_companion_messages().unwrap()
        );
    }

    #[test]
    fn greeting_names_the_player() {
        assert!(greeting("Ada").contains("Happy Birthday Ada!!!"));
    }
}

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PREFS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Light or dark after resolving `System` against the terminal.
    ///
    /// `colorfgbg` is the `COLORFGBG` value ("fg;bg"); a background of 7 or 15 is light.
    pub fn resolve(&self, colorfgbg: Option<&str>) -> Theme {
        match self {
            Theme::System => {
                let bg = colorfgbg.and_then(|v| v.rsplit(';').next());
                match bg {
                    Some("7") | Some("15") => Theme::Light,
                    _ => Theme::Dark,
                }
            }
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Prefs {
    pub theme: Theme,
    pub onboarding_complete: bool,
}

#[derive(Serialize, Deserialize)]
struct PrefsFile {
    version: u32,
    prefs: Prefs,
}

/// Small binary key-value file for UI preferences
#[derive(Debug, Clone)]
pub struct PrefStore {
    path: Option<PathBuf>,
}

impl PrefStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `<config_dir>/owlpost/prefs.bin`
    pub fn default_location() -> Self {
        Self {
            path: dirs::config_dir().map(|p| p.join("owlpost/prefs.bin")),
        }
    }

    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Missing, unreadable or outdated files give defaults
    pub fn load(&self) -> Prefs {
        let Some(path) = &self.path else {
            return Prefs::default();
        };

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Prefs::default(),
        };

        let stored: PrefsFile = match bincode::deserialize_from(BufReader::new(file)) {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "ignoring unreadable prefs");
                return Prefs::default();
            }
        };

        if stored.version != PREFS_VERSION {
            return Prefs::default();
        }

        stored.prefs
    }

    pub fn save(&self, prefs: &Prefs) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = PrefsFile {
            version: PREFS_VERSION,
            prefs: *prefs,
        };
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &stored)?;

        info!(theme = prefs.theme.label(), onboarding = prefs.onboarding_complete, "prefs saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefStore::new(dir.path().join("prefs.bin"));
        assert_eq!(store.load(), Prefs::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefStore::new(dir.path().join("nested/prefs.bin"));
        let prefs = Prefs {
            theme: Theme::Light,
            onboarding_complete: true,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.bin");
        fs::write(&path, b"not bincode").unwrap();
        assert_eq!(PrefStore::new(path).load(), Prefs::default());
    }

    #[test]
    fn test_theme_cycle_and_resolve() {
        assert_eq!(Theme::System.next(), Theme::Light);
        assert_eq!(Theme::Light.next().next(), Theme::System);

        assert_eq!(Theme::System.resolve(Some("0;15")), Theme::Light);
        assert_eq!(Theme::System.resolve(Some("15;0")), Theme::Dark);
        assert_eq!(Theme::System.resolve(None), Theme::Dark);
        assert_eq!(Theme::Light.resolve(Some("15;0")), Theme::Light);
    }
}

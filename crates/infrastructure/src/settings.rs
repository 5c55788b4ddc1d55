//! Test settings discovery for placeholder resolution.
//!
//! Service areas keep a flat string map at
//! `areas/<service>/tests/.testsettings.json`. The project root is either
//! given explicitly or found by walking upward from the working directory to
//! the first directory containing `areas/`.

use mcp_eval_application::SettingsSource;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SETTINGS_FILE: &str = ".testsettings.json";

/// Settings backed by a service area's `.testsettings.json`.
#[derive(Debug, Default, Clone)]
pub struct TestSettingsSource {
    values: HashMap<String, String>,
}

impl TestSettingsSource {
    /// Load settings for a service area.
    ///
    /// A missing settings file is normal and yields an empty source;
    /// a malformed one is reported and treated the same way.
    pub fn discover(root: Option<&Path>, area: &str) -> Self {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => match find_project_root() {
                Some(root) => root,
                None => {
                    debug!(area, "No project root with an areas/ directory found");
                    return Self::default();
                }
            },
        };

        let path = root
            .join("areas")
            .join(area)
            .join("tests")
            .join(SETTINGS_FILE);
        Self::from_file(&path)
    }

    /// Load settings from an explicit file path.
    pub fn from_file(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!(path = %path.display(), "No test settings file");
                return Self::default();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&contents) {
            Ok(values) => {
                debug!(path = %path.display(), keys = values.len(), "Loaded test settings");
                Self { values }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed test settings file, ignoring");
                Self::default()
            }
        }
    }
}

impl SettingsSource for TestSettingsSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn find_project_root() -> Option<PathBuf> {
    let current = std::env::current_dir().ok()?;
    current
        .ancestors()
        .find(|dir| dir.join("areas").is_dir())
        .map(Path::to_path_buf)
}

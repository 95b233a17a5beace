use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::PreferenceError;

/// String key/value storage for preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Read a `"true"` / `"false"` flag, falling back to `default` when unset.
    fn get_bool(&self, key: &str, default: bool) -> Result<bool, PreferenceError> {
        Ok(self.get(key)?.map_or(default, |v| v == "true"))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), PreferenceError> {
        self.set(key, if value { "true" } else { "false" })
    }
}

/// In-memory store, lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The file is read once on open and rewritten on every `set`. A missing
/// file reads as empty and is created on the first write.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();

        let values: BTreeMap<String, String> = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| PreferenceError::Parse {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = values.len(), "Opened preferences");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let content =
            serde_json::to_string_pretty(&self.values).map_err(|e| PreferenceError::Parse {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, content).map_err(|e| io_error(&self.path, e))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PreferenceError {
    PreferenceError::Io {
        path: path.display().to_string(),
        source,
    }
}

//! Durable string-valued key/value slots backing the task list.

use anyhow::{anyhow, Context, Result};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

mod sqlite;

pub use sqlite::{normalize_database_url, SqliteSlotStore};

/// A key/value slot that survives process restarts.
///
/// Writes overwrite the previous value for the key. Implementations are used from a
/// single thread and are free to block.
pub trait SlotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: SlotStore + ?Sized> SlotStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, String>,
    writes: usize,
    unavailable: bool,
}

/// In-process slot store. Clones share the same map, so a test can keep a handle and
/// inspect what the task store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .state
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Number of successful `set`/`remove` calls so far.
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Simulates quota exhaustion: every write fails until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.borrow_mut().unavailable = unavailable;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.borrow().values.get(key).cloned()
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.unavailable {
            return Err(anyhow!("storage quota exceeded while writing '{key}'"));
        }
        state.values.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.unavailable {
            return Err(anyhow!("storage unavailable while removing '{key}'"));
        }
        state.values.remove(key);
        state.writes += 1;
        Ok(())
    }
}

/// Slots kept in one JSON object file, rewritten whole on every change.
#[derive(Debug)]
pub struct FileSlotStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSlotStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directory '{}' for slot file",
                    parent.display()
                )
            })?;
        }

        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(values) => values,
                Err(err) => {
                    let backup = sidecar_path(&path, "corrupt");
                    tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %err,
                        "slot file is not a JSON object; moving it aside and starting empty"
                    );
                    fs::rename(&path, &backup).with_context(|| {
                        format!("failed to move unreadable slot file '{}'", path.display())
                    })?;
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read slot file '{}'", path.display()))
            }
        };

        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<()> {
        let serialized =
            serde_json::to_string_pretty(&self.values).context("failed to encode slot file")?;
        let tmp = sidecar_path(&self.path, "tmp");
        fs::write(&tmp, serialized)
            .with_context(|| format!("failed to write '{}'", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace '{}'", self.path.display()))?;
        Ok(())
    }
}

impl SlotStore for FileSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            // keep the in-memory map equal to what is on disk
            match previous {
                Some(previous) => self.values.insert(key.to_string(), previous),
                None => self.values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.values.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.flush() {
            self.values.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{suffix}"));
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use storage::{FileSlotStore, SlotStore, SqliteSlotStore};

pub const DEFAULT_CONFIG_FILE: &str = "tasklist.toml";
pub const SLOT_FILE_NAME: &str = "slots.json";
pub const SQLITE_FILE_NAME: &str = "tasks.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => bail!("unknown storage backend '{other}' (expected 'file' or 'sqlite')"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            backend: StorageBackend::File,
            database_url: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Explicit `data_dir`, else the platform's local data dir, else `./data`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match dirs::data_local_dir() {
            Some(base) => base.join("tasklist"),
            None => PathBuf::from("data"),
        }
    }

    pub fn resolved_database_url(&self) -> String {
        match &self.database_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => self
                .resolved_data_dir()
                .join(SQLITE_FILE_NAME)
                .to_string_lossy()
                .into_owned(),
        }
    }
}

/// Defaults, then the TOML file, then environment overrides.
///
/// An explicitly given config file must exist; the default `tasklist.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match config_path {
        Some(path) => read_settings_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_settings_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

pub fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let var = |short: &str, prefixed: &str| {
        lookup(prefixed)
            .or_else(|| lookup(short))
            .filter(|value| !value.trim().is_empty())
    };

    if let Some(v) = var("TASKLIST_DATA_DIR", "APP__DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = var("TASKLIST_BACKEND", "APP__BACKEND") {
        settings.backend = v.parse()?;
    }
    if let Some(v) = var("TASKLIST_DATABASE_URL", "APP__DATABASE_URL") {
        settings.database_url = Some(v);
    }
    if let Some(v) = var("TASKLIST_LOG", "APP__LOG") {
        settings.log_filter = v;
    }
    Ok(())
}

/// Opens the slot store selected by `settings`.
pub fn open_slot_store(settings: &Settings) -> anyhow::Result<Box<dyn SlotStore>> {
    match settings.backend {
        StorageBackend::File => {
            let path = settings.resolved_data_dir().join(SLOT_FILE_NAME);
            tracing::info!(path = %path.display(), "using file slot store");
            Ok(Box::new(FileSlotStore::open(path)?))
        }
        StorageBackend::Sqlite => {
            let url = settings.resolved_database_url();
            tracing::info!(database_url = %url, "using sqlite slot store");
            Ok(Box::new(SqliteSlotStore::open(&url)?))
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

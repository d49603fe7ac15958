use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::runtime::{Builder, Runtime};

use crate::SlotStore;

/// Slot store on a SQLite `slots` table.
///
/// The pool lives on a private current-thread runtime so callers keep a blocking API.
/// Must not be used from inside another tokio runtime.
pub struct SqliteSlotStore {
    runtime: Runtime,
    pool: Pool<Sqlite>,
}

impl SqliteSlotStore {
    pub fn open(database_url: &str) -> Result<Self> {
        let database_url = normalize_database_url(database_url);
        ensure_sqlite_parent_dir_exists(&database_url)?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build storage runtime")?;

        let pool = runtime.block_on(async {
            let connect_options =
                SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
            // one connection: an in-memory database is private to its connection
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(connect_options)
                .await?;
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS slots (
                    key        TEXT PRIMARY KEY NOT NULL,
                    value      TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .execute(&pool)
            .await
            .context("failed to ensure slots table exists")?;
            anyhow::Ok(pool)
        })?;

        tracing::debug!(database_url = %database_url, "opened sqlite slot store");
        Ok(Self { runtime, pool })
    }

    pub fn health_check(&self) -> Result<()> {
        let _: i64 = self
            .runtime
            .block_on(sqlx::query_scalar("SELECT 1").fetch_one(&self.pool))
            .context("sqlite ping failed")?;
        Ok(())
    }
}

impl SlotStore for SqliteSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.runtime
            .block_on(
                sqlx::query_scalar::<_, String>("SELECT value FROM slots WHERE key = ?")
                    .bind(key)
                    .fetch_optional(&self.pool),
            )
            .with_context(|| format!("failed to read slot '{key}'"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.runtime
            .block_on(
                sqlx::query(
                    r#"
                    INSERT INTO slots (key, value, updated_at) VALUES (?, ?, ?)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                    "#,
                )
                .bind(key)
                .bind(value)
                .bind(Utc::now())
                .execute(&self.pool),
            )
            .with_context(|| format!("failed to write slot '{key}'"))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.runtime
            .block_on(
                sqlx::query("DELETE FROM slots WHERE key = ?")
                    .bind(key)
                    .execute(&self.pool),
            )
            .with_context(|| format!("failed to remove slot '{key}'"))?;
        Ok(())
    }
}

/// Accepts `sqlite:` URLs as well as plain file paths.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

//! @acp:module "SQLite Store"
//! @acp:summary "Key-value store backed by a single SQLite table"
//! @acp:domain storage
//! @acp:layer io

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

use super::{validate_key, KeyValueStore};
use crate::error::{PolicyError, Result};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self { conn })
    }

    fn raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        match self.raw(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, key: &str, value: Value) -> Result<bool> {
        validate_key(key)?;
        let text = serde_json::to_string(&value)?;
        if self.raw(key)?.as_deref() == Some(text.as_str()) {
            return Ok(false);
        }
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, text],
            )
            .map_err(|e| PolicyError::save(key, e))?;
        Ok(true)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_get_and_unchanged() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert!(store.put("answers", json!({"a": 1})).unwrap());
        assert!(!store.put("answers", json!({"a": 1})).unwrap());
        assert_eq!(store.get("answers").unwrap(), Some(json!({"a": 1})));
        assert!(store.delete("answers").unwrap());
        assert_eq!(store.get("answers").unwrap(), None);
    }
}

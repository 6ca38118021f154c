use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

use crate::db::DbPool;

/// Key/value rows in the `settings` table. Values are stored as text and
/// parsed by the typed getters on the store.
pub struct Setting;

impl Setting {
    pub fn lookup(pool: &DbPool, key: &str) -> Option<String> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()
        .ok()
        .flatten()
        .flatten()
    }

    pub fn upsert(pool: &DbPool, key: &str, value: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map(|_| ())
        .map_err(|e| e.to_string())
    }

    /// Every stored pair; unset values come back as empty strings.
    pub fn snapshot(pool: &DbPool) -> HashMap<String, String> {
        let Ok(conn) = pool.get() else {
            return HashMap::new();
        };
        let Ok(mut stmt) = conn.prepare("SELECT key, value FROM settings") else {
            return HashMap::new();
        };
        let pairs = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let value: Option<String> = row.get(1)?;
            Ok((key, value.unwrap_or_default()))
        });
        match pairs {
            Ok(rows) => rows.flatten().collect(),
            Err(_) => HashMap::new(),
        }
    }
}

use rusqlite::params;

use crate::db::DbPool;

/// Server-side admin sessions. The cookie only carries the id.
pub struct Session;

impl Session {
    pub fn create(
        pool: &DbPool,
        user_id: i64,
        session_id: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO sessions (id, user_id, created_at, expires_at, ip_hash, user_agent)
             VALUES (?1, ?2, datetime('now'), ?3, ?4, ?5)",
            params![session_id, user_id, expires_at, ip_hash, user_agent],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// User id behind a session that has not expired yet.
    pub fn user_id(pool: &DbPool, session_id: &str) -> Option<i64> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT user_id FROM sessions WHERE id = ?1 AND expires_at > datetime('now')",
            params![session_id],
            |row| row.get(0),
        )
        .ok()
    }

    pub fn delete(pool: &DbPool, session_id: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn cleanup_expired(pool: &DbPool) -> usize {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.execute("DELETE FROM sessions WHERE expires_at <= datetime('now')", [])
            .unwrap_or(0)
    }
}

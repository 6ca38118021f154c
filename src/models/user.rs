use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, last_login_at, created_at";

/// An admin account. Only admins sign in; there is no public registration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl TryFrom<&Row<'_>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get("id")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            display_name: row.get("display_name")?,
            last_login_at: row.get("last_login_at")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl User {
    /// Name shown in the dashboard header.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }

    fn fetch_one<P: rusqlite::Params>(pool: &DbPool, filter: &str, args: P) -> Option<User> {
        let conn = pool.get().ok()?;
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, filter);
        conn.query_row(&sql, args, |row| User::try_from(row))
            .optional()
            .ok()
            .flatten()
    }

    pub fn get_by_id(pool: &DbPool, id: i64) -> Option<User> {
        Self::fetch_one(pool, "id = ?1", [id])
    }

    /// Emails match case-insensitively and ignore surrounding blanks.
    pub fn get_by_email(pool: &DbPool, email: &str) -> Option<User> {
        Self::fetch_one(pool, "email = ?1 COLLATE NOCASE", [email.trim()])
    }

    pub fn count(pool: &DbPool) -> i64 {
        pool.get()
            .ok()
            .and_then(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .ok()
            })
            .unwrap_or(0)
    }

    pub fn create(
        pool: &DbPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO users (email, password_hash, display_name) VALUES (?1, ?2, ?3)",
            params![email.trim(), password_hash, display_name],
        )
        .map_err(|e| format!("could not create user {}: {}", email.trim(), e))?;
        Ok(conn.last_insert_rowid())
    }

    pub fn touch_last_login(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE users SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?1",
                [id],
            )
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            return Err(format!("no user with id {}", id));
        }
        Ok(())
    }
}

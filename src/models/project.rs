use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

/// A gallery entry: one uploaded screenshot linking out to a project.
/// Stored in the `images` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub url: String,
    pub project_link: String,
    pub ranking: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectForm {
    pub url: String,
    pub project_link: String,
    pub ranking: i64,
}

impl Project {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get("id")?,
            url: row.get("url")?,
            project_link: row.get("project_link")?,
            ranking: row.get("ranking")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM images WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    /// All projects, lowest ranking first. Equal rankings keep insertion order.
    pub fn list(pool: &DbPool) -> Result<Vec<Self>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let mut stmt = conn
            .prepare("SELECT * FROM images ORDER BY ranking ASC, id ASC")
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], Self::from_row)
            .map_err(|e| e.to_string())?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| e.to_string())
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap_or(0)
    }

    pub fn create(pool: &DbPool, form: &ProjectForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO images (url, project_link, ranking) VALUES (?1, ?2, ?3)",
            params![form.url, form.project_link, form.ranking],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    /// Update link and ranking. The stored image is left alone.
    pub fn update(pool: &DbPool, id: i64, project_link: &str, ranking: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE images SET project_link = ?1, ranking = ?2 WHERE id = ?3",
                params![project_link, ranking, id],
            )
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            return Err("Project not found".to_string());
        }
        Ok(())
    }

    pub fn update_ranking(pool: &DbPool, id: i64, ranking: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE images SET ranking = ?1 WHERE id = ?2",
                params![ranking, id],
            )
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            return Err("Project not found".to_string());
        }
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute("DELETE FROM images WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            return Err("Project not found".to_string());
        }
        Ok(())
    }
}

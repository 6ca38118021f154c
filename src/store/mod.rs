use std::collections::HashMap;

use crate::models::contact::{Contact, ContactForm};
use crate::models::project::{Project, ProjectForm};
use crate::models::user::User;

pub mod sqlite;

/// Unified data-access trait. Every table operation goes through here.
/// The only implementation is `SqliteStore` (rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self) -> Result<(), String>;
    /// Cheap round-trip used by the health endpoint.
    fn ping(&self) -> Result<(), String>;

    // ── Settings ────────────────────────────────────────────────────
    fn setting_get(&self, key: &str) -> Option<String>;
    fn setting_get_or(&self, key: &str, default: &str) -> String {
        self.setting_get(key).unwrap_or_else(|| default.to_string())
    }
    fn setting_get_i64(&self, key: &str) -> i64 {
        self.setting_get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
    fn setting_set(&self, key: &str, value: &str) -> Result<(), String>;
    fn setting_all(&self) -> HashMap<String, String>;

    // ── Projects (`images` table) ───────────────────────────────────
    fn project_find_by_id(&self, id: i64) -> Option<Project>;
    fn project_list(&self) -> Result<Vec<Project>, String>;
    fn project_count(&self) -> i64;
    fn project_create(&self, form: &ProjectForm) -> Result<i64, String>;
    fn project_update(&self, id: i64, project_link: &str, ranking: i64) -> Result<(), String>;
    fn project_update_ranking(&self, id: i64, ranking: i64) -> Result<(), String>;
    fn project_delete(&self, id: i64) -> Result<(), String>;

    // ── Contacts ────────────────────────────────────────────────────
    fn contact_find_by_id(&self, id: i64) -> Option<Contact>;
    fn contact_list(&self) -> Result<Vec<Contact>, String>;
    fn contact_count(&self) -> i64;
    fn contact_create(&self, form: &ContactForm) -> Result<i64, String>;
    fn contact_delete(&self, id: i64) -> Result<(), String>;

    // ── Users ───────────────────────────────────────────────────────
    fn user_get_by_id(&self, id: i64) -> Option<User>;
    fn user_get_by_email(&self, email: &str) -> Option<User>;
    fn user_count(&self) -> i64;
    fn user_create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<i64, String>;
    fn user_touch_last_login(&self, id: i64) -> Result<(), String>;

    // ── Sessions ────────────────────────────────────────────────────
    fn session_create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), String>;
    fn session_get_user_id(&self, token: &str) -> Option<i64>;
    fn session_get_user(&self, token: &str) -> Option<User> {
        let uid = self.session_get_user_id(token)?;
        self.user_get_by_id(uid)
    }
    fn session_delete(&self, token: &str) -> Result<(), String>;
    fn session_cleanup_expired(&self) -> usize;
}

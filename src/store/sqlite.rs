use std::collections::HashMap;

use crate::db::DbPool;
use crate::models::contact::{Contact, ContactForm};
use crate::models::project::{Project, ProjectForm};
use crate::models::session::Session;
use crate::models::settings::Setting;
use crate::models::user::User;

use super::Store;

/// The production store: one pooled SQLite file, with each call handed to
/// the matching model.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn new_at(path: &str) -> Result<Self, String> {
        let pool = crate::db::init_pool(path)?;
        Ok(Self::new(pool))
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool)
    }

    fn seed_defaults(&self) -> Result<(), String> {
        crate::db::seed_defaults(&self.pool)
    }

    fn ping(&self) -> Result<(), String> {
        let conn = self.pool.get().map_err(|e| e.to_string())?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    // ── Settings ────────────────────────────────────────────────────

    fn setting_get(&self, key: &str) -> Option<String> {
        Setting::lookup(&self.pool, key)
    }

    fn setting_set(&self, key: &str, value: &str) -> Result<(), String> {
        Setting::upsert(&self.pool, key, value)
    }

    fn setting_all(&self) -> HashMap<String, String> {
        Setting::snapshot(&self.pool)
    }

    // ── Projects ────────────────────────────────────────────────────

    fn project_find_by_id(&self, id: i64) -> Option<Project> {
        Project::find_by_id(&self.pool, id)
    }

    fn project_list(&self) -> Result<Vec<Project>, String> {
        Project::list(&self.pool)
    }

    fn project_count(&self) -> i64 {
        Project::count(&self.pool)
    }

    fn project_create(&self, form: &ProjectForm) -> Result<i64, String> {
        Project::create(&self.pool, form)
    }

    fn project_update(&self, id: i64, project_link: &str, ranking: i64) -> Result<(), String> {
        Project::update(&self.pool, id, project_link, ranking)
    }

    fn project_update_ranking(&self, id: i64, ranking: i64) -> Result<(), String> {
        Project::update_ranking(&self.pool, id, ranking)
    }

    fn project_delete(&self, id: i64) -> Result<(), String> {
        Project::delete(&self.pool, id)
    }

    // ── Contacts ────────────────────────────────────────────────────

    fn contact_find_by_id(&self, id: i64) -> Option<Contact> {
        Contact::find_by_id(&self.pool, id)
    }

    fn contact_list(&self) -> Result<Vec<Contact>, String> {
        Contact::list(&self.pool)
    }

    fn contact_count(&self) -> i64 {
        Contact::count(&self.pool)
    }

    fn contact_create(&self, form: &ContactForm) -> Result<i64, String> {
        Contact::create(&self.pool, form)
    }

    fn contact_delete(&self, id: i64) -> Result<(), String> {
        Contact::delete(&self.pool, id)
    }

    // ── Users ───────────────────────────────────────────────────────

    fn user_get_by_id(&self, id: i64) -> Option<User> {
        User::get_by_id(&self.pool, id)
    }

    fn user_get_by_email(&self, email: &str) -> Option<User> {
        User::get_by_email(&self.pool, email)
    }

    fn user_count(&self) -> i64 {
        User::count(&self.pool)
    }

    fn user_create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<i64, String> {
        User::create(&self.pool, email, password_hash, display_name)
    }

    fn user_touch_last_login(&self, id: i64) -> Result<(), String> {
        User::touch_last_login(&self.pool, id)
    }

    // ── Sessions ────────────────────────────────────────────────────

    fn session_create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<(), String> {
        Session::create(&self.pool, user_id, token, expires_at, ip_hash, user_agent)
    }

    fn session_get_user_id(&self, token: &str) -> Option<i64> {
        Session::user_id(&self.pool, token)
    }

    fn session_delete(&self, token: &str) -> Result<(), String> {
        Session::delete(&self.pool, token)
    }

    fn session_cleanup_expired(&self) -> usize {
        Session::cleanup_expired(&self.pool)
    }
}

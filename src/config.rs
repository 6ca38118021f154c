use log::{info, warn};

pub const DEFAULT_DATABASE_PATH: &str = "website/db/folio.db";
pub const DEFAULT_STORAGE_DIR: &str = "website/uploads";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";
pub const DEFAULT_BUCKET: &str = "images";

/// Process-level configuration, read once from the environment at launch.
/// Shared via Rocket managed state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub storage_dir: String,
    pub public_url: String,
    pub bucket: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Honour `CF-Connecting-IP` / `X-Real-IP` / `X-Forwarded-For`. Only set
    /// this behind a reverse proxy that overwrites those headers.
    pub trust_proxy: bool,
    /// Set when both the database path and the public URL were given explicitly.
    configured: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing required values are logged and
    /// replaced by defaults so the site still renders.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = get("FOLIO_DATABASE_PATH");
        let public_url = get("FOLIO_PUBLIC_URL");

        if database_path.is_none() {
            warn!(
                "FOLIO_DATABASE_PATH is not set, falling back to {}",
                DEFAULT_DATABASE_PATH
            );
        }
        if public_url.is_none() {
            warn!(
                "FOLIO_PUBLIC_URL is not set, falling back to {}",
                DEFAULT_PUBLIC_URL
            );
        }
        let configured = database_path.is_some() && public_url.is_some();

        let cfg = AppConfig {
            database_path: database_path.unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            storage_dir: get("FOLIO_STORAGE_DIR").unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string()),
            public_url: public_url
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            bucket: get("FOLIO_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            admin_email: get("FOLIO_ADMIN_EMAIL"),
            admin_password: get("FOLIO_ADMIN_PASSWORD"),
            trust_proxy: get("FOLIO_TRUST_PROXY")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            configured,
        };
        info!(
            "Config: db={} storage={}/{} public_url={}",
            cfg.database_path, cfg.storage_dir, cfg.bucket, cfg.public_url
        );
        cfg
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Config pointing at explicit locations, treated as fully configured.
    #[cfg(test)]
    pub fn with_paths(database_path: &str, storage_dir: &str, public_url: &str) -> Self {
        AppConfig {
            database_path: database_path.to_string(),
            storage_dir: storage_dir.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            admin_email: None,
            admin_password: None,
            trust_proxy: false,
            configured: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_settings_fall_back_and_report_unconfigured() {
        let cfg = AppConfig::from_lookup(lookup_from(&[]));
        assert!(!cfg.is_configured());
        assert_eq!(cfg.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(cfg.public_url, DEFAULT_PUBLIC_URL);
        assert_eq!(cfg.bucket, "images");
        assert!(cfg.admin_email.is_none());
        assert!(!cfg.trust_proxy);
    }

    #[test]
    fn explicit_settings_are_used() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("FOLIO_DATABASE_PATH", "/tmp/x.db"),
            ("FOLIO_PUBLIC_URL", "https://example.com/"),
            ("FOLIO_BUCKET", "shots"),
            ("FOLIO_ADMIN_EMAIL", "me@example.com"),
            ("FOLIO_TRUST_PROXY", "True"),
        ]));
        assert!(cfg.trust_proxy);
        assert!(cfg.is_configured());
        assert_eq!(cfg.database_path, "/tmp/x.db");
        assert_eq!(cfg.public_url, "https://example.com");
        assert_eq!(cfg.bucket, "shots");
        assert_eq!(cfg.admin_email.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("FOLIO_DATABASE_PATH", "  "),
            ("FOLIO_PUBLIC_URL", "https://example.com"),
        ]));
        assert!(!cfg.is_configured());
        assert_eq!(cfg.database_path, DEFAULT_DATABASE_PATH);
    }
}

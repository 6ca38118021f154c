use log::{error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process;

use crate::config::AppConfig;
use crate::render::tech_row;

/// Served by the `/static` file server.
pub const STATIC_ROOT: &str = "website/static";

/// Directories the site expects next to the binary. Created if missing.
const REQUIRED_DIRS: &[&str] = &[
    "website",
    "website/static",
    "website/static/css",
    "website/static/tech",
    "website/templates",
    "website/templates/admin",
];

/// Admin pages cannot render without these.
const CRITICAL_TEMPLATES: &[&str] = &[
    "website/templates/admin/base.html.tera",
    "website/templates/admin/login.html.tera",
    "website/templates/admin/dashboard.html.tera",
    "website/templates/admin/project_edit.html.tera",
];

const STATIC_ASSETS: &[&str] = &["website/static/css/site.css", "website/static/css/admin.css"];

/// Run all boot checks before Rocket launches.
/// Creates missing directories, warns about missing assets, and exits if
/// the templates are absent or the database directory is not writable.
pub fn run(config: &AppConfig) {
    info!("Boot check starting...");
    let (warnings, errors) = check(config);

    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some pages may look wrong.",
            warnings
        );
    } else {
        info!("Boot check passed.");
    }
}

/// Returns `(warnings, errors)`.
fn check(config: &AppConfig) -> (u32, u32) {
    let mut warnings = 0u32;
    let mut errors = 0u32;

    let db_dir = Path::new(&config.database_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf());
    let upload_dir = Path::new(&config.storage_dir).join(&config.bucket);

    // ── 1. Directories ─────────────────────────────────
    let mut dirs: Vec<std::path::PathBuf> = REQUIRED_DIRS.iter().map(|d| Path::new(d).to_path_buf()).collect();
    dirs.extend(db_dir.clone());
    dirs.push(upload_dir.clone());
    for dir in &dirs {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Templates ───────────────────────────────────
    for file in CRITICAL_TEMPLATES {
        if !Path::new(file).exists() {
            error!("  MISSING critical template: {}", file);
            errors += 1;
        }
    }

    // ── 3. Static assets ───────────────────────────────
    for file in STATIC_ASSETS {
        if !Path::new(file).exists() {
            warn!("  Missing static asset: {} (pages will be unstyled)", file);
            warnings += 1;
        }
    }

    // ── 4. Database directory writable ─────────────────
    if let Some(dir) = db_dir.filter(|d| d.exists()) {
        if let Err(e) = probe_write(&dir) {
            error!("  Database directory not writable: {}", e);
            errors += 1;
        }
    }

    // ── 5. Upload bucket writable ──────────────────────
    if upload_dir.exists() {
        if let Err(e) = probe_write(&upload_dir) {
            warn!("  Upload directory not writable: {} (uploads will fail)", e);
            warnings += 1;
        }
    }

    // ── 6. Rocket.toml ─────────────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        warnings += 1;
    }

    (warnings, errors)
}

/// `/static/...` paths named in settings (hero image, og:image, technology
/// icons) whose file is not under `static_root`. Remote URLs are skipped.
pub fn missing_assets(settings: &HashMap<String, String>, static_root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = ["hero_image", "site_og_image"]
        .iter()
        .filter_map(|key| settings.get(*key))
        .map(|v| v.trim().to_string())
        .collect();
    for key in ["technologies_row_one", "technologies_row_two"] {
        if let Some(row) = settings.get(key) {
            paths.extend(tech_row(row).into_iter().filter_map(|item| item.icon));
        }
    }

    let mut missing: Vec<String> = paths
        .into_iter()
        .filter(|p| match p.strip_prefix("/static/") {
            Some(rel) => !static_root.join(rel).is_file(),
            None => false,
        })
        .collect();
    missing.dedup();
    missing
}

/// Log every asset referenced from settings that the file server cannot serve.
pub fn warn_missing_assets(settings: &HashMap<String, String>) {
    for path in missing_assets(settings, Path::new(STATIC_ROOT)) {
        warn!("  Missing static asset: {} (referenced from settings)", path);
    }
}

fn probe_write(dir: &Path) -> std::io::Result<()> {
    let test_file = dir.join(".write_test");
    fs::write(&test_file, "test")?;
    let _ = fs::remove_file(&test_file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        probe_write(dir.path()).unwrap();
        assert!(!dir.path().join(".write_test").exists());
    }

    #[test]
    fn referenced_assets_are_checked_against_static_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tech")).unwrap();
        fs::write(dir.path().join("tech/rust.svg"), "<svg/>").unwrap();

        let settings: HashMap<String, String> = [
            ("hero_image", "/static/img/me.jpg"),
            ("site_og_image", "https://cdn.example.com/card.png"),
            ("technologies_row_one", "Rust|/static/tech/rust.svg,Go|/static/tech/go.svg,Html"),
            ("technologies_row_two", ""),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(
            missing_assets(&settings, dir.path()),
            vec!["/static/img/me.jpg".to_string(), "/static/tech/go.svg".to_string()]
        );
    }

    #[test]
    fn blank_asset_settings_are_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings: HashMap<String, String> =
            [("hero_image".to_string(), String::new())].into_iter().collect();
        assert!(missing_assets(&settings, dir.path()).is_empty());
    }

    #[test]
    fn probe_write_fails_for_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_write(&dir.path().join("nope")).is_err());
    }
}

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool(path: &str) -> Result<DbPool, String> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(10)
        .build(manager)
        .map_err(|e| e.to_string())?;

    // WAL for concurrent readers while the admin writes
    let conn = pool.get().map_err(|e| e.to_string())?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .map_err(|e| e.to_string())?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), String> {
    let conn = pool.get().map_err(|e| e.to_string())?;

    conn.execute_batch(
        "
        -- Project records shown in the gallery
        CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY,
            url TEXT NOT NULL,
            project_link TEXT NOT NULL,
            ranking INTEGER NOT NULL DEFAULT 1,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_images_ranking ON images(ranking);

        -- Contact form submissions
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            message TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Admin accounts (bcrypt hashes only)
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE NOT NULL COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            display_name TEXT NOT NULL DEFAULT '',
            last_login_at DATETIME,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Admin sessions
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL,
            ip_hash TEXT,
            user_agent TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        );
        ",
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), String> {
    let conn = pool.get().map_err(|e| e.to_string())?;

    let defaults = vec![
        // Site
        ("site_name", "Your Name"),
        ("site_title", "Web Developer Portfolio"),
        ("site_description", "Web developer building responsive, dynamic and user-friendly websites. Check out my projects and skills!"),
        ("site_keywords", "web developer, portfolio, frontend developer, projects"),
        ("site_og_image", ""),
        // Hero
        ("hero_greeting", "I'm"),
        ("hero_bio", "Hi, I'm a web developer passionate about building responsive, dynamic, and user-friendly websites. With a focus on clean, efficient code, I deliver scalable solutions tailored to client needs. Let's build something amazing together!"),
        ("hero_image", ""),
        // Sections
        ("projects_heading", "My Latest Projects"),
        ("technologies_heading", "Technologies"),
        // Comma-separated `Label` or `Label|/static/tech/icon.png`
        ("technologies_row_one", "Html,Css,Sass,JavaScript,TypeScript,Node js,React js,Next js,Python"),
        ("technologies_row_two", "Postman,Mamp,Tailwind,Strapi,Supabase,Firebase,Flet,Npm"),
        ("contact_heading", "Contact Us!"),
        ("contact_location", ""),
        ("contact_phone", ""),
        ("contact_email", ""),
        // Footer
        ("social_facebook", ""),
        ("social_instagram", ""),
        ("social_whatsapp", ""),
        ("footer_copyright", "All rights reserved"),
        // Images
        ("images_allowed_types", "jpg,jpeg,png,gif,webp"),
        ("images_max_upload_mb", "10"),
        ("images_remote_hosts", ""),
        // Security
        ("session_expiry_hours", "24"),
        ("login_rate_limit", "5"),
    ];

    for (key, value) in defaults {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(|e| e.to_string())?;
    }

    Ok(())
}

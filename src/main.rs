#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

mod boot;
mod config;
mod contact;
mod db;
mod gallery;
mod images;
mod models;
mod projects;
mod rate_limit;
mod render;
mod routes;
mod security;
mod storage;
mod store;


use config::AppConfig;
use rate_limit::RateLimiter;
use storage::local::LocalBucket;
use storage::BlobStore;
use store::sqlite::SqliteStore;
use store::Store;

/// Admin and sign-in pages must never be served from a cache.
pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info {
            name: "No-Cache Admin Pages",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        let path = req.uri().path();
        if path.starts_with("/admin") || path.starts_with("/signin") {
            res.set_header(Header::new(
                "Cache-Control",
                "no-store, no-cache, must-revalidate, max-age=0",
            ));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml(render::render_not_found())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml(render::render_server_error())
}

/// Assemble the application around an already prepared store and bucket.
fn build_rocket(
    config: AppConfig,
    store: Arc<dyn Store>,
    bucket: Arc<dyn BlobStore>,
) -> Rocket<Build> {
    let uploads_dir = config.storage_dir.clone();

    rocket::build()
        .manage(store)
        .manage(bucket)
        .manage(config)
        .manage(RateLimiter::new())
        .attach(Template::fairing())
        .attach(NoCacheAdmin)
        .mount("/static", FileServer::from(boot::STATIC_ROOT))
        .mount("/uploads", FileServer::from(uploads_dir))
        .mount("/", routes::public::routes())
        .mount("/", routes::auth::routes())
        .mount("/admin", routes::admin::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = AppConfig::from_env();

    // Boot check: create directories, validate templates and writable paths
    boot::run(&config);

    let store = SqliteStore::new_at(&config.database_path)
        .expect("Failed to initialize database pool");
    store
        .run_migrations()
        .expect("Failed to run database migrations");
    store
        .seed_defaults()
        .expect("Failed to seed default settings");
    boot::warn_missing_assets(&store.setting_all());

    if let Err(e) = security::auth::provision_admin(&store, &config) {
        log::error!("Admin provisioning failed: {}", e);
    }
    let swept = store.session_cleanup_expired();
    if swept > 0 {
        log::info!("Removed {} expired session(s)", swept);
    }

    let bucket = LocalBucket::new(&config.storage_dir, &config.bucket, &config.public_url)
        .expect("Failed to prepare upload storage");

    log::info!("Serving portfolio at {}", config.public_url);
    build_rocket(config, Arc::new(store), Arc::new(bucket))
}

use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::contact;
use crate::gallery::{self, Tile};
use crate::models::contact::ContactForm;
use crate::storage::BlobStore;
use crate::store::Store;

// ── Gallery ────────────────────────────────────────────

/// Projects in display order, ranking ascending.
#[get("/projects")]
pub fn projects(store: &State<Arc<dyn Store>>, config: &State<AppConfig>) -> Json<Vec<Tile>> {
    Json(gallery::tiles(&**store.inner(), config))
}

// ── Contact ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub status: &'static str,
}

#[post("/contact", format = "json", data = "<body>")]
pub fn contact_submit(
    body: Json<ContactRequest>,
    store: &State<Arc<dyn Store>>,
    config: &State<AppConfig>,
) -> Json<ContactResponse> {
    let body = body.into_inner();
    let form = ContactForm {
        name: body.name,
        email: body.email,
        message: body.message,
    };
    let outcome = contact::submit(&**store.inner(), config, form);
    Json(ContactResponse {
        success: outcome.status.is_success(),
        status: outcome.status.message(),
    })
}

// ── Health ─────────────────────────────────────────────

#[get("/health")]
pub fn health(store: &State<Arc<dyn Store>>, bucket: &State<Arc<dyn BlobStore>>) -> Json<Value> {
    let database = match store.ping() {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            log::error!("Health check: database unreachable: {}", e);
            "error".to_string()
        }
    };
    let storage = if bucket.is_available() {
        "ok"
    } else {
        log::error!("Health check: bucket {} is not available", bucket.bucket());
        "error"
    };
    let status = if database == "ok" && storage == "ok" {
        "ok"
    } else {
        "degraded"
    };
    Json(json!({
        "status": status,
        "database": database,
        "storage": storage,
        "bucket": bucket.bucket(),
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![projects, contact_submit, health]
}

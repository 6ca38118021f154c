use rocket::request::FlashMessage;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};
use std::sync::Arc;

use super::apply_flash;
use crate::models::contact::{sort_newest_first, Contact};
use crate::security::auth::AdminUser;
use crate::store::Store;

const DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Projects,
    Contacts,
}

impl View {
    pub fn parse(view: Option<&str>) -> Self {
        match view {
            Some("contacts") => View::Contacts,
            _ => View::Projects,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            View::Projects => "projects",
            View::Contacts => "contacts",
        }
    }
}

/// Contact rows as shown in the viewer, newest first.
pub fn contact_rows(store: &dyn Store) -> Vec<Value> {
    let mut contacts: Vec<Contact> = match store.contact_list() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Error fetching contacts: {}", e);
            return Vec::new();
        }
    };
    sort_newest_first(&mut contacts);
    contacts
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "email": c.email,
                "message": c.message,
                "date": c.created_at.format(DATE_FORMAT).to_string(),
            })
        })
        .collect()
}

#[get("/?<view>")]
pub fn dashboard(
    admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    flash: Option<FlashMessage<'_>>,
    view: Option<&str>,
) -> Template {
    let s: &dyn Store = &**store.inner();
    let view = View::parse(view);

    let mut context = json!({
        "page_title": "Dashboard",
        "site_name": s.setting_get_or("site_name", "Portfolio"),
        "admin_label": admin.user.label(),
        "view": view.as_str(),
        "project_count": s.project_count(),
        "contact_count": s.contact_count(),
    });

    match view {
        View::Projects => {
            let projects = match s.project_list() {
                Ok(p) => p,
                Err(e) => {
                    log::error!("Error fetching projects: {}", e);
                    Vec::new()
                }
            };
            context["projects"] = json!(projects);
            context["allowed_types"] = json!(s.setting_get_or("images_allowed_types", ""));
            context["max_upload_mb"] = json!(s.setting_get_i64("images_max_upload_mb"));
        }
        View::Contacts => {
            context["contacts"] = json!(contact_rows(s));
        }
    }

    apply_flash(&mut context, &flash);
    Template::render("admin/dashboard", &context)
}

use rocket::request::FlashMessage;
use serde_json::{json, Value};

pub mod contacts;
pub mod dashboard;
pub mod projects;

pub(crate) const PROJECTS_VIEW: &str = "/admin?view=projects";
pub(crate) const CONTACTS_VIEW: &str = "/admin?view=contacts";

/// Copy a pending flash message into a template context.
pub(crate) fn apply_flash(context: &mut Value, flash: &Option<FlashMessage<'_>>) {
    if let Some(ref f) = flash {
        context["flash_kind"] = json!(f.kind());
        context["flash_msg"] = json!(f.message());
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        dashboard::dashboard,
        projects::project_upload,
        projects::project_edit,
        projects::project_update,
        projects::project_delete,
        projects::project_ranking,
        contacts::contact_delete,
    ]
}

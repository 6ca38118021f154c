use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::State;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::contact;
use crate::gallery;
use crate::models::contact::ContactForm;
use crate::render::{self, ContactView};
use crate::store::Store;

#[derive(Debug, FromForm)]
pub struct ContactFormData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub return_to: Option<String>,
}

impl ContactFormData {
    fn to_form(&self) -> ContactForm {
        ContactForm {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
        }
    }
}

/// Only the two pages that carry the form are valid targets.
fn return_target(return_to: Option<&str>) -> &'static str {
    match return_to {
        Some("/contact") => "/contact",
        _ => "/",
    }
}

fn flash_status<'a>(flash: &'a Option<FlashMessage<'_>>) -> Option<(bool, &'a str)> {
    flash.as_ref().map(|f| (f.kind() == "success", f.message()))
}

fn home_page(
    store: &dyn Store,
    config: &AppConfig,
    form: &ContactForm,
    status: Option<(bool, &str)>,
) -> String {
    let tiles = gallery::tiles(store, config);
    render::render_home(
        &store.setting_all(),
        &config.public_url,
        &tiles,
        &ContactView { form, status },
    )
}

fn contact_page(
    store: &dyn Store,
    config: &AppConfig,
    form: &ContactForm,
    status: Option<(bool, &str)>,
) -> String {
    render::render_contact_page(
        &store.setting_all(),
        &config.public_url,
        &ContactView { form, status },
    )
}

// ── Landing page ───────────────────────────────────────

#[get("/")]
pub fn homepage(
    store: &State<Arc<dyn Store>>,
    config: &State<AppConfig>,
    flash: Option<FlashMessage<'_>>,
) -> RawHtml<String> {
    let form = ContactForm::default();
    RawHtml(home_page(&**store.inner(), config, &form, flash_status(&flash)))
}

// ── Contact ────────────────────────────────────────────

#[get("/contact")]
pub fn contact_get(
    store: &State<Arc<dyn Store>>,
    config: &State<AppConfig>,
    flash: Option<FlashMessage<'_>>,
) -> RawHtml<String> {
    let form = ContactForm::default();
    RawHtml(contact_page(&**store.inner(), config, &form, flash_status(&flash)))
}

/// Success redirects back with a flash so a reload does not resubmit.
/// Any other status re-renders the page with the typed values kept.
#[post("/contact", data = "<form>")]
pub fn contact_submit(
    form: Form<ContactFormData>,
    store: &State<Arc<dyn Store>>,
    config: &State<AppConfig>,
) -> Result<Flash<Redirect>, RawHtml<String>> {
    let s: &dyn Store = &**store.inner();
    let target = return_target(form.return_to.as_deref());
    let outcome = contact::submit(s, config, form.to_form());

    if outcome.status.is_success() {
        return Ok(Flash::success(
            Redirect::to(target),
            outcome.status.message(),
        ));
    }

    let status = Some((false, outcome.status.message()));
    let html = if target == "/contact" {
        contact_page(s, config, &outcome.form, status)
    } else {
        home_page(s, config, &outcome.form, status)
    };
    Err(RawHtml(html))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![homepage, contact_get, contact_submit]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_target_is_restricted() {
        assert_eq!(return_target(Some("/contact")), "/contact");
        assert_eq!(return_target(Some("/")), "/");
        assert_eq!(return_target(Some("https://evil.example")), "/");
        assert_eq!(return_target(None), "/");
    }
}

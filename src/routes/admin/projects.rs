use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::tokio::io::AsyncReadExt;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;
use std::sync::Arc;

use super::{apply_flash, PROJECTS_VIEW};
use crate::projects::{self, UploadDraft, MSG_EDIT_INVALID};
use crate::security::auth::AdminUser;
use crate::storage::BlobStore;
use crate::store::Store;

fn report<T>(result: Result<T, String>, ok: impl FnOnce(T) -> &'static str) -> Flash<Redirect> {
    match result {
        Ok(v) => Flash::success(Redirect::to(PROJECTS_VIEW), ok(v)),
        Err(e) => {
            log::error!("{}", e);
            Flash::error(Redirect::to(PROJECTS_VIEW), e)
        }
    }
}

// ── Upload ─────────────────────────────────────────────

#[derive(FromForm)]
pub struct UploadFormData<'f> {
    pub image: Option<TempFile<'f>>,
    pub project_link: Option<String>,
    pub ranking: Option<i64>,
}

async fn read_upload(file: &TempFile<'_>) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(file.len() as usize);
    if file.len() > 0 {
        let reader = file.open().await?;
        rocket::tokio::pin!(reader);
        reader.read_to_end(&mut bytes).await?;
    }
    Ok(bytes)
}

#[post("/projects", data = "<form>")]
pub async fn project_upload(
    _admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    bucket: &State<Arc<dyn BlobStore>>,
    form: Form<UploadFormData<'_>>,
) -> Flash<Redirect> {
    let mut draft = UploadDraft {
        project_link: form.project_link.clone().unwrap_or_default(),
        ranking: form.ranking.unwrap_or(0),
        ..Default::default()
    };

    if let Some(ref file) = form.image {
        draft.content_type_ext = file
            .content_type()
            .and_then(|ct| ct.extension())
            .map(|e| e.to_string());
        draft.file_name = file
            .raw_name()
            .map(|rn| rn.dangerous_unsafe_unsanitized_raw().as_str().to_string());
        draft.bytes = match read_upload(file).await {
            Ok(b) => b,
            Err(e) => {
                log::error!("Could not read uploaded file: {}", e);
                return Flash::error(Redirect::to(PROJECTS_VIEW), format!("Error: {}", e));
            }
        };
    }

    let millis = chrono::Utc::now().timestamp_millis();
    let result = projects::upload(&**store.inner(), &**bucket.inner(), &draft, millis);
    report(result, |done| done.message)
}

// ── Edit ───────────────────────────────────────────────

#[get("/projects/<id>/edit")]
pub fn project_edit(
    admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    flash: Option<FlashMessage<'_>>,
    id: i64,
) -> Option<Template> {
    let s: &dyn Store = &**store.inner();
    let project = projects::edit_buffer(s, id)?;

    let mut context = json!({
        "page_title": "Edit Project",
        "site_name": s.setting_get_or("site_name", "Portfolio"),
        "admin_label": admin.user.label(),
        "project": project,
    });
    apply_flash(&mut context, &flash);
    Some(Template::render("admin/project_edit", &context))
}

#[derive(Debug, FromForm)]
pub struct EditFormData {
    pub project_link: Option<String>,
    pub ranking: Option<i64>,
}

#[post("/projects/<id>/edit", data = "<form>")]
pub fn project_update(
    _admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    id: i64,
    form: Form<EditFormData>,
) -> Flash<Redirect> {
    let link = form.project_link.as_deref().unwrap_or("");
    let ranking = form.ranking.unwrap_or(0);
    match projects::update(&**store.inner(), id, link, ranking) {
        Err(e) if e == MSG_EDIT_INVALID => {
            Flash::error(Redirect::to(format!("/admin/projects/{}/edit", id)), e)
        }
        result => report(result, |done| done.message),
    }
}

// ── Delete ─────────────────────────────────────────────

#[post("/projects/<id>/delete")]
pub fn project_delete(
    _admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    bucket: &State<Arc<dyn BlobStore>>,
    id: i64,
) -> Flash<Redirect> {
    report(
        projects::delete(&**store.inner(), &**bucket.inner(), id),
        |msg| msg,
    )
}

// ── Ranking ────────────────────────────────────────────

#[derive(Debug, FromForm)]
pub struct RankingFormData {
    pub ranking: Option<i64>,
}

#[post("/projects/<id>/ranking", data = "<form>")]
pub fn project_ranking(
    _admin: AdminUser,
    store: &State<Arc<dyn Store>>,
    id: i64,
    form: Form<RankingFormData>,
) -> Flash<Redirect> {
    let ranking = form.ranking.unwrap_or(0);
    report(projects::set_ranking(&**store.inner(), id, ranking), |done| {
        done.message
    })
}

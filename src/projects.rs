//! Admin curation of the project gallery: upload, edit, delete and
//! re-ranking. Every operation is a short sequence of store/bucket calls
//! that stops at the first failure and reports the raw error.

use log::{error, info, warn};

use crate::images;
use crate::models::project::{Project, ProjectForm};
use crate::storage::{key_from_public_url, BlobStore};
use crate::store::Store;

pub const MSG_UPLOAD_INVALID: &str = "Please provide an image, a project link, and a valid ranking.";
pub const MSG_EDIT_INVALID: &str = "Please provide a project link and a valid ranking.";

const MAX_KEY_STEM: usize = 60;

/// A file picked in the upload form plus its metadata.
#[derive(Debug, Clone, Default)]
pub struct UploadDraft {
    pub file_name: Option<String>,
    /// Extension implied by the content type, if the browser sent one.
    pub content_type_ext: Option<String>,
    pub bytes: Vec<u8>,
    pub project_link: String,
    pub ranking: i64,
}

/// Successful mutation: the status line and the refetched list.
#[derive(Debug)]
pub struct Done {
    pub message: &'static str,
    pub projects: Vec<Project>,
}

/// Storage key built from the link text and a millisecond timestamp,
/// e.g. `https-example-com-shop_1700000000000.png`.
pub fn storage_key(project_link: &str, millis: i64, ext: &str) -> String {
    let mut stem = slug::slugify(project_link);
    if stem.len() > MAX_KEY_STEM {
        stem.truncate(MAX_KEY_STEM);
        stem = stem.trim_end_matches('-').to_string();
    }
    if stem.is_empty() {
        stem = "project".to_string();
    }
    format!("{}_{}.{}", stem, millis, ext.to_lowercase())
}

fn refetch(store: &dyn Store) -> Result<Vec<Project>, String> {
    store.project_list()
}

/// Upload blob → public URL → insert row → refetch.
/// If the row cannot be written the blob is removed again.
pub fn upload(
    store: &dyn Store,
    bucket: &dyn BlobStore,
    draft: &UploadDraft,
    millis: i64,
) -> Result<Done, String> {
    let link = draft.project_link.trim();
    if draft.bytes.is_empty() || link.is_empty() || draft.ranking < 1 {
        return Err(MSG_UPLOAD_INVALID.to_string());
    }

    let ext = images::upload_extension(
        draft.file_name.as_deref(),
        draft.content_type_ext.as_deref(),
    )
    .ok_or_else(|| "Error: Could not determine the file type.".to_string())?;
    images::validate_upload(store, &ext, &draft.bytes).map_err(|e| format!("Error: {}", e))?;

    let key = storage_key(link, millis, &ext);
    bucket
        .upload(&key, &draft.bytes)
        .map_err(|e| format!("Error: {}", e))?;

    let public_url = match bucket.public_url(&key) {
        Some(u) => u,
        None => {
            discard_blob(bucket, &key);
            return Err("Error: Failed to retrieve public URL.".to_string());
        }
    };

    let form = ProjectForm {
        url: public_url,
        project_link: link.to_string(),
        ranking: draft.ranking,
    };
    if let Err(e) = store.project_create(&form) {
        discard_blob(bucket, &key);
        return Err(format!("Error: {}", e));
    }
    info!("Uploaded project image {}", key);

    let projects = refetch(store).map_err(|e| format!("Error: {}", e))?;
    Ok(Done {
        message: "Image uploaded and saved to the database successfully!",
        projects,
    })
}

fn discard_blob(bucket: &dyn BlobStore, key: &str) {
    match bucket.remove(key) {
        Ok(()) => warn!("Removed orphaned blob {}", key),
        Err(e) => error!("Could not remove orphaned blob {}: {}", key, e),
    }
}

/// Current values of a project, to prefill the edit form.
pub fn edit_buffer(store: &dyn Store, id: i64) -> Option<Project> {
    store.project_find_by_id(id)
}

/// Save link and ranking from the edit form. The stored image is kept.
pub fn update(store: &dyn Store, id: i64, project_link: &str, ranking: i64) -> Result<Done, String> {
    let link = project_link.trim();
    if link.is_empty() || ranking < 1 {
        return Err(MSG_EDIT_INVALID.to_string());
    }
    store
        .project_update(id, link, ranking)
        .map_err(|e| format!("Error updating project: {}", e))?;
    let projects = refetch(store).map_err(|e| format!("Error updating project: {}", e))?;
    Ok(Done {
        message: "Project updated successfully!",
        projects,
    })
}

/// Single-field ranking change from the per-row input. Last write wins.
pub fn set_ranking(store: &dyn Store, id: i64, ranking: i64) -> Result<Done, String> {
    if ranking < 1 {
        return Err("Error updating ranking: Ranking must be at least 1".to_string());
    }
    store
        .project_update_ranking(id, ranking)
        .map_err(|e| format!("Error updating ranking: {}", e))?;
    let projects = refetch(store).map_err(|e| format!("Error updating ranking: {}", e))?;
    Ok(Done {
        message: "Ranking updated successfully!",
        projects,
    })
}

/// Remove the blob named by the URL's last path segment, then the row.
/// Stops at the first failure; nothing is undone.
pub fn delete(store: &dyn Store, bucket: &dyn BlobStore, id: i64) -> Result<&'static str, String> {
    let fail = |msg: &str| format!("Error deleting project: {}", msg);

    let project = store
        .project_find_by_id(id)
        .ok_or_else(|| fail("Project not found"))?;
    let key = key_from_public_url(&project.url).ok_or_else(|| fail("File path invalid"))?;

    bucket.remove(&key).map_err(|e| fail(&e))?;
    store.project_delete(id).map_err(|e| {
        error!("Blob {} removed but row {} remains: {}", key, id, e);
        fail(&e)
    })?;

    info!("Deleted project {} ({})", id, key);
    Ok("Project deleted successfully!")
}

use std::path::Path;

use log::warn;

use crate::store::Store;

/// Lower-cased extension taken from the original file name, falling back to
/// the extension implied by the content type.
pub fn upload_extension(file_name: Option<&str>, content_type_ext: Option<&str>) -> Option<String> {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty())
        .or_else(|| content_type_ext.map(|e| e.to_lowercase()))
}

/// Check an uploaded file against the image settings: allowed extension,
/// size limit, and that the bytes decode as an image.
pub fn validate_upload(store: &dyn Store, ext: &str, bytes: &[u8]) -> Result<(), String> {
    let allowed = store.setting_get_or("images_allowed_types", "jpg,jpeg,png,gif,webp");
    if !allowed
        .split(',')
        .map(|s| s.trim())
        .any(|a| a.eq_ignore_ascii_case(ext))
    {
        return Err(format!("File type .{} is not allowed", ext));
    }

    let max_mb = store.setting_get_i64("images_max_upload_mb").max(1) as usize;
    if bytes.len() > max_mb * 1024 * 1024 {
        return Err(format!("File is larger than {} MB", max_mb));
    }

    image::load_from_memory(bytes)
        .map(|_| ())
        .map_err(|e| format!("Not a readable image: {}", e))
}

/// Remote hosts allowed to serve gallery images, from the
/// `images_remote_hosts` setting (comma separated).
pub fn remote_hosts(store: &dyn Store) -> Vec<String> {
    store
        .setting_get_or("images_remote_hosts", "")
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Whether an image URL may be rendered. Site-relative paths and the site's
/// own host are always allowed; other hosts must be on the allowlist.
pub fn is_allowed_source(src: &str, own_base: &str, allowlist: &[String]) -> bool {
    if src.starts_with('/') && !src.starts_with("//") {
        return true;
    }
    let parsed = match url::Url::parse(src) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return false;
    }
    let host = match parsed.host_str() {
        Some(h) => h.to_lowercase(),
        None => return false,
    };
    let own_host = url::Url::parse(own_base)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()));
    if own_host.as_deref() == Some(host.as_str()) {
        return true;
    }
    let allowed = allowlist.iter().any(|h| h == &host);
    if !allowed {
        warn!("Image host {} is not on the allowlist", host);
    }
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec![
            "abc.storage.example.co".to_string(),
            "other.example.app".to_string(),
        ]
    }

    #[test]
    fn relative_and_own_host_are_allowed() {
        assert!(is_allowed_source("/uploads/images/a.png", "https://me.dev", &[]));
        assert!(is_allowed_source("https://me.dev/uploads/images/a.png", "https://me.dev", &[]));
    }

    #[test]
    fn allowlisted_hosts_pass_others_fail() {
        let h = hosts();
        assert!(is_allowed_source("https://abc.storage.example.co/x.png", "https://me.dev", &h));
        assert!(is_allowed_source("https://OTHER.example.app/y.png", "https://me.dev", &h));
        assert!(!is_allowed_source("https://evil.example.net/z.png", "https://me.dev", &h));
    }

    #[test]
    fn protocol_relative_and_odd_schemes_fail() {
        let h = hosts();
        assert!(!is_allowed_source("//abc.storage.example.co/x.png", "https://me.dev", &[]));
        assert!(!is_allowed_source("javascript:alert(1)", "https://me.dev", &h));
        assert!(!is_allowed_source("data:image/png;base64,AAAA", "https://me.dev", &h));
    }

    #[test]
    fn extension_prefers_file_name() {
        assert_eq!(upload_extension(Some("Shot.PNG"), Some("jpeg")).as_deref(), Some("png"));
        assert_eq!(upload_extension(Some("noext"), Some("jpeg")).as_deref(), Some("jpeg"));
        assert_eq!(upload_extension(None, None), None);
    }
}

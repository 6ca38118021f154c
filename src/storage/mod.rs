pub mod local;

/// Object storage for uploaded project images.
/// Keys are flat file names inside one bucket.
pub trait BlobStore: Send + Sync {
    /// Name of the bucket, used in public URLs and reported by the health check.
    fn bucket(&self) -> &str;

    /// Store `bytes` under `key`. An existing key is never overwritten.
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), String>;

    /// Stable, externally fetchable URL for `key`, or `None` if nothing
    /// is stored there.
    fn public_url(&self, key: &str) -> Option<String>;

    /// Remove the blob at `key`. A missing key is an error.
    fn remove(&self, key: &str) -> Result<(), String>;

    fn exists(&self, key: &str) -> bool;

    /// Whether the bucket is reachable at all (health check).
    fn is_available(&self) -> bool;
}

/// Derive a storage key from a public URL: the last path segment, with
/// any query string or fragment dropped and percent-encoding undone.
/// Returns `None` for URLs that end in `/` or carry no path.
pub fn key_from_public_url(public_url: &str) -> Option<String> {
    let path = match url::Url::parse(public_url) {
        Ok(u) => u.path().to_string(),
        // Relative URLs (e.g. "/uploads/images/x.png")
        Err(_) => public_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let last = path.rsplit('/').next()?;
    if last.is_empty() {
        return None;
    }
    let decoded = percent_encoding::percent_decode_str(last)
        .decode_utf8()
        .ok()?
        .into_owned();
    if !is_valid_key(&decoded) {
        return None;
    }
    Some(decoded)
}

/// Keys must be a single flat segment.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains('/')
        && !key.contains('\\')
        && !key.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_last_segment() {
        assert_eq!(
            key_from_public_url("https://cdn.example.com/uploads/images/site_1700.png"),
            Some("site_1700.png".to_string())
        );
    }

    #[test]
    fn key_ignores_query_and_fragment() {
        assert_eq!(
            key_from_public_url("https://cdn.example.com/uploads/images/a.png?v=2#top"),
            Some("a.png".to_string())
        );
        assert_eq!(
            key_from_public_url("/uploads/images/b.webp?x=1"),
            Some("b.webp".to_string())
        );
    }

    #[test]
    fn key_is_percent_decoded() {
        assert_eq!(
            key_from_public_url("https://cdn.example.com/uploads/images/my%20shot.png"),
            Some("my shot.png".to_string())
        );
    }

    #[test]
    fn encoded_separators_and_bad_utf8_are_rejected() {
        assert_eq!(key_from_public_url("https://cdn.example.com/uploads/images/..%2Fdb.sqlite"), None);
        assert_eq!(key_from_public_url("https://cdn.example.com/uploads/images/%FF.png"), None);
    }

    #[test]
    fn trailing_slash_has_no_key() {
        assert_eq!(key_from_public_url("https://cdn.example.com/uploads/"), None);
        assert_eq!(key_from_public_url("https://cdn.example.com"), None);
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(!is_valid_key(".."));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key("a\\b"));
        assert!(is_valid_key("site_1.png"));
    }
}

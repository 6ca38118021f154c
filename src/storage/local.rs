use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{error, info};

use super::{is_valid_key, BlobStore};

/// Filesystem bucket: `<storage_dir>/<bucket>/<key>`, served by Rocket's
/// `FileServer` at `/uploads/<bucket>/<key>`.
pub struct LocalBucket {
    root: PathBuf,
    bucket: String,
    public_base: String,
}

impl LocalBucket {
    pub fn new(storage_dir: &str, bucket: &str, public_base: &str) -> Result<Self, String> {
        if !is_valid_key(bucket) {
            return Err(format!("Invalid bucket name: {}", bucket));
        }
        let root = Path::new(storage_dir).join(bucket);
        fs::create_dir_all(&root).map_err(|e| e.to_string())?;
        info!("Storage bucket ready at {}", root.display());
        Ok(LocalBucket {
            root,
            bucket: bucket.to_string(),
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        if !is_valid_key(key) {
            return Err(format!("Invalid storage key: {}", key));
        }
        Ok(self.root.join(key))
    }
}

impl BlobStore for LocalBucket {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), String> {
        let path = self.path_for(key)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    format!("The resource already exists: {}", key)
                }
                _ => e.to_string(),
            })?;
        if let Err(e) = file.write_all(bytes) {
            error!("Failed writing blob {}: {}", key, e);
            let _ = fs::remove_file(&path);
            return Err(e.to_string());
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> Option<String> {
        if !self.exists(key) {
            return None;
        }
        Some(format!(
            "{}/uploads/{}/{}",
            self.public_base, self.bucket, key
        ))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let path = self.path_for(key)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => format!("Object not found: {}", key),
            _ => e.to_string(),
        })
    }

    fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::key_from_public_url;

    fn bucket(dir: &tempfile::TempDir) -> LocalBucket {
        LocalBucket::new(dir.path().to_str().unwrap(), "images", "https://example.com/").unwrap()
    }

    #[test]
    fn upload_then_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let b = bucket(&dir);
        b.upload("shot_1.png", b"png").unwrap();
        assert_eq!(
            b.public_url("shot_1.png").as_deref(),
            Some("https://example.com/uploads/images/shot_1.png")
        );
        assert!(dir.path().join("images").join("shot_1.png").is_file());
    }

    #[test]
    fn public_url_roundtrips_to_key() {
        let dir = tempfile::tempdir().unwrap();
        let b = bucket(&dir);
        b.upload("k.png", b"x").unwrap();
        let url = b.public_url("k.png").unwrap();
        assert_eq!(key_from_public_url(&url).as_deref(), Some("k.png"));
    }

    #[test]
    fn upload_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let b = bucket(&dir);
        b.upload("dup.png", b"one").unwrap();
        let err = b.upload("dup.png", b"two").unwrap_err();
        assert!(err.contains("already exists"));
        assert_eq!(fs::read(dir.path().join("images/dup.png")).unwrap(), b"one");
    }

    #[test]
    fn missing_blob_has_no_url_and_cannot_be_removed() {
        let dir = tempfile::tempdir().unwrap();
        let b = bucket(&dir);
        assert!(b.public_url("nope.png").is_none());
        assert!(b.remove("nope.png").is_err());
    }

    #[test]
    fn remove_deletes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let b = bucket(&dir);
        b.upload("gone.png", b"x").unwrap();
        b.remove("gone.png").unwrap();
        assert!(!b.exists("gone.png"));
    }

    #[test]
    fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let b = bucket(&dir);
        assert!(b.upload("../escape.png", b"x").is_err());
        assert!(b.remove("../../etc/passwd").is_err());
    }
}

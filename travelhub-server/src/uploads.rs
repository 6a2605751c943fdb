//! Resort picture storage under `<static_dir>/uploads`

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use travelhub_core::config::UPLOADS_SUBDIR;

/// Extensions accepted for pictures (compared case-insensitively)
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn is_allowed(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Strip directory components (either separator) and replace anything
/// outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // Never produce a hidden or parent-directory name
    cleaned.trim_start_matches('.').to_owned()
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    static_dir: PathBuf,
}

impl UploadStore {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Write an allowed picture and return its path relative to the static
    /// directory (`uploads/<uuid>_<name>`). Disallowed files are dropped
    /// and yield `None`.
    pub async fn save(&self, upload: &PictureUpload) -> io::Result<Option<String>> {
        if upload.file_name.is_empty() || !is_allowed(&upload.file_name) {
            tracing::debug!(file_name = %upload.file_name, "picture dropped: extension not allowed");
            return Ok(None);
        }

        let dir = self.static_dir.join(UPLOADS_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;

        let stored = format!("{}_{}", Uuid::new_v4(), sanitize(&upload.file_name));
        tokio::fs::write(dir.join(&stored), &upload.bytes).await?;

        let relative = format!("{UPLOADS_SUBDIR}/{stored}");
        tracing::debug!(picture = %relative, bytes = upload.bytes.len(), "picture stored");
        Ok(Some(relative))
    }

    /// Remove a previously saved picture. Missing files are not an error.
    pub async fn remove(&self, relative: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.static_dir.join(relative)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_ignores_case() {
        assert!(is_allowed("beach.PNG"));
        assert!(is_allowed("a.jpeg"));
        assert!(!is_allowed("setup.exe"));
        assert!(!is_allowed("png"));
        assert!(!is_allowed("photo.png.exe"));
    }

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize(r"C:\Users\me\My Photo.jpg"), "My_Photo.jpg");
        assert_eq!(sanitize("plage d'été.gif"), "plage_d__t_.gif");
        assert_eq!(sanitize("..png"), "png");
    }

    #[tokio::test]
    async fn saves_allowed_and_drops_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let saved = store
            .save(&PictureUpload {
                file_name: "Lake View.png".into(),
                bytes: b"\x89PNG".to_vec(),
            })
            .await
            .unwrap()
            .unwrap();
        assert!(saved.starts_with("uploads/"));
        assert!(saved.ends_with("_Lake_View.png"));
        assert_eq!(std::fs::read(dir.path().join(&saved)).unwrap(), b"\x89PNG");

        let dropped = store
            .save(&PictureUpload {
                file_name: "virus.exe".into(),
                bytes: vec![0; 4],
            })
            .await
            .unwrap();
        assert!(dropped.is_none());

        store.remove(&saved).await.unwrap();
        assert!(!dir.path().join(&saved).exists());
        store.remove(&saved).await.unwrap();
    }
}

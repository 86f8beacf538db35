//! Local photo storage area.
//!
//! All photo binaries — batch uploads staged by the transport layer and
//! bytes fetched from Drive — land in one directory under server-assigned
//! names. Names are collision-resistant (millisecond timestamp plus a
//! uuid or the Drive file id), so the area is append-only and concurrent
//! imports never contend on a path.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::models::UploadedFile;

#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    public_prefix: String,
}

impl PhotoStorage {
    /// Open the storage area, creating the directory if needed.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.root).with_context(|| {
            format!("Failed to create storage root: {}", config.root.display())
        })?;

        Ok(Self {
            root: config.root.clone(),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Persist one uploaded binary under a unique name, keeping the
    /// original extension. Returns the (original name → stored path)
    /// entry the pipeline matches against.
    pub fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<UploadedFile> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let stored_name = format!(
            "{}-{}{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            ext
        );

        self.write(&stored_name, bytes)?;

        Ok(UploadedFile {
            original_name: original_name.to_string(),
            stored_path: self.public_path(&stored_name),
        })
    }

    /// Persist bytes fetched from a Drive link.
    ///
    /// The extension is always `.jpg` regardless of the actual content
    /// type — preserved source behavior that downstream consumers rely
    /// on, not corrected here.
    pub fn save_drive_image(&self, file_id: &str, bytes: &[u8]) -> Result<String> {
        let stored_name = format!(
            "{}-{}.jpg",
            chrono::Utc::now().timestamp_millis(),
            file_id
        );

        self.write(&stored_name, bytes)?;
        Ok(self.public_path(&stored_name))
    }

    /// Stage every regular file in a directory as a batch upload, in
    /// directory-listing order. Used by `rintake import --photos`; the
    /// HTTP server stages multipart parts directly instead.
    pub fn stage_photos_dir(&self, dir: &Path) -> Result<Vec<UploadedFile>> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read photos dir: {}", dir.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        let mut uploads = Vec::with_capacity(entries.len());
        for path in entries {
            let original_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read photo: {}", path.display()))?;
            uploads.push(self.save_upload(&original_name, &bytes)?);
        }

        Ok(uploads)
    }

    fn write(&self, stored_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(stored_name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write photo: {}", path.display()))
    }

    fn public_path(&self, stored_name: &str) -> String {
        format!("{}/{}", self.public_prefix, stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(tmp: &TempDir) -> PhotoStorage {
        PhotoStorage::open(&StorageConfig {
            root: tmp.path().join("uploads"),
            public_prefix: "/uploads/retailers".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn save_upload_keeps_extension_and_prefix() {
        let tmp = TempDir::new().unwrap();
        let st = storage(&tmp);

        let file = st.save_upload("photo1.jpg", b"bytes").unwrap();
        assert_eq!(file.original_name, "photo1.jpg");
        assert!(file.stored_path.starts_with("/uploads/retailers/"));
        assert!(file.stored_path.ends_with(".jpg"));

        let stored_name = file.stored_path.rsplit('/').next().unwrap();
        assert_eq!(
            std::fs::read(st.root().join(stored_name)).unwrap(),
            b"bytes"
        );
    }

    #[test]
    fn stored_names_never_collide() {
        let tmp = TempDir::new().unwrap();
        let st = storage(&tmp);

        let a = st.save_upload("same.png", b"a").unwrap();
        let b = st.save_upload("same.png", b"b").unwrap();
        assert_ne!(a.stored_path, b.stored_path);
    }

    #[test]
    fn drive_images_are_always_jpg() {
        let tmp = TempDir::new().unwrap();
        let st = storage(&tmp);

        let path = st.save_drive_image("XYZ123", b"png-bytes-actually").unwrap();
        assert!(path.ends_with(".jpg"));
        assert!(path.contains("XYZ123"));
    }

    #[test]
    fn stage_photos_dir_maps_basenames() {
        let tmp = TempDir::new().unwrap();
        let st = storage(&tmp);

        let photos = tmp.path().join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        std::fs::write(photos.join("a.jpg"), b"a").unwrap();
        std::fs::write(photos.join("b.png"), b"b").unwrap();

        let uploads = st.stage_photos_dir(&photos).unwrap();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].original_name, "a.jpg");
        assert_eq!(uploads[1].original_name, "b.png");
    }
}

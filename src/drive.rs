//! Drive remote-link resolver.
//!
//! Recognized links carry an opaque file id either as a `/d/<id>` path
//! segment or an `id=<id>` query parameter. Resolution extracts the id,
//! issues a single GET against the export/download form, and persists the
//! bytes into the photo storage area. There is no retry; the caller
//! decides what a failure means (the orchestrator falls back to the
//! original URL).

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

use crate::config::DriveConfig;
use crate::storage::PhotoStorage;

static PATH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").unwrap());
static QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").unwrap());

/// Why a Drive resolution failed. Extraction failure and fetch failure
/// are distinct kinds: the first never touches the network.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("no file id found in drive link")]
    NoIdentifier,
    #[error("drive fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),
}

/// Extract the Drive file id from any common link format.
///
/// The `/d/<id>` path form is tried first, then the `id=` query
/// parameter, matching how shared links are most often pasted.
pub fn extract_file_id(url: &str) -> Option<&str> {
    PATH_ID
        .captures(url)
        .or_else(|| QUERY_ID.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Download a Drive-hosted image and persist it locally.
///
/// One attempt, bounded by `drive.timeout_secs`. Any transport error or
/// non-2xx status is a [`DriveError::Fetch`]. On success returns the
/// public storage path of the saved file.
pub async fn download_image(
    config: &DriveConfig,
    storage: &PhotoStorage,
    url: &str,
) -> Result<String, DriveError> {
    let file_id = extract_file_id(url).ok_or(DriveError::NoIdentifier)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| DriveError::Fetch(e.into()))?;

    let export_url = format!("{}?export=download&id={}", config.export_base, file_id);

    let response = client
        .get(&export_url)
        .send()
        .await
        .map_err(|e| DriveError::Fetch(e.into()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DriveError::Fetch(anyhow::anyhow!(
            "drive export returned {}",
            status
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DriveError::Fetch(e.into()))?;

    storage
        .save_drive_image(file_id, &bytes)
        .map_err(DriveError::Fetch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use tempfile::TempDir;

    #[test]
    fn extracts_path_segment_id() {
        assert_eq!(
            extract_file_id("https://drive.google.com/file/d/XYZ123/view?usp=sharing"),
            Some("XYZ123")
        );
    }

    #[test]
    fn extracts_query_parameter_id() {
        assert_eq!(
            extract_file_id("https://drive.google.com/open?id=aB_c-9"),
            Some("aB_c-9")
        );
        assert_eq!(
            extract_file_id("https://drive.google.com/uc?export=view&id=QQ77"),
            Some("QQ77")
        );
    }

    #[test]
    fn path_form_wins_over_query_form() {
        assert_eq!(
            extract_file_id("https://drive.google.com/file/d/PATH1/view?id=QUERY2"),
            Some("PATH1")
        );
    }

    #[test]
    fn unrecognized_links_yield_no_id() {
        assert_eq!(extract_file_id("https://drive.google.com/drive/folders"), None);
        assert_eq!(extract_file_id("photo1.jpg"), None);
    }

    #[tokio::test]
    async fn missing_id_fails_before_any_fetch() {
        let tmp = TempDir::new().unwrap();
        let storage = PhotoStorage::open(&StorageConfig {
            root: tmp.path().join("uploads"),
            public_prefix: "/uploads/retailers".to_string(),
        })
        .unwrap();

        // export_base points nowhere; NoIdentifier must surface without
        // the resolver ever building a request.
        let config = DriveConfig {
            marker: "drive.google.com".to_string(),
            export_base: "http://127.0.0.1:1/uc".to_string(),
            timeout_secs: 1,
        };

        let err = download_image(&config, &storage, "https://drive.google.com/drive/home")
            .await
            .unwrap_err();
        assert!(matches!(err, DriveError::NoIdentifier));
    }

    #[tokio::test]
    async fn successful_fetch_stores_bytes_under_the_file_id() {
        let tmp = TempDir::new().unwrap();
        let storage = PhotoStorage::open(&StorageConfig {
            root: tmp.path().join("uploads"),
            public_prefix: "/uploads/retailers".to_string(),
        })
        .unwrap();

        // Stand-in export endpoint on a local port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().route(
            "/uc",
            axum::routing::get(|| async { "jpeg bytes".to_string() }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = DriveConfig {
            marker: "drive.google.com".to_string(),
            export_base: format!("http://{}/uc", addr),
            timeout_secs: 5,
        };

        let path = download_image(
            &config,
            &storage,
            "https://drive.google.com/file/d/XYZ123/view",
        )
        .await
        .unwrap();

        assert!(path.starts_with("/uploads/retailers/"));
        assert!(path.contains("XYZ123"));
        assert!(path.ends_with(".jpg"));

        let stored_name = path.rsplit('/').next().unwrap();
        assert_eq!(
            std::fs::read(storage.root().join(stored_name)).unwrap(),
            b"jpeg bytes"
        );
    }

    #[tokio::test]
    async fn unreachable_export_host_is_a_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let storage = PhotoStorage::open(&StorageConfig {
            root: tmp.path().join("uploads"),
            public_prefix: "/uploads/retailers".to_string(),
        })
        .unwrap();

        let config = DriveConfig {
            marker: "drive.google.com".to_string(),
            export_base: "http://127.0.0.1:1/uc".to_string(),
            timeout_secs: 1,
        };

        let err = download_image(
            &config,
            &storage,
            "https://drive.google.com/file/d/XYZ123/view",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DriveError::Fetch(_)));
    }
}

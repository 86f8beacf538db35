//! Photo reference resolution.
//!
//! Turning a record's raw `shop_photo` value into a storable reference is
//! a two-step affair: a pure decision over the batch's uploaded files
//! (which photo source wins), then an executor that carries out the one
//! branch with I/O. The precedence — local upload beats Drive link beats
//! generic passthrough — is a hard invariant: reordering it changes which
//! photo wins when a reference happens to coincide with an uploaded
//! filename.

use crate::config::DriveConfig;
use crate::drive;
use crate::models::{PhotoResolution, UploadedFile};
use crate::storage::PhotoStorage;

/// Which photo source a record's reference points at. Produced by
/// [`decide`] without touching disk or network.
#[derive(Debug, PartialEq, Eq)]
pub enum PhotoDecision<'a> {
    /// Blank reference; nothing to resolve.
    Empty,
    /// Exact match against an uploaded file's original name.
    Local(&'a UploadedFile),
    /// Reference contains the Drive marker; a fetch is required.
    Remote(&'a str),
    /// Any other non-empty reference, kept verbatim.
    Passthrough(&'a str),
}

/// The single deterministic transition from a raw reference to a photo
/// source, evaluated in precedence order.
///
/// Upload matching is exact and case-sensitive, first match wins in
/// arrival order, and it is attempted before Drive recognition even when
/// the reference looks like a URL.
pub fn decide<'a>(
    shop_photo: Option<&'a str>,
    uploads: &'a [UploadedFile],
    marker: &str,
) -> PhotoDecision<'a> {
    let reference = match shop_photo {
        Some(s) if !s.trim().is_empty() => s,
        _ => return PhotoDecision::Empty,
    };

    if let Some(file) = uploads.iter().find(|f| f.original_name == reference) {
        return PhotoDecision::Local(file);
    }

    if reference.contains(marker) {
        return PhotoDecision::Remote(reference);
    }

    PhotoDecision::Passthrough(reference)
}

/// Resolve one record's photo reference, executing the remote branch.
///
/// A failed Drive resolution — no extractable id or a failed fetch —
/// degrades to [`PhotoResolution::RemoteFallback`] carrying the original
/// reference unchanged. The failure is logged, never propagated: photo
/// degradation is row-scoped and must not affect the import.
pub async fn resolve_photo(
    shop_photo: Option<&str>,
    uploads: &[UploadedFile],
    drive_config: &DriveConfig,
    storage: &PhotoStorage,
) -> PhotoResolution {
    match decide(shop_photo, uploads, &drive_config.marker) {
        PhotoDecision::Empty => PhotoResolution::None,
        PhotoDecision::Local(file) => PhotoResolution::LocalMatch(file.stored_path.clone()),
        PhotoDecision::Remote(url) => {
            match drive::download_image(drive_config, storage, url).await {
                Ok(stored) => PhotoResolution::RemoteFetched(stored),
                Err(e) => {
                    tracing::warn!(url, error = %e, "drive resolution failed, keeping link");
                    PhotoResolution::RemoteFallback(url.to_string())
                }
            }
        }
        PhotoDecision::Passthrough(url) => PhotoResolution::PassthroughUrl(url.to_string()),
    }
}

//! Core data models used throughout the intake pipeline.
//!
//! These types represent the retailer records, uploaded files, and
//! per-batch outcomes that flow from payload normalization through photo
//! resolution to the persistence writer.

use serde::Serialize;

/// One row of an inbound batch, as produced by the spreadsheet export.
///
/// Every field arrives as free text (or not at all). Only
/// `distributor_name` and `shop_name` are required for a row to be
/// importable; everything else defaults to an empty representation at
/// write time.
#[derive(Debug, Clone, Default)]
pub struct RetailerRecord {
    pub distributor_name: Option<String>,
    pub location: Option<String>,
    pub salesman_name: Option<String>,
    pub shop_name: Option<String>,
    pub shop_address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_mobile: Option<String>,
    pub shop_age: Option<String>,
    pub shop_photo: Option<String>,
    pub google_map_link: Option<String>,
    pub timestamp: Option<String>,
}

impl RetailerRecord {
    /// Structural validation: a row is importable only when both identity
    /// fields are non-blank after trimming. No other field is validated.
    pub fn is_importable(&self) -> bool {
        !is_blank(&self.distributor_name) && !is_blank(&self.shop_name)
    }
}

fn is_blank(field: &Option<String>) -> bool {
    match field {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

/// A batch-scoped uploaded binary, already written to the photo storage
/// area by the transport layer before the pipeline runs.
///
/// The pipeline only ever consults the (original name → stored path)
/// mapping; it never re-reads the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side filename, as declared in the multipart part (or the
    /// file's basename for CLI staging).
    pub original_name: String,
    /// Public relative path under the storage prefix, with a
    /// collision-resistant server-assigned name.
    pub stored_path: String,
}

/// Tagged outcome of resolving one record's `shop_photo` reference.
///
/// Computed once per record during import and consumed immediately by the
/// persistence writer; never cached across records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoResolution {
    /// An uploaded file whose original name equals `shop_photo`.
    LocalMatch(String),
    /// Bytes downloaded from a Drive link and persisted locally.
    RemoteFetched(String),
    /// Drive link recognized but resolution failed; the original URL is
    /// retained. Losing the link is worse than an unresolved copy.
    RemoteFallback(String),
    /// Any other non-empty reference, stored verbatim.
    PassthroughUrl(String),
    /// `shop_photo` was blank; no photo reference is recorded.
    None,
}

impl PhotoResolution {
    /// The reference string to persist, or `None` for a NULL column.
    pub fn stored_ref(&self) -> Option<&str> {
        match self {
            PhotoResolution::LocalMatch(p)
            | PhotoResolution::RemoteFetched(p)
            | PhotoResolution::RemoteFallback(p)
            | PhotoResolution::PassthroughUrl(p) => Some(p),
            PhotoResolution::None => None,
        }
    }

    /// Stable name for the resolution kind, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PhotoResolution::LocalMatch(_) => "local",
            PhotoResolution::RemoteFetched(_) => "fetched",
            PhotoResolution::RemoteFallback(_) => "fallback",
            PhotoResolution::PassthroughUrl(_) => "url",
            PhotoResolution::None => "none",
        }
    }
}

/// A row-scoped persistence failure, recorded without aborting the batch.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// Zero-based index of the row in the inbound batch.
    pub row: usize,
    pub message: String,
}

/// Per-batch accumulator returned to the caller.
///
/// Counts are truthful and always returned together: a batch with skipped
/// or errored rows never reports as a clean success.
#[derive(Debug, Default, Serialize)]
pub struct ImportOutcome {
    pub imported: u64,
    pub skipped: u64,
    pub errors: Vec<RowError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(distributor: Option<&str>, shop: Option<&str>) -> RetailerRecord {
        RetailerRecord {
            distributor_name: distributor.map(String::from),
            shop_name: shop.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn importable_requires_both_identity_fields() {
        assert!(record(Some("Acme"), Some("Acme Store")).is_importable());
        assert!(!record(None, Some("Acme Store")).is_importable());
        assert!(!record(Some("Acme"), None).is_importable());
        assert!(!record(None, None).is_importable());
    }

    #[test]
    fn whitespace_only_fields_are_blank() {
        assert!(!record(Some("   "), Some("Acme Store")).is_importable());
        assert!(!record(Some("Acme"), Some("\t\n")).is_importable());
    }

    #[test]
    fn other_fields_are_not_validated() {
        let mut r = record(Some("Acme"), Some("Acme Store"));
        r.contact_mobile = Some("not-a-number".to_string());
        r.shop_age = None;
        assert!(r.is_importable());
    }

    #[test]
    fn stored_ref_is_null_only_when_empty() {
        assert_eq!(
            PhotoResolution::LocalMatch("/uploads/retailers/a.jpg".into()).stored_ref(),
            Some("/uploads/retailers/a.jpg")
        );
        assert_eq!(
            PhotoResolution::RemoteFallback("https://drive.google.com/d/x".into()).stored_ref(),
            Some("https://drive.google.com/d/x")
        );
        assert_eq!(PhotoResolution::None.stored_ref(), None);
    }
}

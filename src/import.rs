//! Batch import orchestration.
//!
//! Drives the per-record pipeline over one inbound batch: validate →
//! resolve photo → write, accumulating an [`ImportOutcome`]. Rows are
//! processed sequentially in arrival order and each row's outcome is
//! independent of every other's; only a payload that fails to normalize
//! aborts the batch, and that happens before any row is written.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

use crate::config::{Config, DriveConfig};
use crate::db;
use crate::models::{ImportOutcome, RetailerRecord, RowError, UploadedFile};
use crate::payload;
use crate::resolve;
use crate::storage::PhotoStorage;
use crate::writer;

/// Run one batch through the pipeline.
///
/// Skipped rows (failed validation) and errored rows (failed insert) are
/// counted and the remaining rows continue; the returned outcome always
/// carries all three tallies together.
pub async fn run_import(
    pool: &SqlitePool,
    storage: &PhotoStorage,
    drive_config: &DriveConfig,
    records: Vec<RetailerRecord>,
    uploads: &[UploadedFile],
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for (row, record) in records.iter().enumerate() {
        if !record.is_importable() {
            outcome.skipped += 1;
            continue;
        }

        let resolution = resolve::resolve_photo(
            record.shop_photo.as_deref(),
            uploads,
            drive_config,
            storage,
        )
        .await;

        match writer::insert_retailer(pool, record, &resolution).await {
            Ok(()) => outcome.imported += 1,
            Err(e) => {
                tracing::warn!(row, error = %e, "row insert failed, continuing batch");
                outcome.errors.push(RowError {
                    row,
                    message: e.to_string(),
                });
            }
        }
    }

    outcome
}

/// CLI entry: import a batch from a JSON payload file, staging an
/// optional photos directory as the batch's uploads.
pub async fn run_import_file(
    config: &Config,
    data_path: &Path,
    photos_dir: Option<&Path>,
) -> Result<()> {
    let raw = std::fs::read_to_string(data_path)?;
    let records = payload::parse_batch_str(&raw)?;

    let pool = db::connect(&config.db.path).await?;
    let storage = PhotoStorage::open(&config.storage)?;

    let uploads = match photos_dir {
        Some(dir) => storage.stage_photos_dir(dir)?,
        None => Vec::new(),
    };

    let total = records.len();
    let outcome = run_import(&pool, &storage, &config.drive, records, &uploads).await;

    println!("import {}", data_path.display());
    println!("  rows: {}", total);
    println!("  staged uploads: {}", uploads.len());
    println!("  imported: {}", outcome.imported);
    println!("  skipped: {}", outcome.skipped);
    println!("  errors: {}", outcome.errors.len());
    for err in &outcome.errors {
        println!("    row {}: {}", err.row, err.message);
    }
    println!("ok");

    pool.close().await;
    Ok(())
}

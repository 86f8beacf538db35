//! Persistence writer.
//!
//! Writes one fully-resolved record per call. Rows are deliberately
//! independent: there is no transaction spanning a batch, and a failed
//! insert must stay confined to its row. That independence is an
//! invariant the orchestrator relies on, not an accident of this
//! implementation.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::models::{PhotoResolution, RetailerRecord};

/// Insert one resolved record into the retailer store.
///
/// Optional fields are bound as empty strings (the photo reference as
/// NULL when absent) so the persisted shape is consistent per field. A
/// missing inbound timestamp defaults to the instant of the write.
pub async fn insert_retailer(
    pool: &SqlitePool,
    record: &RetailerRecord,
    photo: &PhotoResolution,
) -> Result<()> {
    let timestamp = match record.timestamp.as_deref() {
        Some(ts) if !ts.trim().is_empty() => ts.to_string(),
        _ => chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO retailers
        (timestamp, distributor_name, location, salesman_name, shop_name, shop_address, contact_person, contact_mobile, shop_age, shop_photo, google_map_link)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(timestamp)
    .bind(opt(&record.distributor_name))
    .bind(opt(&record.location))
    .bind(opt(&record.salesman_name))
    .bind(opt(&record.shop_name))
    .bind(opt(&record.shop_address))
    .bind(opt(&record.contact_person))
    .bind(opt(&record.contact_mobile))
    .bind(opt(&record.shop_age))
    .bind(photo.stored_ref())
    .bind(opt(&record.google_map_link))
    .execute(pool)
    .await?;

    Ok(())
}

fn opt(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

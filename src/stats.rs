//! Store statistics and health overview.
//!
//! Gives a quick summary of what has been imported: row counts and a
//! breakdown of where photo evidence ended up (stored locally, kept as an
//! external link, or absent). Used by `rintake stats` to confirm that
//! imports and photo resolution are behaving as expected.

use anyhow::Result;

use crate::config::Config;
use crate::db;

/// Run the stats command: query the store and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM retailers")
        .fetch_one(&pool)
        .await?;

    let prefix_pattern = format!("{}/%", config.storage.public_prefix.trim_end_matches('/'));

    let stored_locally: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM retailers WHERE shop_photo LIKE ?")
            .bind(&prefix_pattern)
            .fetch_one(&pool)
            .await?;

    let external_links: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM retailers WHERE shop_photo IS NOT NULL AND shop_photo NOT LIKE ?",
    )
    .bind(&prefix_pattern)
    .fetch_one(&pool)
    .await?;

    let no_photo: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM retailers WHERE shop_photo IS NULL")
        .fetch_one(&pool)
        .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Retail Intake — Store Stats");
    println!("===========================");
    println!();
    println!("  Database:   {}", config.db.path.display());
    println!("  Size:       {}", format_bytes(db_size));
    println!();
    println!("  Retailers:  {}", total);
    println!();
    println!("  By photo reference:");
    println!("  {:<18} {:>6}", "KIND", "ROWS");
    println!("  {}", "-".repeat(26));
    println!("  {:<18} {:>6}", "stored locally", stored_locally);
    println!("  {:<18} {:>6}", "external link", external_links);
    println!("  {:<18} {:>6}", "no photo", no_photo);
    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

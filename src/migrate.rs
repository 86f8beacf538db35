use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db.path).await?;

    // Create retailers table. shop_age stays TEXT: the value comes
    // straight from a spreadsheet cell and is not coerced. shop_photo is
    // the only nullable column; every other optional field is stored as
    // an empty string.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS retailers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            distributor_name TEXT NOT NULL,
            location TEXT NOT NULL DEFAULT '',
            salesman_name TEXT NOT NULL DEFAULT '',
            shop_name TEXT NOT NULL,
            shop_address TEXT NOT NULL DEFAULT '',
            contact_person TEXT NOT NULL DEFAULT '',
            contact_mobile TEXT NOT NULL DEFAULT '',
            shop_age TEXT NOT NULL DEFAULT '',
            shop_photo TEXT,
            google_map_link TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::error::LedgerError;

pub async fn db_connection(database_url: &str) -> Result<SqlitePool, LedgerError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection, so keep exactly one.
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePool::connect_with(options).await?
    };
    info!("Connected to SQLite database at {database_url}");

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), LedgerError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parcels (
            tracking_number TEXT PRIMARY KEY,
            sender TEXT NOT NULL,
            sender_phone TEXT NOT NULL DEFAULT '',
            recipient TEXT NOT NULL,
            recipient_phone TEXT NOT NULL DEFAULT '',
            package_type TEXT NOT NULL DEFAULT '',
            pickup_location TEXT NOT NULL DEFAULT '',
            delivery_location TEXT NOT NULL DEFAULT '',
            origin TEXT NOT NULL,
            destination TEXT NOT NULL,
            weight_kg REAL NOT NULL,
            size TEXT NOT NULL,
            priority TEXT NOT NULL,
            insured INTEGER NOT NULL,
            cost_units INTEGER NOT NULL,
            eta_label TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parcel_status_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tracking_number TEXT NOT NULL REFERENCES parcels(tracking_number),
            status TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            location TEXT NOT NULL,
            description TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_parcels_sender ON parcels (sender, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

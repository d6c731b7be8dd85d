pub mod appointment_storage;
pub mod catalog_storage;
pub mod review_storage;
mod user_storage;

use std::{fs, path::Path, str::FromStr, time::Duration};

pub use sqlx;
use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::StorageError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens (creating if needed) the database at `url` and applies migrations.
pub async fn connect(url: &str) -> Result<SqlitePool, StorageError> {
    ensure_sqlite_dir(url).map_err(|e| StorageError::Sqlx(sqlx::Error::Io(e)))?;

    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    log::info!("Database ready. [url = {url}]");

    Ok(pool)
}

/// Private in-memory database on a single, never-recycled connection.
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

fn ensure_sqlite_dir(url: &str) -> std::io::Result<()> {
    let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_utils {
    use salon_models::chrono::NaiveDate;
    use sqlx::SqlitePool;

    use super::{catalog_storage::SqliteServiceStorage, connect_in_memory};
    use crate::{ServiceInput, ServiceStorage};

    pub async fn pool() -> SqlitePool {
        connect_in_memory().await.unwrap()
    }

    pub async fn haircut(pool: &SqlitePool) -> i64 {
        SqliteServiceStorage::new(pool.clone())
            .create(ServiceInput {
                name: "Haircut".to_owned(),
                description: "Cut and style".to_owned(),
                price: 800.0,
                duration: 60,
                image_url: None,
                is_active: true,
            })
            .await
            .unwrap()
            .id
    }

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }
}

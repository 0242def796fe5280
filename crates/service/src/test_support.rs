#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use models::db::{connect_with_config, ensure_schema};

// Ensure the schema is created only once across the entire test process
static SCHEMA: OnceCell<bool> = OnceCell::const_new();

fn test_db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::load_default()
        .map(|c| c.database)
        .unwrap_or_default();
    cfg.normalize_from_env();
    if cfg.url.trim().is_empty() {
        cfg.url = models::db::DATABASE_URL.clone();
    }
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout_secs = 5;
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// A fresh connection for the current test's runtime, or `None` when
/// `SKIP_DB_TESTS` is set or no database is reachable.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let cfg = test_db_config();

    // Run the schema bootstrap exactly once, with a throwaway connection
    let ready = *SCHEMA
        .get_or_init(|| async {
            match connect_with_config(&cfg).await {
                Ok(db) => match ensure_schema(&db).await {
                    Ok(()) => true,
                    Err(e) => { eprintln!("skip: schema bootstrap failed: {e}"); false }
                },
                Err(e) => { eprintln!("skip: cannot connect to db: {e}"); false }
            }
        })
        .await;
    if !ready {
        return Ok(None);
    }

    let db = connect_with_config(&cfg).await?;
    Ok(Some(db))
}

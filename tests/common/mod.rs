use questions::{Config, Database};
use tempfile::TempDir;

pub const SCHEMA: &str = include_str!("../fixtures/schema.sql");

/// File-backed database with the fixture schema applied.
pub async fn setup_test_db() -> (Database, TempDir) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("questions.db")
        .to_string_lossy()
        .to_string();
    let config = Config {
        database_path: db_path,
        ..Config::default()
    };

    let db = Database::connect(&config).await.expect("connect failed");
    db.execute_batch(SCHEMA).await.expect("apply schema");
    (db, temp_dir)
}

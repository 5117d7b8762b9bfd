//! Acquisition through the SQL backend against SQLite databases

mod common;

use anyhow::Result;
use campus_insights::config::DatabaseConfig;
use campus_insights::error::ErrorCode;
use campus_insights::model::Field;
use campus_insights::session::Session;
use campus_insights::storage::{load_data, SqlDialect, SqlStore, StoreError, StudentStore};
use campus_insights::views::{View, ViewSettings};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use tempfile::TempDir;

async fn seed(path: &Path) -> Result<()> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await?;

    sqlx::query(
        "CREATE TABLE student_list (
            stu_id INTEGER PRIMARY KEY,
            names TEXT,
            school_eng TEXT,
            fac_eng TEXT,
            ste_reg TEXT
        )",
    )
    .execute(&pool)
    .await?;

    for record in common::sample_records() {
        sqlx::query("INSERT INTO student_list VALUES (?, ?, ?, ?, ?)")
            .bind(record.student_id.parse::<i64>()?)
            .bind(record.province)
            .bind(record.school)
            .bind(record.faculty)
            .bind(record.registered_at)
            .execute(&pool)
            .await?;
    }

    pool.close().await;
    Ok(())
}

fn config_for(path: &Path) -> DatabaseConfig {
    DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        ..DatabaseConfig::default()
    }
}

#[tokio::test]
async fn test_load_students_from_sqlite() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("campus.db");
    seed(&path).await?;

    let store = SqlStore::connect(&config_for(&path)).await?;
    assert_eq!(store.dialect(), SqlDialect::Sqlite);
    assert!(store.describe().ends_with("(student_list)"));

    let table = load_data(&store).await?;
    assert_eq!(table.len(), 10);

    let first = &table.records()[0];
    assert_eq!(first.student_id, "6401");
    assert_eq!(first.text(Field::Province), Some("Songkhla"));
    assert_eq!(first.text(Field::RegisteredAt), Some("2021-05-10 09:12:00"));

    let nulls: Vec<&str> = table
        .iter()
        .filter(|r| r.school.is_none())
        .map(|r| r.student_id.as_str())
        .collect();
    assert_eq!(nulls, vec!["6403", "6407"]);
    Ok(())
}

#[tokio::test]
async fn test_session_over_sqlite() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("campus.db");
    seed(&path).await?;

    let store = SqlStore::connect(&config_for(&path)).await?;
    let session = Session::open(&store, ViewSettings::default()).await?;
    let page = session.page(View::FacultySummary).await?;
    assert_eq!(page.chart(0).map(|c| c.table.total()), Some(10));
    Ok(())
}

#[tokio::test]
async fn test_missing_table_is_a_schema_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("campus.db");
    seed(&path).await?;

    let config = DatabaseConfig {
        table: "enrollments".to_string(),
        ..config_for(&path)
    };
    let store = SqlStore::connect(&config).await?;
    let err = store.load_students().await.unwrap_err();
    assert!(err.is_schema(), "unexpected error: {err}");

    let err = load_data(&store).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::STORAGE_SCHEMA);
    assert_eq!(err.exit_code(), 3);
    Ok(())
}

#[tokio::test]
async fn test_renamed_column_is_a_schema_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("campus.db");
    seed(&path).await?;

    let mut config = config_for(&path);
    config.columns.faculty = "faculty_name".to_string();
    let store = SqlStore::connect(&config).await?;
    let err = store.load_students().await.unwrap_err();
    assert!(err.is_schema(), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn test_unreachable_database_is_a_connection_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("missing").join("campus.db");

    let err = SqlStore::connect(&config_for(&path)).await.err().unwrap();
    assert!(err.is_connection(), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn test_table_name_must_be_identifier() {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        table: "students; DROP TABLE students".to_string(),
        ..DatabaseConfig::default()
    };
    let err = SqlStore::connect(&config).await.err().unwrap();
    assert!(matches!(err, StoreError::Configuration(_)));
}

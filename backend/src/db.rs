use crate::models::{Character, NewCharacter};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id TEXT PRIMARY KEY NOT NULL,
            pinyin TEXT NOT NULL,
            meaning TEXT NOT NULL,
            hint TEXT,
            character_image TEXT,
            mnemonic_image TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_characters_created_at ON characters(created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// All characters, newest first. Rows sharing a timestamp fall back to
/// insertion order.
pub async fn list_characters(pool: &SqlitePool) -> Result<Vec<Character>, sqlx::Error> {
    sqlx::query_as::<_, Character>(
        r#"
        SELECT id, pinyin, meaning, hint, character_image, mnemonic_image, created_at
        FROM characters
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_character(
    pool: &SqlitePool,
    new: &NewCharacter,
) -> Result<Character, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    // Fixed-width RFC 3339 so text ordering matches time ordering.
    let created_at = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string();

    sqlx::query_as::<_, Character>(
        r#"
        INSERT INTO characters (
            id, pinyin, meaning, hint, character_image, mnemonic_image, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, pinyin, meaning, hint, character_image, mnemonic_image, created_at
        "#,
    )
    .bind(&id)
    .bind(&new.pinyin)
    .bind(&new.meaning)
    .bind(&new.hint)
    .bind(&new.character_image)
    .bind(&new.mnemonic_image)
    .bind(&created_at)
    .fetch_one(pool)
    .await
}

/// Returns the number of rows removed; zero is not an error.
pub async fn delete_character(pool: &SqlitePool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM characters WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // A single long-lived connection keeps the in-memory database alive.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

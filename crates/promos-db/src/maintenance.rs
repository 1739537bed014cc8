//! Whole-table operations: clearing all data and rebuilding the schema.

use sqlx::SqlitePool;

use crate::{DbError, MIGRATOR};

/// Deletes every row from `promotion` and `product`.
///
/// Promotions go first so the foreign key from `promotion.product_id` is
/// never violated. Both deletes share one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either delete or the commit fails.
pub async fn clear_all(pool: &SqlitePool) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    let promotions = sqlx::query("DELETE FROM promotion")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let products = sqlx::query("DELETE FROM product")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;

    tracing::info!(products, promotions, "cleared product and promotion tables");
    Ok(())
}

/// Drops both tables and recreates them from the embedded migrations.
///
/// The migration history is wiped along with the tables so every migration
/// runs again.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a drop fails or [`DbError::Migration`] if the
/// migrations cannot be re-applied.
pub async fn rebuild_schema(pool: &SqlitePool) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DROP TABLE IF EXISTS promotion")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS product")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    MIGRATOR.run(pool).await?;
    tracing::info!("rebuilt product and promotion tables");
    Ok(())
}

//! Database operations for the `promotion` table.

use chrono::NaiveDate;
use promos_core::PromotionRecord;
use sqlx::{SqliteConnection, SqlitePool};

use crate::products::{get_product, insert_product, NewProduct};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A promotion joined with the product it applies to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromotionWithProductRow {
    pub id: i64,
    pub discount: f64,
    pub shipping_discount: f64,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub product_id: i64,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_price: f64,
    pub product_currency: String,
}

#[derive(Debug, Clone)]
pub struct NewPromotion {
    pub product_id: i64,
    pub discount: f64,
    pub shipping_discount: f64,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

/// What [`persist_record`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
    pub promotion_id: i64,
    /// `false` when an existing product row was reused.
    pub product_created: bool,
}

// ---------------------------------------------------------------------------
// promotion operations
// ---------------------------------------------------------------------------

/// Inserts a promotion and returns its auto-assigned id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (e.g. the product does not
/// exist).
pub async fn insert_promotion(
    conn: &mut SqliteConnection,
    promotion: &NewPromotion,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO promotion \
             (discount, shipping_discount, valid_from, valid_until, product_id) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(promotion.discount)
    .bind(promotion.shipping_discount)
    .bind(promotion.valid_from)
    .bind(promotion.valid_until)
    .bind(promotion.product_id)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Writes one ingested record in its own transaction.
///
/// The product is looked up by id and only inserted when absent; an existing
/// row is never modified. A new promotion is always inserted. When the record
/// has no `valid_from`, `default_valid_from` is stored instead.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails; the
/// transaction is rolled back on drop.
pub async fn persist_record(
    pool: &SqlitePool,
    record: &PromotionRecord,
    default_valid_from: NaiveDate,
) -> Result<PersistOutcome, DbError> {
    let mut tx = pool.begin().await?;

    let product_created = if get_product(&mut *tx, record.product_id).await?.is_some() {
        false
    } else {
        insert_product(
            &mut *tx,
            &NewProduct {
                id: record.product_id,
                name: &record.product_name,
                description: &record.product_description,
                price: record.price,
                currency: &record.currency,
            },
        )
        .await?;
        true
    };

    let promotion_id = insert_promotion(
        &mut *tx,
        &NewPromotion {
            product_id: record.product_id,
            discount: record.discount,
            shipping_discount: record.shipping_discount,
            valid_from: record.valid_from.or(Some(default_valid_from)),
            valid_until: record.valid_until,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(PersistOutcome {
        promotion_id,
        product_created,
    })
}

const PROMOTION_WITH_PRODUCT_SELECT: &str =
    "SELECT pr.id, pr.discount, pr.shipping_discount, pr.valid_from, pr.valid_until, \
            pr.product_id, p.name AS product_name, p.description AS product_description, \
            p.price AS product_price, p.currency AS product_currency \
     FROM promotion pr \
     JOIN product p ON p.id = pr.product_id";

/// Returns every promotion with its product, ordered by promotion id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_promotions(pool: &SqlitePool) -> Result<Vec<PromotionWithProductRow>, DbError> {
    let sql = format!("{PROMOTION_WITH_PRODUCT_SELECT} ORDER BY pr.id");
    let rows = sqlx::query_as::<_, PromotionWithProductRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Returns the number of rows in `promotion`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_promotions(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM promotion")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

//! Database operations for the `product` table.

use sqlx::{SqliteConnection, SqlitePool};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `product` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    /// Nullable in the schema; ingestion always writes at least `''`.
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
}

/// A product with the number of promotions attached to it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductSummaryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub promotion_count: i64,
}

/// Values for a product that does not exist yet.
///
/// The id is caller-assigned; it comes from the source file.
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    pub id: i64,
    pub name: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub currency: &'a str,
}

// ---------------------------------------------------------------------------
// product operations
// ---------------------------------------------------------------------------

/// Looks up a product by its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, description, price, currency FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Inserts a new product row and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including when a product
/// with the same id already exists.
pub async fn insert_product(
    conn: &mut SqliteConnection,
    product: &NewProduct<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product (id, name, description, price, currency) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(product.id)
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.currency)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Returns every product with its promotion count, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<ProductSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductSummaryRow>(
        "SELECT p.id, p.name, p.description, p.price, p.currency, \
                COUNT(pr.id) AS promotion_count \
         FROM product p \
         LEFT JOIN promotion pr ON pr.product_id = p.id \
         GROUP BY p.id, p.name, p.description, p.price, p.currency \
         ORDER BY p.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the number of rows in `product`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn insert_then_get_product(pool: SqlitePool) {
        let mut conn = pool.acquire().await.expect("acquire");
        let id = insert_product(
            &mut conn,
            &NewProduct {
                id: 123,
                name: "Teacup",
                description: "A teacup",
                price: 15.0,
                currency: "USD",
            },
        )
        .await
        .expect("insert product");
        assert_eq!(id, 123);

        let row = get_product(&mut conn, 123)
            .await
            .expect("get product")
            .expect("product exists");
        assert_eq!(row.name, "Teacup");
        assert_eq!(row.description.as_deref(), Some("A teacup"));
        assert_eq!(row.currency, "USD");
        assert!(get_product(&mut conn, 999).await.expect("get").is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn insert_product_rejects_duplicate_id(pool: SqlitePool) {
        let mut conn = pool.acquire().await.expect("acquire");
        let product = NewProduct {
            id: 5,
            name: "Chair",
            description: "",
            price: 20.0,
            currency: "USD",
        };
        insert_product(&mut conn, &product).await.expect("first insert");
        assert!(insert_product(&mut conn, &product).await.is_err());
        drop(conn);
        assert_eq!(count_products(&pool).await.expect("count"), 1);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_products_counts_promotions(pool: SqlitePool) {
        sqlx::query(
            "INSERT INTO product (id, name, price) VALUES (1, 'Lamp', 30.0), (2, 'Desk', 120.0)",
        )
        .execute(&pool)
        .await
        .expect("seed products");
        sqlx::query(
            "INSERT INTO promotion (discount, shipping_discount, product_id) \
             VALUES (10.0, 0.0, 1), (5.0, 0.0, 1)",
        )
        .execute(&pool)
        .await
        .expect("seed promotions");

        let rows = list_products(&pool).await.expect("list products");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].promotion_count, 2);
        assert_eq!(rows[0].currency, "USD", "schema default currency");
        assert_eq!(rows[1].promotion_count, 0);
    }
}

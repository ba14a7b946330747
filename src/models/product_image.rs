use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl ProductImage {
    pub async fn create(
        pool: &SqlitePool,
        product_id: i64,
        url: &str,
    ) -> Result<ProductImage, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, ProductImage>(
            r#"
            INSERT INTO product_images (product_id, url, create_date, modify_date)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(url)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_product(
        pool: &SqlitePool,
        product_id: i64,
    ) -> Result<Vec<ProductImage>, sqlx::Error> {
        sqlx::query_as::<_, ProductImage>(
            "SELECT * FROM product_images WHERE product_id = ? ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// Scoped to the owning product so an image id from another product is absent.
    pub async fn find_in_product(
        pool: &SqlitePool,
        product_id: i64,
        id: i64,
    ) -> Result<Option<ProductImage>, sqlx::Error> {
        sqlx::query_as::<_, ProductImage>(
            "SELECT * FROM product_images WHERE product_id = ? AND id = ?",
        )
        .bind(product_id)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_url(pool: &SqlitePool, id: i64, url: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE product_images SET url = ?, modify_date = ? WHERE id = ?")
            .bind(url)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM product_images WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

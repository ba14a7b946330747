use chrono::Utc;
use sqlx::{FromRow, SqlitePool};

/// Wish-list row joined with the product fields shown to the client.
#[derive(Debug, Clone, FromRow)]
pub struct WishListEntry {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub product_name: String,
    pub product_price: i64,
    pub product_image_url: Option<String>,
}

const SELECT_ENTRY: &str = r#"
    SELECT w.id, w.user_id, w.product_id, w.quantity,
        p.name AS product_name, p.price AS product_price,
        (SELECT url FROM product_images i WHERE i.product_id = p.id ORDER BY i.id LIMIT 1) AS product_image_url
    FROM wish_lists w
    JOIN products p ON p.id = w.product_id
"#;

impl WishListEntry {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        product_id: i64,
    ) -> Result<WishListEntry, sqlx::Error> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO wish_lists (user_id, product_id, quantity, create_date, modify_date)
            VALUES (?, ?, 1, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find(pool, user_id, product_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find(
        pool: &SqlitePool,
        user_id: i64,
        product_id: i64,
    ) -> Result<Option<WishListEntry>, sqlx::Error> {
        sqlx::query_as::<_, WishListEntry>(&format!(
            "{SELECT_ENTRY} WHERE w.user_id = ? AND w.product_id = ?"
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn exists(pool: &SqlitePool, user_id: i64, product_id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM wish_lists WHERE user_id = ? AND product_id = ?)",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<WishListEntry>, sqlx::Error> {
        sqlx::query_as::<_, WishListEntry>(&format!(
            "{SELECT_ENTRY} WHERE w.user_id = ? ORDER BY w.id"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM wish_lists WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

/// Product row joined with the url of its first image, if any.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub stock: i64,
    pub image_url: Option<String>,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

pub struct ProductFields<'a> {
    pub name: &'a str,
    pub price: i64,
    pub description: &'a str,
    pub stock: i64,
}

const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.name, p.price, p.description, p.stock, p.create_date, p.modify_date,
        (SELECT url FROM product_images i WHERE i.product_id = p.id ORDER BY i.id LIMIT 1) AS image_url
    FROM products p
"#;

impl Product {
    pub async fn create(pool: &SqlitePool, fields: ProductFields<'_>) -> Result<Product, sqlx::Error> {
        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, price, description, stock, create_date, modify_date)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(fields.name)
        .bind(fields.price)
        .bind(fields.description)
        .bind(fields.stock)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY p.id DESC"))
            .fetch_all(pool)
            .await
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        fields: ProductFields<'_>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, description = ?, stock = ?, modify_date = ?
            WHERE id = ?
            "#,
        )
        .bind(fields.name)
        .bind(fields.price)
        .bind(fields.description)
        .bind(fields.stock)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: i64,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

pub struct OrderItemFields {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: i64,
}

impl OrderItemFields {
    /// `None` when quantity times unit price does not fit in an `i64`.
    pub fn total_price(&self) -> Option<i64> {
        self.quantity.checked_mul(self.unit_price)
    }
}

impl OrderItem {
    pub async fn create(
        pool: &SqlitePool,
        order_id: i64,
        fields: OrderItemFields,
        total_price: i64,
    ) -> Result<OrderItem, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items
                (order_id, product_id, quantity, unit_price, total_price, create_date, modify_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(fields.product_id)
        .bind(fields.quantity)
        .bind(fields.unit_price)
        .bind(total_price)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<OrderItem>, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<OrderItem>, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ? ORDER BY id")
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_product(
        pool: &SqlitePool,
        product_id: i64,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE product_id = ? ORDER BY id")
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        fields: OrderItemFields,
        total_price: i64,
    ) -> Result<OrderItem, sqlx::Error> {
        sqlx::query_as::<_, OrderItem>(
            r#"
            UPDATE order_items
            SET product_id = ?, quantity = ?, unit_price = ?, total_price = ?, modify_date = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(fields.product_id)
        .bind(fields.quantity)
        .bind(fields.unit_price)
        .bind(total_price)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM order_items WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

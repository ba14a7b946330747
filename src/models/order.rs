use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub order_count: i64,
    pub total_price: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub address: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

pub struct OrderFields<'a> {
    pub order_count: i64,
    pub total_price: i64,
    pub payment_method: &'a str,
    pub payment_status: &'a str,
    pub address: &'a str,
}

impl Order {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        fields: OrderFields<'_>,
    ) -> Result<Order, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (user_id, order_count, total_price, payment_method, payment_status, address, create_date, modify_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(fields.order_count)
        .bind(fields.total_price)
        .bind(fields.payment_method)
        .bind(fields.payment_status)
        .bind(fields.address)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        fields: OrderFields<'_>,
    ) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET order_count = ?, total_price = ?, payment_method = ?, payment_status = ?,
                address = ?, modify_date = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(fields.order_count)
        .bind(fields.total_price)
        .bind(fields.payment_method)
        .bind(fields.payment_status)
        .bind(fields.address)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

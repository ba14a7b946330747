use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::models::order::{Order, OrderFields};
use crate::models::user::User;

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl Order {
    /// Orders may only be read or changed by the user who placed them.
    pub fn ensure_owned_by(&self, user_id: i64) -> AppResult<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(AppError::Forbidden("You can only access your own orders".into()))
        }
    }
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, user_id: i64, fields: OrderFields<'_>) -> AppResult<Order> {
        if User::find_by_id(&self.pool, user_id).await?.is_none() {
            return Err(AppError::not_found("User"));
        }
        let order = Order::create(&self.pool, user_id, fields).await?;
        info!(order_id = order.id, "Order created");
        Ok(order)
    }

    pub async fn get(&self, id: i64) -> AppResult<Order> {
        Order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))
    }

    pub async fn get_owned(&self, id: i64, user_id: i64) -> AppResult<Order> {
        let order = self.get(id).await?;
        order.ensure_owned_by(user_id)?;
        Ok(order)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        Ok(Order::find_all(&self.pool).await?)
    }

    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Order>> {
        Ok(Order::find_by_user(&self.pool, user_id).await?)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: i64, fields: OrderFields<'_>) -> AppResult<Order> {
        self.get(id).await?;
        Ok(Order::update(&self.pool, id, fields).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;
        Order::delete(&self.pool, id).await?;
        info!(order_id = id, "Order deleted");
        Ok(())
    }
}

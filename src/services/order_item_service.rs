use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::models::order::Order;
use crate::models::order_item::{OrderItem, OrderItemFields};
use crate::models::product::Product;

#[derive(Clone)]
pub struct OrderItemService {
    pool: SqlitePool,
}

impl OrderItemService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds a line to an order. `owner` restricts the parent order to one
    /// user; admins pass `None`.
    #[instrument(skip(self, fields))]
    pub async fn create(
        &self,
        order_id: i64,
        fields: OrderItemFields,
        owner: Option<i64>,
    ) -> AppResult<OrderItem> {
        self.parent_order(order_id, owner).await?;
        self.ensure_product(fields.product_id).await?;
        let total_price = checked_total(&fields)?;

        let item = OrderItem::create(&self.pool, order_id, fields, total_price).await?;
        info!(order_item_id = item.id, order_id, "Order item created");
        Ok(item)
    }

    pub async fn get(&self, id: i64, owner: Option<i64>) -> AppResult<OrderItem> {
        let item = OrderItem::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Order item"))?;
        self.parent_order(item.order_id, owner).await?;
        Ok(item)
    }

    pub async fn list_all(&self) -> AppResult<Vec<OrderItem>> {
        Ok(OrderItem::find_all(&self.pool).await?)
    }

    pub async fn list_by_order(&self, order_id: i64, owner: Option<i64>) -> AppResult<Vec<OrderItem>> {
        self.parent_order(order_id, owner).await?;
        Ok(OrderItem::find_by_order(&self.pool, order_id).await?)
    }

    pub async fn list_by_product(&self, product_id: i64) -> AppResult<Vec<OrderItem>> {
        Ok(OrderItem::find_by_product(&self.pool, product_id).await?)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: i64,
        fields: OrderItemFields,
        owner: Option<i64>,
    ) -> AppResult<OrderItem> {
        self.get(id, owner).await?;
        self.ensure_product(fields.product_id).await?;
        let total_price = checked_total(&fields)?;
        Ok(OrderItem::update(&self.pool, id, fields, total_price).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64, owner: Option<i64>) -> AppResult<()> {
        self.get(id, owner).await?;
        OrderItem::delete(&self.pool, id).await?;
        Ok(())
    }

    async fn parent_order(&self, order_id: i64, owner: Option<i64>) -> AppResult<Order> {
        let order = Order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;
        if let Some(user_id) = owner {
            order.ensure_owned_by(user_id)?;
        }
        Ok(order)
    }

    async fn ensure_product(&self, product_id: i64) -> AppResult<()> {
        if Product::exists(&self.pool, product_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Product"))
        }
    }
}

fn checked_total(fields: &OrderItemFields) -> AppResult<i64> {
    fields
        .total_price()
        .ok_or_else(|| AppError::BadRequest("quantity times unitPrice is too large".into()))
}

use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::models::product::Product;
use crate::models::user::User;
use crate::models::wish_list::WishListEntry;

#[derive(Clone)]
pub struct WishListService {
    pool: SqlitePool,
}

impl WishListService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<WishListEntry>> {
        Ok(WishListEntry::find_by_user(&self.pool, user_id).await?)
    }

    pub async fn contains(&self, user_id: i64, product_id: i64) -> AppResult<bool> {
        Ok(WishListEntry::exists(&self.pool, user_id, product_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn add(&self, user_id: i64, product_id: i64) -> AppResult<WishListEntry> {
        // Claims-derived principals can outlive their user row.
        if User::find_by_id(&self.pool, user_id).await?.is_none() {
            return Err(AppError::not_found("User"));
        }
        if !Product::exists(&self.pool, product_id).await? {
            return Err(AppError::not_found("Product"));
        }
        if self.contains(user_id, product_id).await? {
            return Err(AppError::Conflict("Product is already in the wish list".into()));
        }

        let entry = WishListEntry::create(&self.pool, user_id, product_id).await?;
        info!(wish_list_id = entry.id, "Wish list entry added");
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: i64, product_id: i64) -> AppResult<WishListEntry> {
        let entry = WishListEntry::find(&self.pool, user_id, product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Wish list entry"))?;
        WishListEntry::delete(&self.pool, entry.id).await?;
        Ok(entry)
    }
}

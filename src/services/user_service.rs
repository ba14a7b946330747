use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::models::user::User;

/// Administrative user management.
#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        Ok(User::find_all(&self.pool).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<User> {
        User::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Orders, their items and wish-list rows go with the user.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !User::delete(&self.pool, id).await? {
            return Err(AppError::not_found("User"));
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::models::product::{Product, ProductFields};
use crate::models::product_image::ProductImage;

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        Ok(Product::find_all(&self.pool).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        Product::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))
    }

    #[instrument(skip(self, fields), fields(name = %fields.name))]
    pub async fn create(&self, fields: ProductFields<'_>) -> AppResult<Product> {
        let product = Product::create(&self.pool, fields).await?;
        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: i64, fields: ProductFields<'_>) -> AppResult<Product> {
        if !Product::update(&self.pool, id, fields).await? {
            return Err(AppError::not_found("Product"));
        }
        self.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !Product::delete(&self.pool, id).await? {
            return Err(AppError::not_found("Product"));
        }
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /* ---------- images ---------- */

    pub async fn images(&self, product_id: i64) -> AppResult<Vec<ProductImage>> {
        self.ensure_exists(product_id).await?;
        Ok(ProductImage::find_by_product(&self.pool, product_id).await?)
    }

    pub async fn image(&self, product_id: i64, id: i64) -> AppResult<ProductImage> {
        self.ensure_exists(product_id).await?;
        ProductImage::find_in_product(&self.pool, product_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Product image"))
    }

    #[instrument(skip(self, url))]
    pub async fn create_image(&self, product_id: i64, url: &str) -> AppResult<ProductImage> {
        self.ensure_exists(product_id).await?;
        Ok(ProductImage::create(&self.pool, product_id, url).await?)
    }

    #[instrument(skip(self, url))]
    pub async fn update_image(&self, product_id: i64, id: i64, url: &str) -> AppResult<ProductImage> {
        let image = self.image(product_id, id).await?;
        ProductImage::update_url(&self.pool, image.id, url).await?;
        self.image(product_id, id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_image(&self, product_id: i64, id: i64) -> AppResult<()> {
        let image = self.image(product_id, id).await?;
        ProductImage::delete(&self.pool, image.id).await?;
        Ok(())
    }

    pub async fn ensure_exists(&self, product_id: i64) -> AppResult<()> {
        if Product::exists(&self.pool, product_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Product"))
        }
    }
}

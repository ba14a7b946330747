use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState,
    api::{
        ApiPath,
        ValidatedJson,
        dto::{ProductDto, ProductImageDto, map_all},
        not_blank,
        response::ApiResponse,
    },
    error::AppResult,
    models::product::ProductFields,
};

#[derive(Deserialize, Validate)]
pub struct ProductBody {
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub name: String,
    #[validate(range(min = 100, max = 1_000_000, message = "must be between 100 and 1000000"))]
    pub price: i64,
    #[validate(length(min = 2, max = 500, message = "must be 2 to 500 characters"))]
    pub description: String,
    #[validate(range(min = 1, max = 10_000, message = "must be between 1 and 10000"))]
    pub stock: i64,
}

impl ProductBody {
    fn fields(&self) -> ProductFields<'_> {
        ProductFields {
            name: &self.name,
            price: self.price,
            description: &self.description,
            stock: self.stock,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct ImageBody {
    #[validate(custom(function = "not_blank", message = "must not be blank"))]
    pub url: String,
}

/* ---------- public ---------- */

pub async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<ProductDto>>> {
    let products = state.product_service().list().await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(products)))
}

pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<ProductDto>> {
    let product = state.product_service().get(id).await?;
    Ok(ApiResponse::new("200-1", "OK", product.into()))
}

pub async fn images(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Vec<ProductImageDto>>> {
    let images = state.product_service().images(product_id).await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(images)))
}

pub async fn image(
    State(state): State<AppState>,
    ApiPath((product_id, id)): ApiPath<(i64, i64)>,
) -> AppResult<ApiResponse<ProductImageDto>> {
    let image = state.product_service().image(product_id, id).await?;
    Ok(ApiResponse::new("200-1", "OK", image.into()))
}

/* ---------- admin ---------- */

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<ProductBody>,
) -> AppResult<ApiResponse<ProductDto>> {
    let product = state.product_service().create(body.fields()).await?;
    Ok(ApiResponse::new(
        "201-1",
        format!("Product {} created", product.id),
        product.into(),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<ProductBody>,
) -> AppResult<ApiResponse<ProductDto>> {
    let product = state.product_service().update(id, body.fields()).await?;
    Ok(ApiResponse::new(
        "200-1",
        format!("Product {id} updated"),
        product.into(),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<()>> {
    state.product_service().delete(id).await?;
    Ok(ApiResponse::message_only("200-1", format!("Product {id} deleted")))
}

pub async fn create_image(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<ImageBody>,
) -> AppResult<ApiResponse<ProductImageDto>> {
    let image = state
        .product_service()
        .create_image(product_id, &body.url)
        .await?;
    Ok(ApiResponse::new(
        "201-1",
        format!("Image {} added", image.id),
        image.into(),
    ))
}

pub async fn update_image(
    State(state): State<AppState>,
    ApiPath((product_id, id)): ApiPath<(i64, i64)>,
    ValidatedJson(body): ValidatedJson<ImageBody>,
) -> AppResult<ApiResponse<ProductImageDto>> {
    let image = state
        .product_service()
        .update_image(product_id, id, &body.url)
        .await?;
    Ok(ApiResponse::new("200-1", format!("Image {id} updated"), image.into()))
}

pub async fn remove_image(
    State(state): State<AppState>,
    ApiPath((product_id, id)): ApiPath<(i64, i64)>,
) -> AppResult<ApiResponse<()>> {
    state.product_service().delete_image(product_id, id).await?;
    Ok(ApiResponse::message_only("200-1", format!("Image {id} deleted")))
}

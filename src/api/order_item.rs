use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState,
    api::{
        ApiPath,
        ValidatedJson,
        dto::{OrderItemDto, map_all},
        response::ApiResponse,
    },
    error::AppResult,
    middleware::auth::CurrentUser,
    models::order_item::OrderItemFields,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemBody {
    pub order_id: i64,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i64,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub unit_price: i64,
    pub product_id: i64,
}

impl OrderItemBody {
    fn fields(&self) -> OrderItemFields {
        OrderItemFields {
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ValidatedJson(body): ValidatedJson<OrderItemBody>,
) -> AppResult<ApiResponse<OrderItemDto>> {
    let item = state
        .order_item_service()
        .create(body.order_id, body.fields(), Some(principal.id()))
        .await?;
    Ok(ApiResponse::new(
        "201-1",
        format!("Order item {} created", item.id),
        item.into(),
    ))
}

pub async fn list_by_order(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(order_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Vec<OrderItemDto>>> {
    let items = state
        .order_item_service()
        .list_by_order(order_id, Some(principal.id()))
        .await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(items)))
}

pub async fn get_one(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<OrderItemDto>> {
    let item = state.order_item_service().get(id, Some(principal.id())).await?;
    Ok(ApiResponse::new("200-1", "OK", item.into()))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<OrderItemBody>,
) -> AppResult<ApiResponse<OrderItemDto>> {
    let item = state
        .order_item_service()
        .update(id, body.fields(), Some(principal.id()))
        .await?;
    Ok(ApiResponse::new("200-1", format!("Order item {id} updated"), item.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<()>> {
    state
        .order_item_service()
        .delete(id, Some(principal.id()))
        .await?;
    Ok(ApiResponse::message_only("200-1", format!("Order item {id} deleted")))
}

/* ---------- admin ---------- */

pub async fn admin_list(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OrderItemDto>>> {
    let items = state.order_item_service().list_all().await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(items)))
}

pub async fn admin_list_by_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Vec<OrderItemDto>>> {
    let items = state.order_item_service().list_by_product(product_id).await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(items)))
}

pub async fn admin_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<OrderItemDto>> {
    let item = state.order_item_service().get(id, None).await?;
    Ok(ApiResponse::new("200-1", "OK", item.into()))
}

pub async fn admin_update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<OrderItemBody>,
) -> AppResult<ApiResponse<OrderItemDto>> {
    let item = state
        .order_item_service()
        .update(id, body.fields(), None)
        .await?;
    Ok(ApiResponse::new("200-1", format!("Order item {id} updated"), item.into()))
}

pub async fn admin_remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<()>> {
    state.order_item_service().delete(id, None).await?;
    Ok(ApiResponse::message_only("200-1", format!("Order item {id} deleted")))
}

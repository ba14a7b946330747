use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState,
    api::{
        ApiPath,
        ValidatedJson,
        dto::{OrderDto, map_all},
        not_blank,
        response::ApiResponse,
    },
    error::AppResult,
    middleware::auth::CurrentUser,
    models::order::OrderFields,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub order_count: i64,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub total_price: i64,
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub payment_method: String,
    #[validate(length(min = 2, max = 100, message = "must be 2 to 100 characters"))]
    pub payment_status: String,
    #[validate(custom(function = "not_blank", message = "must not be blank"))]
    pub address: String,
}

impl OrderBody {
    fn fields(&self) -> OrderFields<'_> {
        OrderFields {
            order_count: self.order_count,
            total_price: self.total_price,
            payment_method: &self.payment_method,
            payment_status: &self.payment_status,
            address: &self.address,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ValidatedJson(body): ValidatedJson<OrderBody>,
) -> AppResult<ApiResponse<OrderDto>> {
    let order = state
        .order_service()
        .create(principal.id(), body.fields())
        .await?;
    Ok(ApiResponse::new(
        "201-1",
        format!("Order {} created", order.id),
        order.into(),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> AppResult<ApiResponse<Vec<OrderDto>>> {
    let orders = state.order_service().list_by_user(principal.id()).await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(orders)))
}

pub async fn get_one(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<OrderDto>> {
    let order = state.order_service().get_owned(id, principal.id()).await?;
    Ok(ApiResponse::new("200-1", "OK", order.into()))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<OrderBody>,
) -> AppResult<ApiResponse<OrderDto>> {
    let orders = state.order_service();
    orders.get_owned(id, principal.id()).await?;
    let order = orders.update(id, body.fields()).await?;
    Ok(ApiResponse::new("200-1", format!("Order {id} updated"), order.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<()>> {
    let orders = state.order_service();
    orders.get_owned(id, principal.id()).await?;
    orders.delete(id).await?;
    Ok(ApiResponse::message_only("200-1", format!("Order {id} deleted")))
}

/* ---------- admin ---------- */

pub async fn admin_list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<OrderDto>>> {
    let orders = state.order_service().list_all().await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(orders)))
}

pub async fn admin_list_by_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Vec<OrderDto>>> {
    let orders = state.order_service().list_by_user(user_id).await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(orders)))
}

pub async fn admin_get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<OrderDto>> {
    let order = state.order_service().get(id).await?;
    Ok(ApiResponse::new("200-1", "OK", order.into()))
}

pub async fn admin_update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<OrderBody>,
) -> AppResult<ApiResponse<OrderDto>> {
    let order = state.order_service().update(id, body.fields()).await?;
    Ok(ApiResponse::new("200-1", format!("Order {id} updated"), order.into()))
}

pub async fn admin_remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<ApiResponse<()>> {
    state.order_service().delete(id).await?;
    Ok(ApiResponse::message_only("200-1", format!("Order {id} deleted")))
}

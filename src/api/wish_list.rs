use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState,
    api::{
        ApiPath,
        ValidatedJson,
        dto::{WishListDto, map_all},
        response::ApiResponse,
    },
    error::AppResult,
    middleware::auth::CurrentUser,
};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WishListBody {
    #[validate(range(min = 1, message = "must be a valid product id"))]
    pub product_id: i64,
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> AppResult<ApiResponse<Vec<WishListDto>>> {
    let entries = state.wish_list_service().list(principal.id()).await?;
    Ok(ApiResponse::new("200-1", "OK", map_all(entries)))
}

pub async fn contains(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(product_id): ApiPath<i64>,
) -> AppResult<Json<bool>> {
    let exists = state
        .wish_list_service()
        .contains(principal.id(), product_id)
        .await?;
    Ok(Json(exists))
}

pub async fn add(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ValidatedJson(body): ValidatedJson<WishListBody>,
) -> AppResult<ApiResponse<WishListDto>> {
    let entry = state
        .wish_list_service()
        .add(principal.id(), body.product_id)
        .await?;
    Ok(ApiResponse::new(
        "201-1",
        format!("{} added to the wish list", entry.product_name),
        entry.into(),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    ApiPath(product_id): ApiPath<i64>,
) -> AppResult<ApiResponse<WishListDto>> {
    let entry = state
        .wish_list_service()
        .remove(principal.id(), product_id)
        .await?;
    Ok(ApiResponse::new(
        "200-1",
        format!("{} removed from the wish list", entry.product_name),
        entry.into(),
    ))
}

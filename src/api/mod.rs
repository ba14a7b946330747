use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    routing::{delete, get, post, put},
};
use serde::{Serialize, de::DeserializeOwned};
use validator::{Validate, ValidationError};

use crate::{AppState, error::AppError};

pub mod auth;
pub mod dto;
pub mod order;
pub mod order_item;
pub mod product;
pub mod response;
pub mod user;
pub mod wish_list;

/// JSON body that has passed its `validator` constraints.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `Path` whose rejection is rendered in the response envelope.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("NotBlank"));
    }
    Ok(())
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Every route the service exposes. Authentication and the access policy are
/// layered on by `create_router`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .nest("/api/v1", v1())
}

fn v1() -> Router<AppState> {
    Router::new()
        // users
        .route("/users", post(auth::join))
        .route("/users/login", post(auth::login))
        .route("/users/logout", delete(auth::logout))
        .route("/users/token/refresh", post(auth::refresh))
        .route("/users/check-username", get(auth::check_username))
        .route("/users/check-email", get(auth::check_email))
        .route("/users/me", get(user::me))
        .route("/adm/users", get(user::list))
        .route("/adm/users/{id}", get(user::get_one).delete(user::remove))
        // products
        .route("/products", get(product::list))
        .route("/products/{id}", get(product::get_one))
        .route("/products/{product_id}/images", get(product::images))
        .route("/products/{product_id}/images/{id}", get(product::image))
        .route("/adm/products", post(product::create))
        .route(
            "/adm/products/{id}",
            put(product::update).delete(product::remove),
        )
        .route("/adm/products/{product_id}/images", post(product::create_image))
        .route(
            "/adm/products/{product_id}/images/{id}",
            put(product::update_image).delete(product::remove_image),
        )
        // orders
        .route("/orders", get(order::list).post(order::create))
        .route(
            "/orders/{id}",
            get(order::get_one).put(order::update).delete(order::remove),
        )
        .route("/adm/orders", get(order::admin_list))
        .route("/adm/orders/user/{user_id}", get(order::admin_list_by_user))
        .route(
            "/adm/orders/{id}",
            get(order::admin_get).put(order::admin_update).delete(order::admin_remove),
        )
        // order items
        .route("/orderItems", post(order_item::create))
        .route("/orderItems/order/{order_id}", get(order_item::list_by_order))
        .route(
            "/orderItems/{id}",
            get(order_item::get_one).put(order_item::update).delete(order_item::remove),
        )
        .route("/adm/orderItems", get(order_item::admin_list))
        .route(
            "/adm/orderItems/product/{product_id}",
            get(order_item::admin_list_by_product),
        )
        .route(
            "/adm/orderItems/{id}",
            get(order_item::admin_get)
                .put(order_item::admin_update)
                .delete(order_item::admin_remove),
        )
        // wish list
        .route("/wish-lists", get(wish_list::list).post(wish_list::add))
        .route(
            "/wish-lists/{product_id}",
            get(wish_list::contains).delete(wish_list::remove),
        )
}

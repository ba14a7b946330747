use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};
use sqlx::SqlitePool;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    middleware::policy::AccessPolicy,
    services::{
        auth_service::AuthService, jwt_service::JwtService,
        order_item_service::OrderItemService, order_service::OrderService,
        product_service::ProductService, user_service::UserService,
        wish_list_service::WishListService,
    },
};

mod api;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod services;
mod utils;
#[cfg(test)]
mod tests;

/// Shared, immutable per-process state. Services are cheap handles over the
/// pool and are built per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtService,
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            jwt: JwtService::new(&config.jwt),
            policy: Arc::new(AccessPolicy::default()),
            config: Arc::new(config),
            pool,
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.pool.clone(), self.jwt.clone(), self.config.bcrypt_cost)
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.pool.clone())
    }

    pub fn product_service(&self) -> ProductService {
        ProductService::new(self.pool.clone())
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.pool.clone())
    }

    pub fn order_item_service(&self) -> OrderItemService {
        OrderItemService::new(self.pool.clone())
    }

    pub fn wish_list_service(&self) -> WishListService {
        WishListService::new(self.pool.clone())
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Last added runs first: cookies must be readable before authentication,
    // and authentication must finish before the policy looks at the principal.
    api::routes()
        .layer(from_fn_with_state(state.clone(), middleware::policy::authorize))
        .layer(from_fn_with_state(state.clone(), middleware::auth::authenticate))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_api=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let pool = db::create_db_pool(&config).await?;
    let state = AppState::new(pool, config);

    if let Some(admin) = &state.config.init_admin {
        state.auth_service().ensure_admin(admin).await?;
    }

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

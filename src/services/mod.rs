pub mod auth_service;
pub mod cookie_service;
pub mod jwt_service;
pub mod order_item_service;
pub mod order_service;
pub mod product_service;
pub mod user_service;
pub mod wish_list_service;

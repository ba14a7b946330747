pub mod jwt;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_image;
pub mod user;
pub mod wish_list;

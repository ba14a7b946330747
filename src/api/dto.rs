use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    order::Order, order_item::OrderItem, product::Product, product_image::ProductImage,
    user::{Role, User}, wish_list::WishListEntry,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub address: String,
    pub role: Role,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub role: Role,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<&User> for AdminUserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            role: user.role,
            create_date: user.create_date,
            modify_date: user.modify_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub stock: i64,
    pub image_url: Option<String>,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            description: p.description,
            stock: p.stock,
            image_url: p.image_url,
            create_date: p.create_date,
            modify_date: p.modify_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageDto {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<ProductImage> for ProductImageDto {
    fn from(i: ProductImage) -> Self {
        Self {
            id: i.id,
            product_id: i.product_id,
            url: i.url,
            create_date: i.create_date,
            modify_date: i.modify_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i64,
    pub user_id: i64,
    pub order_count: i64,
    pub total_price: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub address: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            order_count: o.order_count,
            total_price: o.total_price,
            payment_method: o.payment_method,
            payment_status: o.payment_status,
            address: o.address,
            create_date: o.create_date,
            modify_date: o.modify_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: i64,
    pub total_price: i64,
    pub create_date: DateTime<Utc>,
    pub modify_date: DateTime<Utc>,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            id: i.id,
            order_id: i.order_id,
            product_id: i.product_id,
            quantity: i.quantity,
            unit_price: i.unit_price,
            total_price: i.total_price,
            create_date: i.create_date,
            modify_date: i.modify_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListDto {
    pub product_id: i64,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub product_price: i64,
    pub quantity: i64,
}

impl From<WishListEntry> for WishListDto {
    fn from(e: WishListEntry) -> Self {
        Self {
            product_id: e.product_id,
            product_name: e.product_name,
            product_image_url: e.product_image_url,
            product_price: e.product_price,
            quantity: e.quantity,
        }
    }
}

/// Converts a list of rows into their wire shape.
pub fn map_all<R, D: From<R>>(rows: Vec<R>) -> Vec<D> {
    rows.into_iter().map(D::from).collect()
}

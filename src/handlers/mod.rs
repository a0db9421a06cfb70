//! HTTP handlers: thin adapters from requests to services

pub mod auth;
pub mod health;
pub mod movements;
pub mod products;
pub mod reports;

pub use auth::{change_password, login, me};
pub use health::health_check;
pub use movements::{list_movements, record_movement};
pub use products::{
    create_product, delete_product, get_product, list_categories, list_products, update_product,
};
pub use reports::{inventory_overview, inventory_valuation, low_stock_products};

//! Product catalog records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category choices offered by the presentation layer. Storage is free text;
/// membership is not enforced here.
pub const CATEGORIES: [&str; 10] = [
    "CIMENTO",
    "AGREGADOS",
    "CERÂMICOS",
    "FERRO_E_ACO",
    "MADEIRAS",
    "TINTAS",
    "HIDRAULICA",
    "ELETRICA",
    "FERRAMENTAS",
    "OUTROS",
];

/// A stocked item. `quantity` is mutated only through the movement ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    /// User-assigned business key, unique across the catalog.
    pub code: i64,
    pub description: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub supplier: String,
    pub min_stock: i64,
    pub expiry_date: Option<NaiveDate>,
    pub lot_number: Option<String>,
    pub created_at: String,
}

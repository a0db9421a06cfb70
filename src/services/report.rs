//! Derived inventory views: valuation, low-stock detection, movement history

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{MovementRecord, Product};

/// Inventory reporting service
#[derive(Clone)]
pub struct ReportService {
    db: SqlitePool,
}

/// The landing-page aggregate: catalog, valuation and depleted items.
#[derive(Debug, Serialize)]
pub struct InventoryOverview {
    pub products: Vec<Product>,
    pub total_value: f64,
    pub low_stock: Vec<Product>,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Sum of quantity times unit price over the whole catalog; 0 when empty.
    pub async fn total_inventory_value(&self) -> AppResult<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(quantity * unit_price), 0.0) FROM products",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }

    /// Products at or below their minimum threshold, most depleted first.
    pub async fn low_stock_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, description, category, quantity, unit_price,
                   supplier, min_stock, expiry_date, lot_number, created_at
            FROM products
            WHERE quantity <= min_stock
            ORDER BY quantity ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Full ledger joined with product description and acting username,
    /// newest first. Movements without an actor still appear.
    pub async fn movement_history(&self) -> AppResult<Vec<MovementRecord>> {
        let records = sqlx::query_as::<_, MovementRecord>(
            r#"
            SELECT m.id, m.product_id, m.movement_type, m.quantity, m.created_at,
                   m.note, m.user_id,
                   p.description AS product_description,
                   u.username AS username
            FROM movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN users u ON u.id = m.user_id
            ORDER BY m.created_at DESC, m.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    /// Catalog, valuation and low-stock summary in one call
    pub async fn overview(&self) -> AppResult<InventoryOverview> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, description, category, quantity, unit_price,
                   supplier, min_stock, expiry_date, lot_number, created_at
            FROM products
            ORDER BY description
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let total_value = self.total_inventory_value().await?;
        let low_stock = self.low_stock_products().await?;

        Ok(InventoryOverview {
            products,
            total_value,
            low_stock,
        })
    }
}

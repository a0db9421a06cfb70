//! Product repository: CRUD over the catalog
//!
//! Stock quantity is mutated exclusively through the movement ledger. Product
//! registration records the implicit initial entry here so the ledger matches
//! the catalog from the first insert; editing never touches quantity.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{self, movement::INITIAL_REGISTRATION_NOTE, MovementType, Product};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

/// Input for registering a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(range(min = 1))]
    pub code: i64,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    #[validate(length(min = 1))]
    pub supplier: String,
    #[validate(range(min = 0))]
    pub min_stock: i64,
    pub expiry_date: Option<NaiveDate>,
    pub lot_number: Option<String>,
}

/// Input for editing a product. Quantity is deliberately absent: stock levels
/// change only through movements.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(range(min = 1))]
    pub code: i64,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    #[validate(length(min = 1))]
    pub supplier: String,
    #[validate(range(min = 0))]
    pub min_stock: i64,
    pub expiry_date: Option<NaiveDate>,
    pub lot_number: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Register a product and its initial stock entry atomically.
    pub async fn create(&self, actor_id: i64, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;

        let mut tx = self.db.begin().await?;

        let code_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE code = ?)")
                .bind(input.code)
                .fetch_one(&mut *tx)
                .await?;

        if code_taken {
            return Err(AppError::DuplicateCode(input.code));
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (code, description, category, quantity, unit_price,
                                  supplier, min_stock, expiry_date, lot_number, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, code, description, category, quantity, unit_price,
                      supplier, min_stock, expiry_date, lot_number, created_at
            "#,
        )
        .bind(input.code)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(&input.supplier)
        .bind(input.min_stock)
        .bind(input.expiry_date)
        .bind(&input.lot_number)
        .bind(models::now_stamp())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, input.code))?;

        // The ledger accounts for the initial quantity; zero stock has
        // nothing to record and the ledger sum still matches.
        if product.quantity > 0 {
            sqlx::query(
                r#"
                INSERT INTO movements (product_id, movement_type, quantity, created_at, note, user_id)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(product.id)
            .bind(MovementType::Entrada)
            .bind(product.quantity)
            .bind(models::now_stamp())
            .bind(INITIAL_REGISTRATION_NOTE)
            .bind(actor_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(actor_id, product_id = product.id, code = product.code, "product registered");

        Ok(product)
    }

    /// Edit a product's attributes. The stored quantity is untouched.
    pub async fn update(
        &self,
        actor_id: i64,
        id: i64,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        input.validate()?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let code_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE code = ? AND id != ?)",
        )
        .bind(input.code)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if code_taken {
            return Err(AppError::DuplicateCode(input.code));
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET code = ?, description = ?, category = ?, unit_price = ?,
                supplier = ?, min_stock = ?, expiry_date = ?, lot_number = ?
            WHERE id = ?
            RETURNING id, code, description, category, quantity, unit_price,
                      supplier, min_stock, expiry_date, lot_number, created_at
            "#,
        )
        .bind(input.code)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.unit_price)
        .bind(&input.supplier)
        .bind(input.min_stock)
        .bind(input.expiry_date)
        .bind(&input.lot_number)
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, input.code))?;

        tracing::debug!(actor_id, product_id = id, "product updated");

        Ok(product)
    }

    /// Remove a product and its entire movement history. Destructive.
    pub async fn delete(&self, actor_id: i64, id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM movements WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the movement delete back.
            return Err(AppError::NotFound("Product".to_string()));
        }

        tx.commit().await?;

        tracing::info!(actor_id, product_id = id, "product deleted");

        Ok(())
    }

    /// Fetch one product by id
    pub async fn get(&self, id: i64) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, description, category, quantity, unit_price,
                   supplier, min_stock, expiry_date, lot_number, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// List the catalog ordered by description
    pub async fn list(&self) -> AppResult<Vec<Product>> {
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

        Ok(products)
    }
}

fn map_unique_violation(error: sqlx::Error, code: i64) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateCode(code),
        _ => AppError::Database(error),
    }
}

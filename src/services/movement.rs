//! Movement ledger: the only path that mutates product stock
//!
//! Every quantity change is applied and journaled inside one transaction, so
//! the catalog and the ledger cannot drift apart.

use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{self, Movement, MovementType, Product};

/// Stock movement service
#[derive(Clone)]
pub struct MovementService {
    db: SqlitePool,
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize, Validate)]
pub struct RecordMovementInput {
    pub product_id: i64,
    pub movement_type: MovementType,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub note: Option<String>,
}

impl MovementService {
    /// Create a new MovementService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Apply a stock movement and append its ledger row atomically.
    ///
    /// Outbound movements use a guarded update: the sufficiency check and the
    /// decrement are one statement, so two concurrent withdrawals cannot both
    /// pass against a stale read. The update is also the transaction's first
    /// statement, which takes the write lock up front and serializes
    /// concurrent movements on the same product.
    pub async fn record(&self, actor_id: i64, input: RecordMovementInput) -> AppResult<Movement> {
        input.validate()?;

        let mut tx = self.db.begin().await?;

        let updated = match input.movement_type {
            MovementType::Entrada => {
                sqlx::query("UPDATE products SET quantity = quantity + ? WHERE id = ?")
                    .bind(input.quantity)
                    .bind(input.product_id)
                    .execute(&mut *tx)
                    .await?
            }
            MovementType::Saida => {
                sqlx::query(
                    "UPDATE products SET quantity = quantity - ? WHERE id = ? AND quantity >= ?",
                )
                .bind(input.quantity)
                .bind(input.product_id)
                .bind(input.quantity)
                .execute(&mut *tx)
                .await?
            }
        };

        if updated.rows_affected() == 0 {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, code, description, category, quantity, unit_price,
                       supplier, min_stock, expiry_date, lot_number, created_at
                FROM products
                WHERE id = ?
                "#,
            )
            .bind(input.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            // Only an outbound movement can miss with the product present.
            return Err(AppError::InsufficientStock {
                requested: input.quantity,
                available: product.quantity,
            });
        }

        let note = match input.note.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => input.movement_type.default_note().to_string(),
        };

        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO movements (product_id, movement_type, quantity, created_at, note, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, product_id, movement_type, quantity, created_at, note, user_id
            "#,
        )
        .bind(input.product_id)
        .bind(input.movement_type)
        .bind(input.quantity)
        .bind(models::now_stamp())
        .bind(&note)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            actor_id,
            product_id = input.product_id,
            movement_type = input.movement_type.as_str(),
            quantity = input.quantity,
            "stock movement recorded"
        );

        Ok(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use crate::services::product::{CreateProductInput, ProductService};

    fn catalog_input(code: i64, quantity: i64) -> CreateProductInput {
        CreateProductInput {
            code,
            description: format!("Produto {}", code),
            category: "OUTROS".to_string(),
            quantity,
            unit_price: 10.0,
            supplier: "Fornecedor Teste".to_string(),
            min_stock: 5,
            expiry_date: None,
            lot_number: None,
        }
    }

    fn movement_input(product_id: i64, movement_type: MovementType, quantity: i64) -> RecordMovementInput {
        RecordMovementInput {
            product_id,
            movement_type,
            quantity,
            note: None,
        }
    }

    async fn setup(initial_quantity: i64) -> (SqlitePool, i64, Product) {
        let pool = test_support::pool().await;
        let actor = test_support::insert_user(&pool, "operador").await;
        let product = ProductService::new(pool.clone())
            .create(actor, catalog_input(1001, initial_quantity))
            .await
            .unwrap();
        (pool, actor, product)
    }

    async fn stored_quantity(pool: &SqlitePool, product_id: i64) -> i64 {
        sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn entrada_increases_quantity_and_appends_ledger_row() {
        let (pool, actor, product) = setup(500).await;
        let service = MovementService::new(pool.clone());

        let movement = service
            .record(actor, movement_input(product.id, MovementType::Entrada, 50))
            .await
            .unwrap();

        assert_eq!(movement.movement_type, MovementType::Entrada);
        assert_eq!(movement.quantity, 50);
        assert_eq!(movement.note.as_deref(), Some("Entrada de estoque"));
        assert_eq!(movement.user_id, Some(actor));
        assert_eq!(stored_quantity(&pool, product.id).await, 550);
    }

    #[tokio::test]
    async fn saida_decreases_quantity() {
        let (pool, actor, product) = setup(500).await;
        let service = MovementService::new(pool.clone());

        let movement = service
            .record(actor, movement_input(product.id, MovementType::Saida, 120))
            .await
            .unwrap();

        assert_eq!(movement.note.as_deref(), Some("Saída de estoque"));
        assert_eq!(stored_quantity(&pool, product.id).await, 380);
    }

    #[tokio::test]
    async fn custom_note_is_kept() {
        let (pool, actor, product) = setup(500).await;
        let service = MovementService::new(pool);

        let movement = service
            .record(
                actor,
                RecordMovementInput {
                    product_id: product.id,
                    movement_type: MovementType::Saida,
                    quantity: 10,
                    note: Some("Obra da Rua 7".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(movement.note.as_deref(), Some("Obra da Rua 7"));
    }

    #[tokio::test]
    async fn saida_beyond_stock_fails_and_changes_nothing() {
        let (pool, actor, product) = setup(500).await;
        let service = MovementService::new(pool.clone());

        let err = service
            .record(actor, movement_input(product.id, MovementType::Saida, 501))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::InsufficientStock { requested: 501, available: 500 }
        ));
        assert_eq!(stored_quantity(&pool, product.id).await, 500);

        // Ledger unchanged: only the registration entry remains.
        let movements: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM movements WHERE product_id = ?")
                .bind(product.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(movements, 1);
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let pool = test_support::pool().await;
        let actor = test_support::insert_user(&pool, "operador").await;
        let service = MovementService::new(pool);

        let err = service
            .record(actor, movement_input(9999, MovementType::Entrada, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let (pool, actor, product) = setup(500).await;
        let service = MovementService::new(pool);

        let err = service
            .record(actor, movement_input(product.id, MovementType::Entrada, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn concurrent_withdrawals_never_oversell() {
        let (pool, actor, product) = setup(10).await;
        let service = MovementService::new(pool.clone());

        let first = tokio::spawn({
            let service = service.clone();
            let input = movement_input(product.id, MovementType::Saida, 6);
            async move { service.record(actor, input).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            let input = movement_input(product.id, MovementType::Saida, 6);
            async move { service.record(actor, input).await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AppError::InsufficientStock { .. })));
        assert_eq!(stored_quantity(&pool, product.id).await, 4);
    }

    #[tokio::test]
    async fn ledger_sum_always_matches_quantity() {
        let (pool, actor, product) = setup(500).await;
        let service = MovementService::new(pool.clone());

        for (movement_type, quantity) in [
            (MovementType::Entrada, 30),
            (MovementType::Saida, 120),
            (MovementType::Entrada, 5),
            (MovementType::Saida, 15),
        ] {
            service
                .record(actor, movement_input(product.id, movement_type, quantity))
                .await
                .unwrap();
        }

        let ledger_sum: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(CASE WHEN movement_type = 'ENTRADA'
                                     THEN quantity ELSE -quantity END), 0)
            FROM movements
            WHERE product_id = ?
            "#,
        )
        .bind(product.id)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(stored_quantity(&pool, product.id).await, 400);
        assert_eq!(ledger_sum, 400);
    }
}

//! Database bootstrap: pool construction, migrations and first-run seeding

use std::str::FromStr;
use std::time::Duration;

use bcrypt::{hash, DEFAULT_COST};
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::models::{self, movement::INITIAL_REGISTRATION_NOTE, MovementType};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Sample catalog inserted when the products table is empty:
/// (code, description, category, quantity, unit_price, supplier, min_stock,
/// expiry_date, lot_number)
type SampleProduct = (
    i64,
    &'static str,
    &'static str,
    i64,
    f64,
    &'static str,
    i64,
    Option<&'static str>,
    Option<&'static str>,
);

const SAMPLE_PRODUCTS: [SampleProduct; 5] = [
    (1001, "Cimento CP II 50kg", "CIMENTO", 500, 28.90, "Votorantim", 100, Some("2024-12-31"), Some("LOTE001")),
    (1002, "Areia Média m³", "AGREGADOS", 200, 85.00, "Pedreira São José", 50, None, None),
    (1003, "Tijolo Baiano 1000un", "CERÂMICOS", 150, 450.00, "Cerâmica Santa Rita", 30, None, None),
    (1004, "Vergalhão CA-50 6mm", "FERRO_E_ACO", 80, 25.00, "Gerdau", 20, None, None),
    (1005, "Tinta Acrílica Branco Gelo 18L", "TINTAS", 40, 189.90, "Suvinil", 10, Some("2025-06-30"), Some("LOTE005")),
];

/// Build the connection pool. The database file is created on first run.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Seed the default admin account and the sample product catalog. Idempotent:
/// each block only runs against an empty table.
pub async fn seed_defaults(pool: &SqlitePool) -> AppResult<()> {
    let admin_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(DEFAULT_ADMIN_USERNAME)
            .fetch_one(pool)
            .await?;

    if !admin_exists {
        let password_hash = hash(DEFAULT_ADMIN_PASSWORD, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role, name, email, created_at)
            VALUES (?, ?, 'admin', 'Administrador', 'admin@empresa.com', ?)
            "#,
        )
        .bind(DEFAULT_ADMIN_USERNAME)
        .bind(&password_hash)
        .bind(models::now_stamp())
        .execute(pool)
        .await?;

        tracing::info!("Seeded default admin user");
    }

    let product_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    if product_count == 0 {
        seed_sample_products(pool).await?;
        tracing::info!("Seeded sample product catalog");
    }

    Ok(())
}

/// Insert the sample catalog, each product paired with an actorless inbound
/// movement so the ledger accounts for the seeded stock.
async fn seed_sample_products(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let now = models::now_stamp();

    for (code, description, category, quantity, unit_price, supplier, min_stock, expiry, lot) in
        SAMPLE_PRODUCTS
    {
        let product_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (code, description, category, quantity, unit_price,
                                  supplier, min_stock, expiry_date, lot_number, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(code)
        .bind(description)
        .bind(category)
        .bind(quantity)
        .bind(unit_price)
        .bind(supplier)
        .bind(min_stock)
        .bind(expiry)
        .bind(lot)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO movements (product_id, movement_type, quantity, created_at, note, user_id)
            VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(product_id)
        .bind(MovementType::Entrada)
        .bind(quantity)
        .bind(&now)
        .bind(INITIAL_REGISTRATION_NOTE)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_defaults_is_idempotent() {
        let pool = test_support::pool().await;
        seed_defaults(&pool).await.unwrap();
        seed_defaults(&pool).await.unwrap();

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        let movements: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movements")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(users, 1);
        assert_eq!(products, 5);
        assert_eq!(movements, 5);
    }

    #[tokio::test]
    async fn seeded_catalog_satisfies_ledger_invariant() {
        let pool = test_support::pool().await;
        seed_defaults(&pool).await.unwrap();

        let mismatches: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products p
            WHERE p.quantity != (
                SELECT COALESCE(SUM(CASE WHEN m.movement_type = 'ENTRADA'
                                         THEN m.quantity ELSE -m.quantity END), 0)
                FROM movements m WHERE m.product_id = p.id
            )
            "#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(mismatches, 0);
    }
}

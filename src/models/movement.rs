//! Stock-movement ledger records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Note attached to the implicit entry recorded when a product is registered.
pub const INITIAL_REGISTRATION_NOTE: &str = "Cadastro inicial";

/// Movement direction. ENTRADA adds stock, SAIDA removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    Entrada,
    Saida,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entrada => "ENTRADA",
            MovementType::Saida => "SAIDA",
        }
    }

    /// Note stored when the caller supplies none.
    pub fn default_note(&self) -> &'static str {
        match self {
            MovementType::Entrada => "Entrada de estoque",
            MovementType::Saida => "Saída de estoque",
        }
    }
}

/// An immutable audit record of one quantity change.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Movement {
    pub id: i64,
    pub product_id: i64,
    pub movement_type: MovementType,
    /// Positive magnitude; direction comes from `movement_type`.
    pub quantity: i64,
    pub created_at: String,
    pub note: Option<String>,
    /// Acting user; system-generated movements have none.
    pub user_id: Option<i64>,
}

/// Movement joined with its product description and the acting username, for
/// the history view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovementRecord {
    pub id: i64,
    pub product_id: i64,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub created_at: String,
    pub note: Option<String>,
    pub user_id: Option<i64>,
    pub product_description: String,
    pub username: Option<String>,
}

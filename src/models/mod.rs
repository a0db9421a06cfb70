//! Persistent records for the inventory system
//!
//! One concrete typed struct per entity; rows are never accessed by dynamic
//! column name.

pub mod movement;
pub mod product;
pub mod user;

pub use movement::{Movement, MovementRecord, MovementType};
pub use product::{Product, CATEGORIES};
pub use user::{Role, User};

use chrono::Local;

/// Textual date-time format shared by all tables. Lexicographic order matches
/// chronological order.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current wall-clock time in the storage format.
pub fn now_stamp() -> String {
    Local::now().format(DATETIME_FORMAT).to_string()
}

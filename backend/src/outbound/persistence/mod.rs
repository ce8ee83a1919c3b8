//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.
//!
//! Each repository implements one driven port. Row structs stay private to
//! this module; only validated domain values cross the boundary.

mod diesel_basic_error_mapping;
mod diesel_card_repository;
mod diesel_message_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_card_repository::DieselCardRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and community repository ports,
//! backed by PostgreSQL via `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leak into the domain.
//! - **Atomic writes**: every dual write runs inside one transaction.
//!
//! # Example
//!
//! ```ignore
//! use townsquare::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/townsquare")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_community_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_community_repository::DieselCommunityRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

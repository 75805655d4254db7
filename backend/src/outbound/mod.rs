//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: mutex-guarded directory for database-less runs and tests
//! - **geocoding**: Mapbox Places client plus a single-retry decorator
//! - **password**: Argon2id password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod geocoding;
pub mod memory;
pub mod password;
pub mod persistence;

//! Database module - MySQL connection pool using SQLx
//!
//! The pool backs the MySQL document store. Schema lives in
//! `infra/migrations` and is applied by [`DatabasePool::run_migrations`].

pub mod connection;

// Re-export commonly used types
pub use connection::DatabasePool;

//! # Reporting Database Crate
//!
//! This crate is the data-access layer of the reporting service. It owns the
//! SQLite schema and every query against it.
//!
//! ## Architectural Principles
//!
//! - **Explicit handle:** The pool is created by `connect` and passed around by
//!   value inside `DbRepository`. There is no process-wide connection.
//! - **One transaction per operation:** Each repository method opens a
//!   transaction, performs a single logical operation and commits. Any early
//!   return drops the transaction, which rolls it back.
//! - **Typed outcomes:** Constraint violations are translated into `DbError`
//!   variants (`NotFound`, `Conflict`, `InvalidReference`) that the HTTP layer
//!   maps onto status codes.
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: build the connection pool.
//! - `ensure_schema`: create the tables if they do not exist yet.
//! - `DbRepository`: the create/list/get/update/delete operations.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, ensure_schema};
pub use error::DbError;
pub use repository::DbRepository;

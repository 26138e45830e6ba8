//! Shared infrastructure for the recipe API
//!
//! This crate provides the pieces the service binary needs but that are not
//! recipe-specific: PostgreSQL connection pooling, configuration read from the
//! environment, and the database error taxonomy.

pub mod database;
pub mod error;

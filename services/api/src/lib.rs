//! Recipe management API
//!
//! Token-authenticated CRUD over recipes, tags and ingredients, with image
//! upload. Every resource is scoped to its owning user: another user's
//! resources are indistinguishable from missing ones.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod storage;
pub mod token;
pub mod validation;

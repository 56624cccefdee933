//! # Taskboard Shared Library
//!
//! This crate contains the types and business rules shared by the taskboard
//! API server: database models, authentication primitives, the field
//! validation engine, and the request guard pipeline.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, and the axum auth extractor
//! - `db`: Connection pool and migration runner
//! - `validate`: Data-driven field validation engine
//! - `guard`: Ordered guard pipeline (authentication, ownership, authorship)

pub mod auth;
pub mod db;
pub mod guard;
pub mod models;
pub mod validate;

/// Current version of the taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

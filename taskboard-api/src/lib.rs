//! # Taskboard API Server Library
//!
//! This library provides the core functionality for the taskboard API
//! server: a CRUD task tracker with users, statuses, labels, and tasks.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: Route handlers per resource

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

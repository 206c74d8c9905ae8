//! # SiteAdmin API Server Library
//!
//! HTTP layer of the SiteAdmin console: configuration, application state,
//! the axum router and the JSON envelope every endpoint answers with.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error envelope and HTTP status mapping
//! - `response`: Success envelope and pagination metadata
//! - `middleware`: Security headers and session extraction
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;

//! Centralized error handling for the listings proxy
//!
//! This module unifies error types across the application layers.
//!
//! # Error Categories
//!
//! - **Source Errors**: adapter configuration, transport, empty results and parsing
//! - **Resolver Errors**: caller contract violations when invoking the resolver
//! - **Validation Errors**: input validation at construction boundaries
//! - **Web Errors**: HTTP request shape problems
//!
//! # Usage
//!
//! ```rust
//! use listings_proxy::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Web Results
pub type WebResult<T> = Result<T, WebError>;

//! Utility modules for the listings proxy
//!
//! This module contains reusable utilities that can be used
//! across different parts of the system.

pub mod html;
pub mod http_client;
pub mod human_format;
pub mod time;
pub mod url;

// Re-export commonly used types for convenience
pub use http_client::HttpClient;
pub use human_format::{format_iso_duration, format_runtime};
pub use time::{format_wall_clock, parse_timezone};

//! HTTP request handlers, one module per endpoint group

pub mod clock;
pub mod health;
pub mod movies;
pub mod schedule;
pub mod sources;

pub mod config;
pub mod errors;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod utils;
pub mod web;

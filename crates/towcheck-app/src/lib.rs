//! Application service layer - config, batch evaluation, caching, export

pub mod batch;
pub mod cache;
pub mod config;
pub mod export;

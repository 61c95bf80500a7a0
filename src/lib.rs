// src/lib.rs
pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod provider;

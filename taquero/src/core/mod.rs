//! Core: configuration and application state
//!
//! - [`Config`] - environment configuration
//! - [`AppState`] - stores, finance book and sync worker
//! - [`Stores`] - one record store per domain

pub mod config;
pub mod state;

pub use config::Config;
pub use state::{AppState, DOMAINS, Stores};

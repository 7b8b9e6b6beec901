//! Dimora Real Estate Marketplace Server
//!
//! The appointment-booking backend of the Dimora marketplace: free
//! visit-slot computation for the agent handling an advertisement,
//! race-safe appointment creation, and the confirm/reject/cancel
//! status lifecycle.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod slots;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

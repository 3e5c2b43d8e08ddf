//! Equipment checkout client
//!
//! Client layer for the equipment checkout service: users request
//! equipment, ambassadors stage and assign requests, and active
//! checkouts are tracked until returned. State is kept in sync with the
//! remote REST API by polling and by targeted re-fetches after each
//! action.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by the CLI commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: services::Services,
}

impl AppState {
    /// Build the services on top of the HTTP API described by `config`
    pub fn connect(config: AppConfig) -> AppResult<Self> {
        let api = api::HttpApi::new(&config.api)?;
        tracing::debug!(base_url = api.base_url(), "Equipment API client ready");
        Ok(Self {
            config: Arc::new(config),
            services: services::Services::new(Arc::new(api)),
        })
    }
}

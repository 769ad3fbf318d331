pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::RelayService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: RelayService,
}

impl AppState {
    pub fn new(relay: RelayService) -> Self {
        Self { relay }
    }
}

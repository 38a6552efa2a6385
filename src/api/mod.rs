//! API module for the transcript service
//!
//! Provides the REST endpoints that fetch transcripts and list caption languages.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::transcript::TranscriptService;

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{build_router, AppState};

/// API server for handling REST requests
pub struct ApiServer {
    service: Arc<TranscriptService>,
    config: Arc<Config>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(service: Arc<TranscriptService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }

    /// Start the API server and run until shutdown
    pub async fn start(self) -> Result<()> {
        let bind_address = self.config.bind_address();
        info!("🚀 Starting API server on {}", bind_address);

        let state = AppState::new(self.service, &self.config.upstream.default_language);
        server::start_http_server(state, &bind_address).await
    }
}

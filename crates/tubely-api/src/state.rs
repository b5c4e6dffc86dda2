//! Shared application state

use crate::auth::Authenticator;
use crate::services::IngestService;
use std::sync::Arc;
use tubely_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub authenticator: Arc<dyn Authenticator>,
    pub ingest: IngestService,
}

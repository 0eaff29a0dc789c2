pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::catalog::Catalog;
use crate::delivery::DeliveryEngine;
use crate::storage::{CursorStore, PreferenceStore};

pub use routes::BibleBotApi;

/// Shared handles the management endpoints work with.
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<DeliveryEngine>,
    pub catalog: Arc<Catalog>,
    pub cursors: Arc<dyn CursorStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub shutdown: CancellationToken,
}

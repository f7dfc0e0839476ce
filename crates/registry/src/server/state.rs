//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::RegistryError;

use super::error::ApiError;
use crate::registry::StudentRegistry;
use crate::store::{MemoryStudentStore, StudentStore};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Registration and listing over the configured store.
    pub registry: StudentRegistry,
    /// Whether 500 responses may carry internal error detail.
    pub expose_error_detail: bool,
}

impl AppState {
    /// Create a new [`AppState`] over `store`.
    pub fn new(store: Arc<dyn StudentStore>, expose_error_detail: bool) -> Self {
        Self {
            registry: StudentRegistry::new(store),
            expose_error_detail,
        }
    }

    /// Wrap a registry error for the HTTP boundary.
    pub fn api_error(&self, error: RegistryError) -> ApiError {
        ApiError::new(error, self.expose_error_detail)
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] over an empty in-memory store, suitable for tests.
    fn default() -> Self {
        Self::new(Arc::new(MemoryStudentStore::new()), false)
    }
}

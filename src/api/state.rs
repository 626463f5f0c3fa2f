use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::error::{ApiError, ApiResult};
use crate::config::Config;
use crate::store::Store;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the store and config sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
        }
    }

    /// Lock the store for the duration of one request's work
    pub fn store(&self) -> ApiResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))
    }
}

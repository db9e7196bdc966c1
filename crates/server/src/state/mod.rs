use std::sync::Arc;

use axum::extract::FromRef;

use crate::store::Store;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(state: &AppState) -> Self {
        // Arc clone, the store itself is shared
        state.store.clone()
    }
}

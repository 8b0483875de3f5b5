use std::sync::Arc;

use crate::store::AnalysisStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalysisStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self { store }
    }
}

//! Shared application state injected into every handler.
//!
//! `AppState` is built once in `main.rs` and registered as `web::Data`; the
//! clones handed to each actix worker share the same store and gateway.

use std::sync::Arc;

use crate::gateway::EvaluationGateway;
use crate::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    /// The single record store of the process.
    pub store: SharedStore,

    /// `None` when no provider credential was configured; evaluation routes
    /// answer 503 while every other route keeps working.
    pub gateway: Option<Arc<EvaluationGateway>>,
}

impl AppState {
    pub fn new(store: SharedStore, gateway: Option<EvaluationGateway>) -> Self {
        Self {
            store,
            gateway: gateway.map(Arc::new),
        }
    }
}

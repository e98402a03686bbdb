//! HTTP surface for the workflow engine.
//!
//! A thin axum layer over [`Engine`](crate::Engine): request validation,
//! error-to-status mapping, and the JSON contract. All workflow logic lives
//! in the engine.

mod models;
mod routes;
mod server;

use std::sync::Arc;

use crate::Engine;

pub use models::*;
pub use routes::create_router;
pub use server::serve;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
        }
    }
}

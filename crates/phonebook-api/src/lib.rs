//! phonebook-api — REST API for the phonebook service.
//!
//! Maps a phone number to a single mailing address. Requests are validated
//! here, domain rules live in [`PhoneService`], and storage goes through a
//! [`KeyValueStore`] handed in by the caller.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/phones/{phone}` | Get the address of a phone |
//! | POST | `/phones` | Register a phone with an address |
//! | PUT | `/phones/{phone}` | Replace the address of a phone |
//! | DELETE | `/phones/{phone}` | Remove a phone |
//! | GET | `/health` | Store liveness (`{"redis": bool}`) |

pub mod error;
pub mod handlers;
pub mod schemas;
pub mod service;

use axum::Router;
use axum::routing::{get, post};
use phonebook_store::{KeyValueStore, PhoneRepository};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ServiceError, ServiceResult};
pub use service::PhoneService;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState<S> {
    pub service: PhoneService<S>,
}

impl<S: KeyValueStore> ApiState<S> {
    /// Wire store → repository → service.
    pub fn new(store: S) -> Self {
        Self {
            service: PhoneService::new(PhoneRepository::new(store)),
        }
    }
}

/// Build the complete API router over `store`.
pub fn build_router<S: KeyValueStore>(store: S) -> Router {
    Router::new()
        .route("/phones", post(handlers::create_phone::<S>))
        .route(
            "/phones/{phone}",
            get(handlers::get_address::<S>)
                .put(handlers::update_address::<S>)
                .delete(handlers::delete_phone::<S>),
        )
        .route("/health", get(handlers::health::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(ApiState::new(store))
}

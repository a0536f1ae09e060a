//! API routes module
//!
//! `/users` and `/admins` expose the same CRUD surface; only `/users` is metered.

pub mod health;

use axum::{Router, middleware, routing::get};
use domain_accounts::{Admin, MongoStorage, User, handlers};
use observability::{metrics_handler, metrics_middleware};

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let collections = &state.config.collections;

    let users = handlers::router::<User, _>(MongoStorage::<User>::with_collection(
        &state.db,
        &collections.users,
    ))
    .route_layer(middleware::from_fn(metrics_middleware));

    let admins = handlers::router::<Admin, _>(MongoStorage::<Admin>::with_collection(
        &state.db,
        &collections.admins,
    ));

    Router::new()
        .nest("/users", users)
        .nest("/admins", admins)
        .route("/metrics", get(metrics_handler))
        .merge(health::router(state.clone()))
}

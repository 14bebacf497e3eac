//! Route assembly.

mod common;
mod resource;

pub use common::common_routes;
pub use resource::{api_routes, resource_routes, route_table, Operation, RouteEntry, API_PREFIX};

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application: common routes at the root, resources under [`API_PREFIX`].
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest(API_PREFIX, api_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
}

//! assetdesk: resource CRUD API for an asset and session management backend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod resource;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Settings, StoreBackend};
pub use error::{AppError, ConfigError};
pub use pagination::Paginator;
pub use resource::{ObjectKey, Resource, ResourceKind, KINDS};
pub use response::Envelope;
pub use routes::{api_routes, app, common_routes, route_table};
pub use service::Objects;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_object_tables, MemoryStore, ObjectStore, PgStore};

//! Router table: five operations per resource kind, one route each.

use crate::handlers::resource;
use crate::resource::{
    Asset, Case, Consultation, Doctor, FederalLearning, Hospital, Machine, Patient, Provider, Record, Resource,
    ResourceKind, Session, KINDS,
};
use crate::state::AppState;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};

pub const API_PREFIX: &str = "/api";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Update,
    Add,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Get,
        Operation::Update,
        Operation::Add,
        Operation::Delete,
    ];

    pub fn method(self) -> Method {
        match self {
            Operation::List | Operation::Get => Method::GET,
            Operation::Update | Operation::Add | Operation::Delete => Method::POST,
        }
    }

    /// Path relative to [`API_PREFIX`].
    pub fn path(self, kind: &ResourceKind) -> String {
        match self {
            Operation::List => format!("/get-{}", kind.plural),
            Operation::Get => format!("/get-{}", kind.singular),
            Operation::Update => format!("/update-{}", kind.singular),
            Operation::Add => format!("/add-{}", kind.singular),
            Operation::Delete => format!("/delete-{}", kind.singular),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: Method,
    /// Full path including [`API_PREFIX`].
    pub path: String,
    pub kind: ResourceKind,
    pub operation: Operation,
}

pub fn route_table() -> Vec<RouteEntry> {
    KINDS
        .iter()
        .flat_map(|kind| {
            Operation::ALL.into_iter().map(move |operation| RouteEntry {
                method: operation.method(),
                path: format!("{}{}", API_PREFIX, operation.path(kind)),
                kind: *kind,
                operation,
            })
        })
        .collect()
}

/// Registers the five routes of `R` on `router`.
pub fn resource_routes<R: Resource>(router: Router<AppState>) -> Router<AppState> {
    Operation::ALL.into_iter().fold(router, |router, operation| {
        let handler = match operation {
            Operation::List => get(resource::list::<R>),
            Operation::Get => get(resource::get::<R>),
            Operation::Update => post(resource::update::<R>),
            Operation::Add => post(resource::add::<R>),
            Operation::Delete => post(resource::delete::<R>),
        };
        router.route(&operation.path(&R::KIND), handler)
    })
}

/// Every resource route, unprefixed. Mount under [`API_PREFIX`].
pub fn api_routes(state: AppState) -> Router {
    let router = Router::new();
    let router = resource_routes::<Record>(router);
    let router = resource_routes::<Asset>(router);
    let router = resource_routes::<Provider>(router);
    let router = resource_routes::<Machine>(router);
    let router = resource_routes::<Session>(router);
    let router = resource_routes::<Case>(router);
    let router = resource_routes::<Consultation>(router);
    let router = resource_routes::<Doctor>(router);
    let router = resource_routes::<FederalLearning>(router);
    let router = resource_routes::<Hospital>(router);
    let router = resource_routes::<Patient>(router);
    router.with_state(state)
}

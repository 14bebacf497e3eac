//! Generic resource handlers: list, get, update, add, delete.
//!
//! Bodies are taken as raw bytes and parsed here, and query rejections are
//! converted, so malformed input is always answered with the error envelope.

use crate::error::AppError;
use crate::pagination::Paginator;
use crate::resource::Resource;
use crate::response::Envelope;
use crate::service::Objects;
use crate::state::AppState;
use crate::store::{Filter, Sort};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub owner: String,
    pub page_size: String,
    pub p: String,
    pub field: String,
    pub value: String,
    pub sort_field: String,
    pub sort_order: String,
}

impl ListParams {
    fn paginated(&self) -> bool {
        !self.page_size.is_empty() && !self.p.is_empty()
    }

    fn filter(&self) -> Filter {
        Filter {
            owner: self.owner.clone(),
            field: self.field.clone(),
            value: self.value.clone(),
        }
    }

    fn sort(&self) -> Sort {
        Sort {
            field: self.sort_field.clone(),
            order: self.sort_order.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct IdParam {
    #[serde(default)]
    pub id: String,
}

fn to_data<T: Serialize>(data: &T) -> Result<Value, AppError> {
    serde_json::to_value(data).map_err(|e| AppError::Persistence(e.to_string()))
}

fn parse_body<R: Resource>(body: &[u8]) -> Result<R, AppError> {
    Ok(serde_json::from_slice(body)?)
}

/// `GET /get-{plural}`: every record, or one filtered page when `pageSize` and `p` are given.
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Envelope>, AppError> {
    let Query(params) = params?;
    let objects = Objects::<R>::new(state.store.as_ref());
    if !params.paginated() {
        let all = objects.get_all().await?;
        return Ok(Json(Envelope::ok(to_data(&all)?)));
    }

    let filter = params.filter();
    let count = objects.count(&filter).await?;
    let paginator = Paginator::from_query(&params.p, &params.page_size, count);
    tracing::debug!(
        resource = R::KIND.plural,
        count,
        page = paginator.page(),
        offset = paginator.offset(),
        "list page"
    );
    let page = objects
        .get_page(&filter, &params.sort(), paginator.offset(), paginator.page_size())
        .await?;
    Ok(Json(Envelope::ok_with(
        to_data(&page)?,
        Value::from(paginator.total_pages()),
    )))
}

/// `GET /get-{singular}?id=owner/name`: the record, or `data: null`.
pub async fn get<R: Resource>(
    State(state): State<AppState>,
    params: Result<Query<IdParam>, QueryRejection>,
) -> Result<Json<Envelope>, AppError> {
    let Query(params) = params?;
    let object = Objects::<R>::new(state.store.as_ref()).get(&params.id).await?;
    Ok(Json(Envelope::ok(to_data(&object)?)))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    params: Result<Query<IdParam>, QueryRejection>,
    body: Bytes,
) -> Result<Json<Envelope>, AppError> {
    let Query(params) = params?;
    let object: R = parse_body(&body)?;
    let affected = Objects::<R>::new(state.store.as_ref())
        .update(&params.id, &object)
        .await?;
    Ok(Json(Envelope::action(affected)))
}

pub async fn add<R: Resource>(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, AppError> {
    let object: R = parse_body(&body)?;
    let affected = Objects::<R>::new(state.store.as_ref()).add(object).await?;
    Ok(Json(Envelope::action(affected)))
}

pub async fn delete<R: Resource>(State(state): State<AppState>, body: Bytes) -> Result<Json<Envelope>, AppError> {
    let object: R = parse_body(&body)?;
    let affected = Objects::<R>::new(state.store.as_ref()).delete(&object).await?;
    Ok(Json(Envelope::action(affected)))
}

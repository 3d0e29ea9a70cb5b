//! Create/read/update/delete/echo handlers for `api/categories`

use serde_json::Value;

use crate::domain::utils::position_from_path;
use crate::errors::AppError;
use crate::protocol::{Request, Response, StatusCode};
use crate::store::CategoryStore;

fn body_name(request: &Request) -> String {
    request
        .body
        .as_ref()
        .and_then(|body| body.name.clone())
        .unwrap_or_default()
}

fn require_position(request: &Request) -> Result<i64, AppError> {
    position_from_path(request.path()).ok_or_else(|| AppError::bad_request("missing id"))
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|err| AppError::internal(format!("failed to encode categories: {err}")))
}

pub async fn create(store: &dyn CategoryStore, request: &Request) -> Result<Response, AppError> {
    let category = store.create(body_name(request)).await?;
    tracing::debug!(cid = category.cid, name = %category.name, "category created");
    Ok(Response::new(StatusCode::Created).with_body("Created"))
}

pub async fn read(store: &dyn CategoryStore, request: &Request) -> Result<Response, AppError> {
    let body = match position_from_path(request.path()) {
        Some(position) => to_body(&store.get(position).await?)?,
        None => to_body(&store.list().await)?,
    };
    Ok(Response::new(StatusCode::Ok).with_body(body))
}

pub async fn update(store: &dyn CategoryStore, request: &Request) -> Result<Response, AppError> {
    let position = require_position(request)?;
    let category = store.update(position, body_name(request)).await?;
    Ok(Response::new(StatusCode::Updated).with_body(to_body(&category)?))
}

pub async fn delete(store: &dyn CategoryStore, request: &Request) -> Result<Response, AppError> {
    let position = require_position(request)?;
    let removed = store.delete(position).await?;
    tracing::debug!(cid = removed.cid, name = %removed.name, "category deleted");
    Ok(Response::new(StatusCode::Ok))
}

pub fn echo(request: &Request) -> Response {
    let text = request
        .body
        .as_ref()
        .map(|body| body.render())
        .unwrap_or_default();
    Response::new(StatusCode::Ok).with_body(text)
}

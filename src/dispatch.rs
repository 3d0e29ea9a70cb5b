//! Request processing state machine
//!
//! Decodes a raw payload, runs the structural checks, and routes the request to
//! the category handler named by its method. Every path ends in exactly one
//! response.

use tracing::info;

use crate::domain::categories;
use crate::protocol::{validation, Request, Response, StatusCode};
use crate::AppState;

pub async fn handle_payload(state: &AppState, payload: &[u8]) -> Response {
    match Request::decode(payload) {
        Ok(request) => handle_request(state, &request).await,
        Err(err) => err.into_response(),
    }
}

pub async fn handle_request(state: &AppState, request: &Request) -> Response {
    if let Err(failure) = validation::validate(request) {
        return Response::status_only(failure.status_line());
    }

    let store = state.store.as_ref();
    let outcome = match request.method() {
        "create" => categories::create(store, request).await,
        "read" => categories::read(store, request).await,
        "update" => categories::update(store, request).await,
        "delete" => categories::delete(store, request).await,
        "echo" => Ok(categories::echo(request)),
        _ => Ok(Response::status_only(format!(
            "{} illegal method",
            StatusCode::BadRequest
        ))),
    };
    let response = outcome.unwrap_or_else(|err| err.into_response());

    info!(
        method = request.method(),
        path = request.path(),
        status = %response.status,
        "cjtp action audited"
    );

    response
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use serde_json::json;

    use super::*;
    use crate::store::{CategoryStore, InMemoryCategoryStore};

    fn state() -> AppState {
        AppState::new(
            Arc::new(InMemoryCategoryStore::seeded()),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn create_against_seeded_store() {
        let state = state();
        let response = handle_payload(
            &state,
            br#"{"method":"create","path":"api/categories","date":"1700000000","body":{"name":"Dairy"}}"#,
        )
        .await;

        assert_eq!(response, Response::new(StatusCode::Created).with_body("Created"));
        assert_eq!(state.store.len().await, 4);
        assert_eq!(state.store.get(4).await.expect("new category").cid, 4);
    }

    #[tokio::test]
    async fn create_accepts_whitespace_name() {
        let state = state();
        let response = handle_payload(
            &state,
            br#"{"method":"create","path":"api/categories","date":"1700000000","body":{"name":" "}}"#,
        )
        .await;

        assert_eq!(response.status, "2 Created");
        assert_eq!(state.store.len().await, 4);
    }

    #[tokio::test]
    async fn read_single_against_seeded_store() {
        let response = handle_payload(
            &state(),
            br#"{"method":"read","path":"api/categories/2","date":"1700000000"}"#,
        )
        .await;

        assert_eq!(response.status, "1 OK");
        assert_eq!(response.body, Some(json!({"cid": 2, "name": "Condiments"})));
    }

    #[tokio::test]
    async fn unknown_method_is_illegal() {
        let response = handle_payload(
            &state(),
            br#"{"method":"zzz","path":"api/categories","date":"1700000000"}"#,
        )
        .await;

        assert_eq!(response, Response::status_only("4 BadRequest illegal method"));
    }

    #[tokio::test]
    async fn validation_failures_skip_dispatch() {
        let state = state();
        let response = handle_payload(
            &state,
            br#"{"method":"create","path":"api/categories","body":{"name":"Dairy"}}"#,
        )
        .await;

        assert_eq!(response.status, "4 BadRequest missing date");
        assert!(response.body.is_none());
        assert_eq!(state.store.len().await, 3);
    }

    #[tokio::test]
    async fn empty_object_reports_all_violations() {
        let response = handle_payload(&state(), b"{}").await;
        assert_eq!(
            response.status,
            "4 BadRequest missing method 4 BadRequest missing resource 4 BadRequest missing date"
        );
    }

    #[tokio::test]
    async fn malformed_payload_is_illegal_body() {
        let response = handle_payload(&state(), br#"{"method":"read","path":"api/cat"#).await;
        assert_eq!(response, Response::status_only("4 BadRequest illegal body"));
    }

    #[tokio::test]
    async fn echo_round_trips_body() {
        let response = handle_payload(
            &state(),
            br#"{"method":"echo","date":"1700000000","body":{"cid":"7","name":"x"}}"#,
        )
        .await;

        assert_eq!(response.status_code(), Some(StatusCode::Ok));
        assert_eq!(response.body, Some(json!(r#"{"cid":"7","name":"x"}"#)));
    }

    #[tokio::test]
    async fn delete_then_read_shifts_positions() {
        let state = state();
        let deleted = handle_request(&state, &Request::new("delete", "api/categories/1", "1")).await;
        assert_eq!(deleted.status, "1 OK");

        let listed = handle_request(&state, &Request::new("read", "api/categories", "1")).await;
        assert_eq!(
            listed.body,
            Some(json!([
                {"cid": 1, "name": "Condiments"},
                {"cid": 2, "name": "Confections"}
            ]))
        );
    }
}

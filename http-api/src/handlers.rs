use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use postfeed_core::{
    CoreError, FeedFilter, FeedPage, FeedRequest, NewPost, Post, PostStore, MAX_PAGE_SIZE,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_post<S: PostStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let Json(new_post) =
        payload.map_err(|e| ApiError::bad_request("INVALID_BODY", e.body_text()))?;

    let new_post = new_post.normalized();
    new_post.validate()?;

    let post = with_timeout(state.request_timeout, state.submissions.submit(new_post))
        .await
        .map_err(|e| ApiError::from_core(e, "failed to create post"))?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn feed<S: PostStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<FeedPage>, ApiError> {
    let offset = parse_param(&params, "offset")?.unwrap_or(0);
    let limit = parse_param(&params, "limit")?.unwrap_or(state.items_per_page());
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ApiError::bad_request(
            "INVALID_LIMIT",
            format!("limit must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }

    let request = FeedRequest {
        offset,
        limit,
        filter: FeedFilter::from_params(&params),
    };
    debug!("Feed request: {:?}", request);

    let page = with_timeout(state.request_timeout, state.feed.assemble(&request))
        .await
        .map_err(|e| ApiError::from_core(e, "failed to load feed"))?;

    Ok(Json(page))
}

fn parse_param(params: &HashMap<String, String>, key: &str) -> Result<Option<u64>, ApiError> {
    match params.get(key).map(|value| value.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            ApiError::bad_request(
                "INVALID_QUERY",
                format!("{} must be a non-negative integer", key),
            )
        }),
    }
}

async fn with_timeout<T>(
    limit: Duration,
    operation: impl Future<Output = Result<T, CoreError>>,
) -> Result<T, CoreError> {
    tokio::time::timeout(limit, operation)
        .await
        .unwrap_or_else(|_| {
            Err(CoreError::Timeout {
                seconds: limit.as_secs(),
            })
        })
}

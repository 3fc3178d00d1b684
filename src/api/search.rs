use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{error::Error, management::TokenManager, server::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<SearchParams>,
) -> Response {
    let session = state.sessions.get_session(&jar);
    let Some(mut tokens) = TokenManager::new(state.spotify.clone(), session) else {
        return json_error(StatusCode::UNAUTHORIZED, "Unauthorized");
    };

    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Query parameter required");
    };

    let client = &state.spotify;
    let query = query.as_str();
    match tokens
        .with_token(|token| async move { client.search(&token, query).await })
        .await
    {
        Ok(results) => (tokens.apply(&state.sessions, jar), Json(results)).into_response(),
        Err(Error::SessionExpired) => (
            state.sessions.clear_session(jar),
            json_error(StatusCode::UNAUTHORIZED, "Unauthorized"),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.api_kind(), "search failed");
            (
                tokens.apply(&state.sessions, jar),
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Search failed"),
            )
                .into_response()
        }
    }
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

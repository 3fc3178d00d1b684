use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    management::{self, StateCheck},
    server::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    signed: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    let (signed, csrf_state) = management::issue_state(signed, state.config.production);
    let auth_url = state.spotify.get_auth_url(&csrf_state);

    (signed, Redirect::to(&auth_url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    signed: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> (SignedCookieJar, CookieJar, Redirect) {
    let (signed, check) = management::verify_state(signed, params.state.as_deref());

    let code = match (&params.error, params.code) {
        (None, Some(code)) if !code.is_empty() => code,
        (error, _) => {
            tracing::warn!(
                error = error.as_deref().unwrap_or("missing_code"),
                "authorization denied"
            );
            return (signed, jar, error_redirect("auth_failed"));
        }
    };

    if check != StateCheck::Valid {
        tracing::warn!(?check, "OAuth state mismatch");
        return (signed, jar, error_redirect("state_mismatch"));
    }

    let body = match state.spotify.get_access_token(&code).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "token exchange failed");
            return (signed, jar, error_redirect("server_error"));
        }
    };

    let Some(pair) = body.into_credentials(None) else {
        tracing::error!("token response carried no credentials");
        return (signed, jar, error_redirect("token_failed"));
    };

    let jar = state.sessions.set_session(
        jar,
        &pair.access_token,
        &pair.refresh_token,
        pair.expires_in,
    );

    tracing::info!(expires_in = pair.expires_in, "login successful");
    (signed, jar, Redirect::to("/dashboard"))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = state.sessions.clear_session(jar);
    tracing::info!("logged out");
    (jar, Json(json!({ "success": true })))
}

fn error_redirect(code: &str) -> Redirect {
    Redirect::to(&format!("/?error={code}"))
}

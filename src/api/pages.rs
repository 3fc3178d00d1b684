use std::future::Future;

use axum::{
    Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    management::TokenManager,
    server::AppState,
    types::{DashboardSummary, RecentPage, TimeRange, TopArtistsPage, TopTracksPage},
};

/// Tracks whose audio features are shown on the tracks page.
const AUDIO_FEATURE_TRACKS: usize = 20;

#[derive(Debug, Deserialize)]
pub struct LandingParams {
    error: Option<String>,
}

pub async fn landing(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LandingParams>,
) -> Response {
    if state.sessions.get_session(&jar).is_authenticated() {
        return Redirect::to("/dashboard").into_response();
    }

    let notice = match params.error.as_deref() {
        Some(code) => format!(
            "<p class=\"error\">Login failed ({}). Please try again.</p>",
            code.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        ),
        None => String::new(),
    };

    Html(format!(
        "<h2>Spotify Stats Dashboard</h2>\
         <p>Discover your music listening patterns, top artists, and favorite tracks.</p>\
         {notice}<a href=\"/api/auth/login\">Connect with Spotify</a>"
    ))
    .into_response()
}

pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Response {
    let client = &state.spotify;

    render(&state, jar, "dashboard", |token| async move {
        let (profile, top_artists, top_tracks, recent) = tokio::try_join!(
            client.get_profile(&token),
            client.get_top_artists(&token, TimeRange::ShortTerm, 5),
            client.get_top_tracks(&token, TimeRange::ShortTerm, 5),
            client.get_recently_played(&token, 5),
        )?;

        Ok(DashboardSummary {
            profile,
            top_artists: top_artists.items,
            top_tracks: top_tracks.items,
            recently_played: recent.items,
        })
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    range: Option<String>,
}

impl RangeParams {
    fn time_range(&self) -> TimeRange {
        self.range
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or_default()
    }
}

pub async fn top_artists(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RangeParams>,
) -> Response {
    let client = &state.spotify;
    let time_range = params.time_range();

    render(&state, jar, "artists", |token| async move {
        let (profile, artists) = tokio::try_join!(
            client.get_profile(&token),
            client.get_top_artists(&token, time_range, 50),
        )?;

        Ok(TopArtistsPage {
            profile,
            time_range,
            artists: artists.items,
        })
    })
    .await
}

pub async fn top_tracks(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RangeParams>,
) -> Response {
    let client = &state.spotify;
    let time_range = params.time_range();

    render(&state, jar, "tracks", |token| async move {
        let (profile, tracks) = tokio::try_join!(
            client.get_profile(&token),
            client.get_top_tracks(&token, time_range, 50),
        )?;

        let audio_features = {
            let ids: Vec<&str> = tracks
                .items
                .iter()
                .take(AUDIO_FEATURE_TRACKS)
                .filter_map(|t| t.id.as_deref())
                .collect();
            client.get_audio_features(&token, &ids).await?
        };

        Ok(TopTracksPage {
            profile,
            time_range,
            tracks: tracks.items,
            audio_features,
        })
    })
    .await
}

pub async fn recent(State(state): State<AppState>, jar: CookieJar) -> Response {
    let client = &state.spotify;

    render(&state, jar, "recent", |token| async move {
        let (profile, recent) = tokio::try_join!(
            client.get_profile(&token),
            client.get_recently_played(&token, 50),
        )?;

        Ok(RecentPage {
            profile,
            items: recent.items,
        })
    })
    .await
}

/// Loads the data of one page with the session's access token.
///
/// - no session: redirect to `/`
/// - refresh token rejected: session cleared, redirect to `/`
/// - any other failure: redirect to `/?error=api_failed`
///
/// Refreshed credentials are written back on every outcome but the first two.
async fn render<T, F, Fut>(
    state: &AppState,
    jar: CookieJar,
    page: &'static str,
    load: F,
) -> Response
where
    T: Serialize,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let session = state.sessions.get_session(&jar);
    let Some(mut tokens) = TokenManager::new(state.spotify.clone(), session) else {
        return Redirect::to("/").into_response();
    };

    match tokens.with_token(load).await {
        Ok(data) => (tokens.apply(&state.sessions, jar), Json(data)).into_response(),
        Err(Error::SessionExpired) => {
            (state.sessions.clear_session(jar), Redirect::to("/")).into_response()
        }
        Err(e) => {
            tracing::error!(page, error = %e, kind = ?e.api_kind(), "failed to load page data");
            (
                tokens.apply(&state.sessions, jar),
                Redirect::to("/?error=api_failed"),
            )
                .into_response()
        }
    }
}

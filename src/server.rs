use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::{
    api,
    config::Config,
    error::{Error, Result},
    management::SessionStore,
    spotify::SpotifyClient,
    utils,
};

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: SpotifyClient,
    pub sessions: SessionStore,
    cookie_key: Key,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cookie_key = utils::derive_cookie_key(config.signing_secret());
        let sessions = SessionStore::new(config.production);
        let config = Arc::new(config);

        Self {
            spotify: SpotifyClient::new(Arc::clone(&config)),
            config,
            sessions,
            cookie_key,
        }
    }
}

// SignedCookieJar extracts its key from the state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::landing))
        .route("/health", get(api::health))
        .route("/api/auth/login", get(api::login))
        .route("/api/auth/callback", get(api::callback))
        .route("/api/auth/logout", post(api::logout))
        .route("/api/search", get(api::search))
        .route("/dashboard", get(api::dashboard))
        .route("/artists", get(api::top_artists))
        .route("/tracks", get(api::top_tracks))
        .route("/recent", get(api::recent))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
///
/// # Errors
///
/// Fails if the address cannot be parsed or bound.
pub async fn start_api_server(config: Config) -> Result<()> {
    let addr = SocketAddr::from_str(&config.server_address).map_err(|e| {
        Error::Config(format!(
            "invalid SERVER_ADDRESS {}: {}",
            config.server_address, e
        ))
    })?;

    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

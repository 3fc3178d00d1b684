//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. It covers both of
//! Spotify's services:
//!
//! ```text
//! Request handlers (api)
//!          ↓
//! Spotify Integration Layer
//!     ├── Token Exchange (accounts service, OAuth 2.0 authorization code)
//!     ├── Authorized API Proxy (Web API, bearer token)
//!     └── Listening statistics (typed Web API endpoints)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Authorization code flow against the accounts service:
//! - **Authorization URL**: Builds the consent-screen URL with the fixed scope list
//! - **Code Exchange**: Trades the callback `code` for an access/refresh token pair
//! - **Refresh**: Trades a refresh token for a new access token
//!
//! Both exchanges authenticate with HTTP Basic (`client_id:client_secret`)
//! and hand the token endpoint's body back unchanged. Interpreting it is up
//! to the caller.
//!
//! ### API Proxy Module
//!
//! [`api`] - A single GET chokepoint that attaches the bearer token and
//! maps every failure onto [`ApiErrorKind`](crate::error::ApiErrorKind).
//!
//! ### Statistics Module
//!
//! [`stats`] - Typed wrappers for the endpoints the dashboard uses:
//! - `GET /me` - Profile
//! - `GET /me/top/{artists,tracks}` - Top items per time range
//! - `GET /me/player/recently-played` - Listening history
//! - `GET /audio-features` - Audio features for a batch of tracks
//! - `GET /search` - Track, artist and album search
//!
//! ## Error Handling
//!
//! Nothing here retries. Token exchange only fails on transport errors,
//! API calls fail with a classified [`Error::Api`](crate::error::Error::Api).
//! Recovering from an expired token is the job of
//! [`TokenManager`](crate::management::TokenManager).

pub mod api;
pub mod auth;
pub mod stats;

use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;

/// Handle to the accounts service and the Web API.
///
/// Cheap to clone; the underlying connection pool and configuration are
/// shared.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
}

impl SpotifyClient {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

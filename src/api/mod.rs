//! # API Module
//!
//! HTTP endpoints of the Spotify Stats server, built on
//! [Axum](https://docs.rs/axum). Every handler receives the shared
//! [`AppState`](crate::server::AppState) and the request's cookie jar.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `GET /api/auth/login`: issues the CSRF state cookie and
//!   redirects to Spotify's consent screen
//! - [`callback`] - `GET /api/auth/callback`: verifies the state, exchanges the
//!   authorization code and stores the session cookies
//! - [`logout`] - `POST /api/auth/logout`: clears the session cookies
//!
//! ### Page data
//!
//! - [`landing`] - `GET /`: login link, or redirect to the dashboard when
//!   logged in
//! - [`dashboard`], [`top_artists`], [`top_tracks`], [`recent`] - JSON data
//!   for the dashboard pages. Without a session they redirect to `/`, on any
//!   API failure to `/?error=api_failed`.
//!
//! ### Search
//!
//! - [`search`] - `GET /api/search?q=`: JSON API with status codes instead of
//!   redirects
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`: status and version
//!
//! ## Error Reporting
//!
//! Handlers never show error details to the browser. Failures are logged
//! with `tracing` and turned into a redirect carrying a short error code
//! (`auth_failed`, `state_mismatch`, `token_failed`, `server_error`,
//! `api_failed`).

mod auth;
mod health;
mod pages;
mod search;

pub use auth::{callback, login, logout};
pub use health::health;
pub use pages::{dashboard, landing, recent, top_artists, top_tracks};
pub use search::search;

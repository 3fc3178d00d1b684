//! Configuration management for the Spotify Stats server.
//!
//! Configuration is read from the environment exactly once at startup and
//! captured in an immutable [`Config`] that is shared by reference with the
//! token exchange client and the request handlers.
//!
//! Values are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory (`spotify-stats/.env`)
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/api/auth/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from `.env` files.
///
/// The working directory is consulted first, then the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/spotify-stats/.env`
/// - macOS: `~/Library/Application Support/spotify-stats/.env`
/// - Windows: `%LOCALAPPDATA%/spotify-stats/.env`
///
/// Missing files are not an error; variables already present in the process
/// environment are never overwritten.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env from working directory");
    }

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded .env from data directory");
    }

    Ok(())
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotify-stats/.env");
    path
}

/// Process-wide, read-only settings.
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_address: String,
    /// Marks session cookies `Secure`. Off for local development.
    pub production: bool,
    /// Secret the CSRF state cookie is signed with. Falls back to the client
    /// secret when unset.
    pub cookie_secret: Option<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("server_address", &self.server_address)
            .field("production", &self.production)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Creates a configuration with the two required credentials and
    /// defaults for everything else.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            production: false,
            cookie_secret: None,
            auth_url: SPOTIFY_AUTH_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            api_url: SPOTIFY_API_URL.to_string(),
        }
    }

    /// Builds the configuration from environment variables.
    ///
    /// # Required env vars
    /// - `SPOTIFY_CLIENT_ID`
    /// - `SPOTIFY_CLIENT_SECRET`
    ///
    /// # Optional env vars
    /// - `SPOTIFY_REDIRECT_URI` (default [`DEFAULT_REDIRECT_URI`])
    /// - `SERVER_ADDRESS` (default [`DEFAULT_SERVER_ADDRESS`])
    /// - `APP_ENV`: `production` enables secure cookies
    /// - `COOKIE_SECRET`
    /// - `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL`, `SPOTIFY_API_URL`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or empty.
    pub fn from_env() -> Result<Self> {
        let client_id = required("SPOTIFY_CLIENT_ID")?;
        let client_secret = required("SPOTIFY_CLIENT_SECRET")?;

        let mut config = Self::new(client_id, client_secret)
            .with_production(matches!(env::var("APP_ENV").as_deref(), Ok("production")));

        if let Some(uri) = optional("SPOTIFY_REDIRECT_URI") {
            config = config.with_redirect_uri(uri);
        }
        if let Some(addr) = optional("SERVER_ADDRESS") {
            config = config.with_server_address(addr);
        }
        if let Some(secret) = optional("COOKIE_SECRET") {
            config = config.with_cookie_secret(secret);
        }
        if let Some(url) = optional("SPOTIFY_AUTH_URL") {
            config.auth_url = url;
        }
        if let Some(url) = optional("SPOTIFY_TOKEN_URL") {
            config.token_url = url;
        }
        if let Some(url) = optional("SPOTIFY_API_URL") {
            config.api_url = url;
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    #[must_use]
    pub fn with_server_address(mut self, addr: impl Into<String>) -> Self {
        self.server_address = addr.into();
        self
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub fn with_cookie_secret(mut self, secret: impl Into<String>) -> Self {
        self.cookie_secret = Some(secret.into());
        self
    }

    /// Points the accounts service endpoints at another base URL,
    /// e.g. a mock server in tests.
    #[must_use]
    pub fn with_accounts_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.auth_url = format!("{base}/authorize");
        self.token_url = format!("{base}/api/token");
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// The secret the signed-cookie key is derived from.
    pub fn signing_secret(&self) -> &str {
        self.cookie_secret.as_deref().unwrap_or(&self.client_secret)
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| Error::Config(format!("{name} must be set")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

//! Error types shared by the token exchange client, the API proxy and the
//! request handlers.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a failed call to the Spotify Web API.
///
/// Lets callers react to the kind of failure (e.g. refresh the session on
/// [`ApiErrorKind::Unauthorized`]) without inspecting raw status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401: the access token is expired or revoked.
    Unauthorized,
    /// 429: the application hit Spotify's rate limit.
    RateLimited,
    /// 5xx: Spotify itself failed.
    UpstreamUnavailable,
    /// The request never produced an HTTP response.
    NetworkFailure,
    /// Any other non-success status (400, 403, 404, ...). A 403 means a
    /// missing scope or a resource the app may not access, which a new
    /// token does not change.
    Rejected,
}

impl ApiErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => ApiErrorKind::RateLimited,
            s if s.is_server_error() => ApiErrorKind::UpstreamUnavailable,
            _ => ApiErrorKind::Rejected,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::RateLimited => "rate_limited",
            ApiErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ApiErrorKind::NetworkFailure => "network_failure",
            ApiErrorKind::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or decoding failure while talking to the accounts service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Spotify Web API answered with a non-success status, or could not
    /// be reached at all. A success body that does not decode is reported
    /// as [`Error::Http`].
    #[error("Spotify API error: {status_text}")]
    Api {
        kind: ApiErrorKind,
        status: Option<u16>,
        status_text: String,
    },

    /// The refresh token was rejected; the user has to log in again.
    #[error("Session expired")]
    SessionExpired,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn api_status(status: StatusCode) -> Self {
        Error::Api {
            kind: ApiErrorKind::from_status(status),
            status: Some(status.as_u16()),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        Error::Api {
            kind: ApiErrorKind::NetworkFailure,
            status: None,
            status_text: err.to_string(),
        }
    }

    /// Returns the API error kind, if this error came from the API proxy.
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use reqwest::header::AUTHORIZATION;
use url::Url;

use crate::{error::Result, types::TokenResponse, utils};

use super::SpotifyClient;

/// Read-only scopes requested on every login.
pub const SCOPES: [&str; 5] = [
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "user-read-recently-played",
    "user-follow-read",
];

impl SpotifyClient {
    /// Builds the URL of Spotify's consent screen.
    ///
    /// The result depends only on the configuration and `state`: client id,
    /// redirect URI, `response_type=code` and the space-joined [`SCOPES`].
    /// `state` is the one-time CSRF value the callback must echo back.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.get_auth_url(&utils::generate_state());
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn get_auth_url(&self, state: &str) -> String {
        let config = self.config();
        let scope = SCOPES.join(" ");
        let params: [(&str, &str); 5] = [
            ("client_id", &config.client_id),
            ("response_type", "code"),
            ("redirect_uri", &config.redirect_uri),
            ("scope", &scope),
            ("state", state),
        ];

        match Url::parse_with_params(&config.auth_url, &params) {
            Ok(url) => url.to_string(),
            // auth_url is not a valid absolute URL; still produce a usable
            // redirect target with the same query string
            Err(_) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(params)
                    .finish();
                format!("{}?{}", config.auth_url, query)
            }
        }
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// Issues exactly one POST with `grant_type=authorization_code`. The
    /// parsed body is returned whether or not it contains tokens: an invalid
    /// or already used code yields `Ok` with `error` set and no
    /// `access_token`.
    ///
    /// # Errors
    ///
    /// Fails only if the request cannot be sent or the body is not JSON.
    pub async fn get_access_token(&self, code: &str) -> Result<TokenResponse> {
        let redirect_uri = self.config().redirect_uri.as_str();
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Same contract as [`get_access_token`](Self::get_access_token). The
    /// response may omit `refresh_token`, in which case the old one stays
    /// valid.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let config = self.config();
        let grant_type = form
            .iter()
            .find(|(k, _)| *k == "grant_type")
            .map(|(_, v)| *v)
            .unwrap_or_default();

        tracing::debug!(grant_type, url = %config.token_url, "requesting token");

        let res = self
            .http
            .post(&config.token_url)
            .header(
                AUTHORIZATION,
                utils::basic_auth_header(&config.client_id, &config.client_secret),
            )
            .form(form)
            .send()
            .await?;

        let status = res.status();
        let body: TokenResponse = res.json().await?;

        if let Some(error) = &body.error {
            tracing::warn!(
                grant_type,
                status = status.as_u16(),
                error = %error,
                description = body.error_description.as_deref().unwrap_or_default(),
                "token endpoint returned an error"
            );
        }

        Ok(body)
    }
}

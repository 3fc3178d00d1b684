use std::future::Future;

use axum_extra::extract::CookieJar;

use crate::{
    error::{Error, Result},
    spotify::SpotifyClient,
    types::{CredentialPair, SessionRecord},
};

use super::SessionStore;

/// Keeps a request supplied with a usable access token.
///
/// Built from the session cookies at the start of a request. The access
/// token is refreshed when its cookie has already lapsed, or once when the
/// Web API rejects it as unauthorized. Refreshed credentials are written
/// back with [`apply`](Self::apply).
pub struct TokenManager {
    client: SpotifyClient,
    access_token: Option<String>,
    refresh_token: Option<String>,
    refreshed: Option<CredentialPair>,
}

impl TokenManager {
    /// Returns `None` when the request carries no session at all.
    pub fn new(client: SpotifyClient, session: SessionRecord) -> Option<Self> {
        if !session.is_authenticated() {
            return None;
        }

        Some(Self {
            client,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            refreshed: None,
        })
    }

    /// Current access token, refreshing first if only the refresh token is
    /// left.
    ///
    /// # Errors
    ///
    /// [`Error::SessionExpired`] if the refresh token is rejected, or any
    /// transport error from the token endpoint.
    pub async fn get_valid_token(&mut self) -> Result<String> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }

        self.refresh().await
    }

    /// Runs `call` with a valid access token.
    ///
    /// If it fails with an unauthorized error and the token has not been
    /// refreshed during this request yet, the token is refreshed and `call`
    /// runs a second time. Other errors are returned as-is.
    pub async fn with_token<T, F, Fut>(&mut self, call: F) -> Result<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.get_valid_token().await?;

        match call(token).await {
            Err(e) if e.is_unauthorized() && self.can_refresh() => {
                tracing::info!("access token rejected, refreshing");
                let token = self.refresh().await?;
                call(token).await
            }
            res => res,
        }
    }

    /// Writes refreshed credentials, if any, into the response cookies.
    pub fn apply(&self, store: &SessionStore, jar: CookieJar) -> CookieJar {
        match &self.refreshed {
            Some(pair) => store.set_session(
                jar,
                &pair.access_token,
                &pair.refresh_token,
                pair.expires_in,
            ),
            None => jar,
        }
    }

    pub fn refreshed(&self) -> Option<&CredentialPair> {
        self.refreshed.as_ref()
    }

    fn can_refresh(&self) -> bool {
        self.refreshed.is_none() && self.refresh_token.is_some()
    }

    async fn refresh(&mut self) -> Result<String> {
        let Some(refresh_token) = self.refresh_token.clone() else {
            return Err(Error::SessionExpired);
        };

        let res = self.client.refresh_access_token(&refresh_token).await?;
        let Some(pair) = res.into_credentials(Some(&refresh_token)) else {
            tracing::warn!("refresh token rejected, session expired");
            self.access_token = None;
            self.refresh_token = None;
            return Err(Error::SessionExpired);
        };

        tracing::debug!(expires_in = pair.expires_in, "access token refreshed");

        self.access_token = Some(pair.access_token.clone());
        self.refresh_token = Some(pair.refresh_token.clone());
        let token = pair.access_token.clone();
        self.refreshed = Some(pair);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header, method, path},
    };

    use super::*;
    use crate::{config::Config, types::UserProfile};

    async fn setup() -> (MockServer, SpotifyClient) {
        let server = MockServer::start().await;
        let config = Config::new("id", "secret")
            .with_accounts_base(&server.uri())
            .with_api_url(format!("{}/v1", server.uri()));
        (server, SpotifyClient::new(Arc::new(config)))
    }

    fn session(access: Option<&str>, refresh: Option<&str>) -> SessionRecord {
        SessionRecord {
            access_token: access.map(str::to_string),
            refresh_token: refresh.map(str::to_string),
        }
    }

    async fn mount_refresh(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn no_session_means_no_manager() {
        let (_server, client) = setup().await;
        assert!(TokenManager::new(client, SessionRecord::default()).is_none());
    }

    #[tokio::test]
    async fn existing_access_token_is_used_without_refresh() {
        let (_server, client) = setup().await;
        let mut manager = TokenManager::new(client, session(Some("AT"), Some("RT"))).unwrap();

        assert_eq!(manager.get_valid_token().await.unwrap(), "AT");
        assert!(manager.refreshed().is_none());
    }

    #[tokio::test]
    async fn lapsed_access_cookie_triggers_refresh() {
        let (server, client) = setup().await;
        mount_refresh(
            &server,
            json!({"access_token": "AT2", "expires_in": 3600, "token_type": "Bearer"}),
        )
        .await;

        let mut manager = TokenManager::new(client, session(None, Some("RT"))).unwrap();
        assert_eq!(manager.get_valid_token().await.unwrap(), "AT2");

        let pair = manager.refreshed().unwrap();
        assert_eq!(pair.refresh_token, "RT");

        let store = SessionStore::new(false);
        let jar = manager.apply(&store, CookieJar::new());
        let stored = store.get_session(&jar);
        assert_eq!(stored.access_token.as_deref(), Some("AT2"));
        assert_eq!(stored.refresh_token.as_deref(), Some("RT"));
    }

    #[tokio::test]
    async fn rejected_refresh_expires_session() {
        let (server, client) = setup().await;
        mount_refresh(&server, json!({"error": "invalid_grant"})).await;

        let mut manager = TokenManager::new(client, session(None, Some("RT"))).unwrap();
        let err = manager.get_valid_token().await.unwrap_err();
        assert!(matches!(err, Error::SessionExpired));
    }

    #[tokio::test]
    async fn unauthorized_call_is_retried_once_after_refresh() {
        let (server, client) = setup().await;
        mount_refresh(
            &server,
            json!({"access_token": "fresh", "refresh_token": "RT2", "expires_in": 3600}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user1"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut manager =
            TokenManager::new(client.clone(), session(Some("stale"), Some("RT"))).unwrap();
        let calls = AtomicUsize::new(0);
        let client = &client;
        let profile: UserProfile = manager
            .with_token(|token| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { client.get_profile(&token).await }
            })
            .await
            .unwrap();

        assert_eq!(profile.id, "user1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(manager.refreshed().unwrap().refresh_token, "RT2");
    }

    #[tokio::test]
    async fn unauthorized_without_refresh_token_is_returned() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut manager = TokenManager::new(client.clone(), session(Some("stale"), None)).unwrap();
        let client = &client;
        let err = manager
            .with_token(|token| async move { client.get_profile(&token).await })
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let (server, client) = setup().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut manager =
            TokenManager::new(client.clone(), session(Some("AT"), Some("RT"))).unwrap();
        let client = &client;
        let err = manager
            .with_token(|token| async move { client.get_profile(&token).await })
            .await
            .unwrap_err();

        assert!(!err.is_unauthorized());
        assert!(manager.refreshed().is_none());
    }
}

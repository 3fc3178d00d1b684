use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use time::Duration;

use crate::types::SessionRecord;

pub const ACCESS_TOKEN_COOKIE: &str = "spotify_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "spotify_refresh_token";

/// Refresh-token cookie lifetime, independent of the access token's.
pub const REFRESH_TOKEN_MAX_AGE: Duration = Duration::days(30);

/// Cookie-backed storage of the credential pair for one browser.
///
/// Holds no state of its own; every operation works on the request's
/// [`CookieJar`] and returns the jar that has to go out with the response.
#[derive(Debug, Clone, Copy)]
pub struct SessionStore {
    secure: bool,
}

impl SessionStore {
    /// `secure` marks the cookies `Secure`; keep it off for plain-HTTP
    /// local development.
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Reads the session. Missing (or emptied) cookies come back as `None`.
    pub fn get_session(&self, jar: &CookieJar) -> SessionRecord {
        SessionRecord {
            access_token: cookie_value(jar, ACCESS_TOKEN_COOKIE),
            refresh_token: cookie_value(jar, REFRESH_TOKEN_COOKIE),
        }
    }

    /// Stores a freshly obtained token pair.
    ///
    /// The access-token cookie lives exactly `expires_in` seconds so it
    /// lapses together with the token; the refresh-token cookie lives
    /// [`REFRESH_TOKEN_MAX_AGE`].
    pub fn set_session(
        &self,
        jar: CookieJar,
        access_token: &str,
        refresh_token: &str,
        expires_in: u64,
    ) -> CookieJar {
        let expires_in = i64::try_from(expires_in).unwrap_or(i64::MAX);

        jar.add(self.cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            Duration::seconds(expires_in),
        ))
        .add(self.cookie(REFRESH_TOKEN_COOKIE, refresh_token, REFRESH_TOKEN_MAX_AGE))
    }

    /// Deletes both cookies. Safe to call without a session.
    pub fn clear_session(&self, jar: CookieJar) -> CookieJar {
        jar.remove(removal_cookie(ACCESS_TOKEN_COOKIE))
            .remove(removal_cookie(REFRESH_TOKEN_COOKIE))
    }

    fn cookie(&self, name: &'static str, value: &str, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value.to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{
            HeaderMap, HeaderValue,
            header::{COOKIE, SET_COOKIE},
        },
        response::IntoResponse,
    };

    use super::*;

    fn request_jar(cookies: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookies).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn empty_jar_has_no_session() {
        let store = SessionStore::new(false);
        let session = store.get_session(&CookieJar::new());

        assert_eq!(session, SessionRecord::default());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = SessionStore::new(false);
        let jar = store.set_session(CookieJar::new(), "token", "refresh", 3600);

        let session = store.get_session(&jar);
        assert_eq!(session.access_token.as_deref(), Some("token"));
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn cookie_lifetimes_follow_token_lifetimes() {
        let store = SessionStore::new(false);
        let jar = store.set_session(CookieJar::new(), "token", "refresh", 3600);

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.max_age(), Some(Duration::seconds(3600)));
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.path(), Some("/"));
        assert_ne!(access.secure(), Some(true));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.max_age(), Some(Duration::seconds(2_592_000)));
    }

    #[test]
    fn production_cookies_are_secure() {
        let store = SessionStore::new(true);
        let jar = store.set_session(CookieJar::new(), "token", "refresh", 60);

        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().secure(), Some(true));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().secure(), Some(true));
    }

    #[test]
    fn clear_removes_session_and_is_idempotent() {
        let store = SessionStore::new(false);
        let jar = store.set_session(CookieJar::new(), "token", "refresh", 3600);

        let jar = store.clear_session(jar);
        assert_eq!(store.get_session(&jar), SessionRecord::default());

        let jar = store.clear_session(jar);
        assert_eq!(store.get_session(&jar), SessionRecord::default());
    }

    #[test]
    fn clear_expires_cookies_sent_by_the_browser() {
        let store = SessionStore::new(false);
        let jar = request_jar("spotify_access_token=AT; spotify_refresh_token=RT");
        assert!(store.get_session(&jar).is_authenticated());

        let jar = store.clear_session(jar);
        assert_eq!(store.get_session(&jar), SessionRecord::default());

        let response = jar.into_response();
        let removals: Vec<Cookie<'static>> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| Cookie::parse(v.to_str().unwrap().to_string()).unwrap())
            .collect();
        assert_eq!(removals.len(), 2);
        assert!(
            removals
                .iter()
                .all(|c| c.max_age() == Some(Duration::ZERO) && c.value().is_empty())
        );
    }

    #[test]
    fn empty_cookie_values_count_as_missing() {
        let store = SessionStore::new(false);
        let jar = request_jar("spotify_access_token=; spotify_refresh_token=RT");

        let session = store.get_session(&jar);
        assert!(session.access_token.is_none());
        assert_eq!(session.refresh_token.as_deref(), Some("RT"));
    }
}

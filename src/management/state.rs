use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, SameSite},
};
use time::Duration;

use crate::utils;

pub const STATE_COOKIE: &str = "spotify_auth_state";

/// How long a login attempt may take before its state expires.
pub const STATE_MAX_AGE: Duration = Duration::minutes(10);

/// Outcome of checking the `state` echoed back by the accounts service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCheck {
    Valid,
    /// No signed state cookie (expired, tampered with, or never issued).
    Missing,
    Mismatch,
}

/// Issues a new one-time state value, stores it in the signed cookie and
/// returns it for the authorization URL.
pub fn issue_state(jar: SignedCookieJar, secure: bool) -> (SignedCookieJar, String) {
    let state = utils::generate_state();

    let cookie = Cookie::build((STATE_COOKIE, state.clone()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(STATE_MAX_AGE)
        .build();

    (jar.add(cookie), state)
}

/// Compares `received` with the stored state and consumes the cookie.
///
/// The cookie is removed whatever the outcome, so a state value can only be
/// used once.
pub fn verify_state(
    jar: SignedCookieJar,
    received: Option<&str>,
) -> (SignedCookieJar, StateCheck) {
    let stored = jar.get(STATE_COOKIE).map(|c| c.value().to_string());

    let check = match (stored, received) {
        (None, _) => StateCheck::Missing,
        (Some(stored), Some(received)) if !stored.is_empty() && stored == received => {
            StateCheck::Valid
        }
        _ => StateCheck::Mismatch,
    };

    let jar = jar.remove(Cookie::build((STATE_COOKIE, "")).path("/").build());
    (jar, check)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

    use super::*;

    fn key() -> axum_extra::extract::cookie::Key {
        utils::derive_cookie_key("test secret")
    }

    #[test]
    fn issued_state_verifies_once() {
        let (jar, state) = issue_state(SignedCookieJar::new(key()), false);
        assert_eq!(state.len(), 32);

        let (jar, check) = verify_state(jar, Some(&state));
        assert_eq!(check, StateCheck::Valid);

        let (_, check) = verify_state(jar, Some(&state));
        assert_eq!(check, StateCheck::Missing);
    }

    #[test]
    fn wrong_or_absent_state_is_rejected() {
        let (jar, _) = issue_state(SignedCookieJar::new(key()), false);
        let (_, check) = verify_state(jar, Some("forged"));
        assert_eq!(check, StateCheck::Mismatch);

        let (jar, _) = issue_state(SignedCookieJar::new(key()), false);
        let (_, check) = verify_state(jar, None);
        assert_eq!(check, StateCheck::Mismatch);
    }

    #[test]
    fn unsigned_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("spotify_auth_state=forged"),
        );
        let jar = SignedCookieJar::from_headers(&headers, key());

        let (_, check) = verify_state(jar, Some("forged"));
        assert_eq!(check, StateCheck::Missing);
    }

    #[test]
    fn state_cookie_is_short_lived() {
        let (jar, state) = issue_state(SignedCookieJar::new(key()), true);
        let cookie = jar.get(STATE_COOKIE).unwrap();

        assert_eq!(cookie.value(), state);
        assert_eq!(cookie.max_age(), Some(Duration::minutes(10)));
        assert_eq!(cookie.secure(), Some(true));
    }
}

use axum_extra::extract::cookie::Key;
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha512};

/// Generates the one-time `state` value for an authorization request.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// `Authorization` header value for HTTP Basic client authentication.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{client_id}:{client_secret}");
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Derives the signed-cookie key from an arbitrary-length secret.
///
/// `Key` needs 64 bytes of material, which is exactly one SHA-512 digest.
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Joins an API base URL and an endpoint path with exactly one slash.
pub fn join_endpoint(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Comma-joins track ids for the batch endpoints (at most 100 ids).
pub fn join_ids<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().take(100).collect::<Vec<_>>().join(",")
}

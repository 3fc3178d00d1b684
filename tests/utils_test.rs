use base64::{Engine, engine::general_purpose::STANDARD};
use spotify_stats::utils::*;

#[test]
fn test_generate_state() {
    let state = generate_state();

    // Should be exactly 32 characters
    assert_eq!(state.len(), 32);

    // Should contain only alphanumeric characters (safe in a query string)
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated states should be different
    let state2 = generate_state();
    assert_ne!(state, state2);
}

#[test]
fn test_basic_auth_header() {
    let header = basic_auth_header("client", "secret");

    assert!(header.starts_with("Basic "));

    let encoded = header.trim_start_matches("Basic ");
    let decoded = STANDARD.decode(encoded).unwrap();
    assert_eq!(decoded, b"client:secret");
}

#[test]
fn test_basic_auth_header_is_standard_base64() {
    // Standard alphabet with padding, not the URL-safe variant
    let header = basic_auth_header("a", "b");
    assert_eq!(header, "Basic YTpi");

    let header = basic_auth_header("ab", "c");
    assert_eq!(header, "Basic YWI6Yw==");
}

#[test]
fn test_derive_cookie_key_is_deterministic() {
    let key1 = derive_cookie_key("some secret");
    let key2 = derive_cookie_key("some secret");
    let key3 = derive_cookie_key("other secret");

    assert_eq!(key1.master(), key2.master());
    assert_ne!(key1.master(), key3.master());
    assert_eq!(key1.master().len(), 64);
}

#[test]
fn test_derive_cookie_key_accepts_short_secrets() {
    // Should not panic even for an empty secret
    let key = derive_cookie_key("");
    assert_eq!(key.master().len(), 64);
}

#[test]
fn test_join_endpoint() {
    assert_eq!(
        join_endpoint("https://api.spotify.com/v1", "/me"),
        "https://api.spotify.com/v1/me"
    );
    assert_eq!(
        join_endpoint("https://api.spotify.com/v1/", "/me/top/artists?limit=5"),
        "https://api.spotify.com/v1/me/top/artists?limit=5"
    );
    assert_eq!(join_endpoint("http://x", "me"), "http://x/me");
}

#[test]
fn test_join_ids() {
    assert_eq!(join_ids(["a", "b", "c"]), "a,b,c");
    assert_eq!(join_ids(Vec::<&str>::new()), "");

    let many: Vec<String> = (0..150).map(|i| format!("id{i}")).collect();
    let joined = join_ids(many.iter().map(String::as_str));
    assert_eq!(joined.split(',').count(), 100);
}

use std::sync::Arc;

use crate::{config::Config, info, spotify::SpotifyClient, utils, warning};

/// Prints an authorization URL for inspection.
///
/// Meant for checking client id, redirect URI and scopes against the Spotify
/// developer dashboard. The `state` in the URL is generated here and never
/// stored, so a login started from it is always rejected by the callback's
/// state check. Logging in goes through `/api/auth/login` of a running
/// server.
pub fn auth_url(config: Config) {
    let notice = inspection_notice(&config);
    let redirect_uri = config.redirect_uri.clone();
    let client = SpotifyClient::new(Arc::new(config));

    info!("Redirect URI: {}", redirect_uri);
    warning!("{}", notice);
    println!("{}", client.get_auth_url(&utils::generate_state()));
}

fn inspection_notice(config: &Config) -> String {
    format!(
        "For inspection only: this URL cannot complete a login. \
         Use http://{}/api/auth/login instead.",
        config.server_address
    )
}

use crate::{config::Config, error, info, server::start_api_server, success, warning};

/// Starts the dashboard server and blocks until it stops.
///
/// With `open`, the login endpoint is opened in the default browser once the
/// server task is running. Exits the process if the server cannot start.
pub async fn serve(config: Config, open: bool) {
    let base_url = format!("http://{}", config.server_address);

    info!("Starting Spotify Stats on {}", base_url);
    if !config.production {
        warning!("APP_ENV is not 'production': session cookies are sent without the Secure flag");
    }

    let server = tokio::spawn(start_api_server(config));

    if open {
        let login_url = format!("{base_url}/api/auth/login");
        if webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            )
        }
    }

    match server.await {
        Ok(Ok(())) => success!("Server stopped"),
        Ok(Err(e)) => error!("Server failed: {}", e),
        Err(e) => error!("Server task crashed: {}", e),
    }
}

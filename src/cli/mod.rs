//! # CLI Module
//!
//! Command implementations behind the `spotify-stats` binary. The binary
//! itself only parses arguments (see `main.rs`) and delegates here.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the dashboard server, optionally opening the login page
//!   in the default browser
//! - [`auth_url`] - Prints a Spotify authorization URL for checking client
//!   id, redirect URI and scopes against the Spotify developer dashboard. Its
//!   state is not stored, so the URL cannot complete a login
//!
//! ## Usage
//!
//! ```bash
//! spotify-stats serve --open       # Start the server and open the browser
//! spotify-stats auth-url           # Inspect the authorization URL
//! spotify-stats completions zsh    # Shell completions
//! ```
//!
//! ## Output
//!
//! Commands report to the terminal with the crate's `info!`, `success!`,
//! `warning!` and `error!` macros; request-level logging of the running
//! server goes through `tracing`.

mod auth;
mod serve;

pub use auth::auth_url;
pub use serve::serve;

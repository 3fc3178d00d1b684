//! Spotify Stats Library
//!
//! Backend of a personal Spotify listening statistics dashboard. Users log in
//! through the Spotify authorization-code flow; the resulting access and
//! refresh tokens live in http-only cookies and every page request is served
//! by calling the Spotify Web API with the caller's own access token.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for login, callback, logout, pages and search
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Crate error type and Spotify API failure classification
//! - `management` - Session cookies, CSRF state and token lifecycle
//! - `server` - Router construction and the HTTP server
//! - `spotify` - Spotify accounts service and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotify_stats::{config::{self, Config}, server};
//!
//! #[tokio::main]
//! async fn main() -> spotify_stats::error::Result<()> {
//!     config::load_env().await?;
//!     server::start_api_server(Config::from_env()?).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

// Terminal output of the CLI commands. Request handling logs through
// `tracing` instead.

/// Prints a status line prefixed with a blue `o`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
    }};
}

/// Prints a status line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
    }};
}

/// Prints a notice prefixed with a yellow `!`.
#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
    }};
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only for failures the command cannot recover from, e.g. missing
/// credentials at startup:
///
/// ```
/// error!("Invalid configuration. Err: {}", e);
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
        std::process::exit(1)
    }};
}

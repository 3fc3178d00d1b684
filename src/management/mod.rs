mod auth;
mod session;
mod state;

pub use auth::TokenManager;
pub use session::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_MAX_AGE, SessionStore,
};
pub use state::{STATE_COOKIE, STATE_MAX_AGE, StateCheck, issue_state, verify_state};

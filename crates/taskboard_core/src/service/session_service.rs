//! Session use-cases: demo login, logout and board access guard.
//!
//! # Responsibility
//! - Check form input and the static demo credentials.
//! - Persist or clear the session marker through the gateway.
//!
//! # Invariants
//! - Passwords are never stored or logged.
//! - Logout keeps a session that was saved with the remember flag.

use crate::model::session::Session;
use crate::repo::kv_store::KvStore;
use crate::repo::storage_gateway::StorageGateway;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// Static credential pair accepted by [`login`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub email: &'static str,
    pub password: &'static str,
}

/// The only account the board accepts.
pub const DEMO_CREDENTIALS: Credentials = Credentials {
    email: "intern@demo.com",
    password: "intern123",
};

/// Login and access-guard failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    InvalidCredentials,
    /// No session marker is stored.
    NotLoggedIn,
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailRequired => write!(f, "Email is required"),
            Self::EmailInvalid => write!(f, "Email is invalid"),
            Self::PasswordRequired => write!(f, "Password is required"),
            Self::InvalidCredentials => write!(f, "Invalid email or password"),
            Self::NotLoggedIn => write!(f, "login required"),
        }
    }
}

impl Error for LoginError {}

/// Checks form input shape. Runs before the credential comparison.
pub fn validate_login_input(email: &str, password: &str) -> Result<(), LoginError> {
    if email.is_empty() {
        return Err(LoginError::EmailRequired);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(LoginError::EmailInvalid);
    }
    if password.is_empty() {
        return Err(LoginError::PasswordRequired);
    }
    Ok(())
}

/// Logs in with the demo credentials and stores the session marker.
///
/// # Errors
/// - Input errors from [`validate_login_input`].
/// - `InvalidCredentials` when the pair does not match.
pub fn login<S: KvStore>(
    gateway: &mut StorageGateway<S>,
    email: &str,
    password: &str,
    remember: bool,
) -> Result<Session, LoginError> {
    validate_login_input(email, password)?;

    if email != DEMO_CREDENTIALS.email || password != DEMO_CREDENTIALS.password {
        warn!("event=login module=session status=error error_code=invalid_credentials");
        return Err(LoginError::InvalidCredentials);
    }

    let session = Session::new(email);
    gateway.write_user(&session, remember);
    info!("event=login module=session status=ok remember={remember}");
    Ok(session)
}

/// Ends the session unless it was saved with the remember flag.
///
/// Returns whether the session marker was cleared.
pub fn logout<S: KvStore>(gateway: &mut StorageGateway<S>) -> bool {
    if gateway.should_remember() {
        info!("event=logout module=session status=ok cleared=false");
        return false;
    }
    gateway.clear_user();
    info!("event=logout module=session status=ok cleared=true");
    true
}

/// Board access guard: returns the stored session or `NotLoggedIn`.
pub fn require_session<S: KvStore>(gateway: &StorageGateway<S>) -> Result<Session, LoginError> {
    gateway.read_user().ok_or(LoginError::NotLoggedIn)
}

#[cfg(test)]
mod tests {
    use super::{validate_login_input, LoginError};

    #[test]
    fn input_checks_run_in_form_order() {
        assert_eq!(validate_login_input("", ""), Err(LoginError::EmailRequired));
        assert_eq!(
            validate_login_input("not-an-email", ""),
            Err(LoginError::EmailInvalid)
        );
        assert_eq!(
            validate_login_input("a@b.co", ""),
            Err(LoginError::PasswordRequired)
        );
        assert_eq!(validate_login_input("a@b.co", "pw"), Ok(()));
    }

    #[test]
    fn error_messages_match_form_copy() {
        assert_eq!(
            LoginError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}

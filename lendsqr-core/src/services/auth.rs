//! Auth service - mock login against a single credential pair
//!
//! There is no real authentication protocol: a successful login mints an
//! opaque token and stores it with the display user in the session store.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use base64::Engine;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthUser, Credentials, DEFAULT_DISPLAY_NAME};
use crate::services::SessionStore;

/// Default artificial latency of a login attempt
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(1000);

/// Login, logout and session queries
pub struct AuthService {
    session: Arc<SessionStore>,
    accepted: Credentials,
    login_delay: Duration,
}

impl AuthService {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            accepted: Credentials::default_pair(),
            login_delay: DEFAULT_LOGIN_DELAY,
        }
    }

    /// Override the simulated network delay (zero in tests)
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    /// Check credentials and open a session
    ///
    /// Sleeps for the login delay first. On mismatch nothing is persisted.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthUser> {
        if !self.login_delay.is_zero() {
            thread::sleep(self.login_delay);
        }

        if credentials.email != self.accepted.email
            || credentials.password != self.accepted.password
        {
            return Err(Error::InvalidCredentials);
        }

        let user = AuthUser {
            email: credentials.email.clone(),
            name: DEFAULT_DISPLAY_NAME.to_string(),
        };

        let token = self.issue_token(&credentials.email);
        self.session.set_token(&token)?;
        self.session.set_user(&serde_json::to_string(&user)?)?;

        Ok(user)
    }

    /// Opaque token: base64 of email, issue time and a random nonce
    fn issue_token(&self, email: &str) -> String {
        let raw = format!(
            "{}:{}:{}",
            email,
            self.session.now().timestamp_millis(),
            Uuid::new_v4().simple()
        );
        base64::engine::general_purpose::STANDARD.encode(raw)
    }

    /// End the session. Idempotent; storage failures are ignored.
    pub fn logout(&self) {
        let _ = self.session.clear_auth();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.auth_status()
    }

    /// The logged-in user, or `None` if absent or unreadable
    pub fn get_current_user(&self) -> Option<AuthUser> {
        let raw = self.session.get_user().ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
}

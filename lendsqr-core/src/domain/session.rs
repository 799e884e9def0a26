//! Session domain model

use std::fmt;

use serde::{Deserialize, Serialize};

/// The single accepted login email
pub const DEFAULT_EMAIL: &str = "test@lendsqr.com";

/// The single accepted login password
pub const DEFAULT_PASSWORD: &str = "password";

/// Display name attached to every successful login
pub const DEFAULT_DISPLAY_NAME: &str = "Adedeji";

/// Email/password pair submitted at login
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// The hard-coded pair the auth service accepts
    pub fn default_pair() -> Self {
        Self::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Display record of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("a@b.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_user_round_trip() {
        let json = r#"{"email":"test@lendsqr.com","name":"Adedeji"}"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.name, DEFAULT_DISPLAY_NAME);
        assert_eq!(serde_json::to_string(&user).unwrap(), json);
    }
}

//! Jira authentication

use crate::{Error, Result};

/// Environment variable checked before the keyring
pub const TOKEN_ENV: &str = "JIRA_API_TOKEN";

/// Keyring service name for stored API tokens
pub const KEYRING_SERVICE: &str = "readiness-jira";

pub struct JiraAuth {
    email: String,
    api_token: String,
}

impl JiraAuth {
    pub fn new(email: String, api_token: String) -> Self {
        Self { email, api_token }
    }

    /// Resolve the API token from `JIRA_API_TOKEN`, falling back to the OS keyring
    pub fn resolve(email: &str) -> Result<Self> {
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            return Ok(Self::new(email.to_string(), token));
        }

        let entry = keyring::Entry::new(KEYRING_SERVICE, email)?;
        match entry.get_password() {
            Ok(token) => Ok(Self::new(email.to_string(), token)),
            Err(keyring::Error::NoEntry) => Err(Error::Auth(format!(
                "no API token for {}: set {} or store one in the keyring under '{}'",
                email, TOKEN_ENV, KEYRING_SERVICE
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.email, self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_basic_auth_header() {
        let auth = JiraAuth::new("dev@example.com".to_string(), "token".to_string());
        // base64("dev@example.com:token")
        assert_eq!(auth.to_basic_auth(), "Basic ZGV2QGV4YW1wbGUuY29tOnRva2Vu");
    }

    #[test]
    #[serial]
    fn test_resolve_prefers_env() {
        unsafe {
            std::env::set_var(TOKEN_ENV, "from-env");
        }
        let auth = JiraAuth::resolve("dev@example.com").unwrap();
        unsafe {
            std::env::remove_var(TOKEN_ENV);
        }

        assert_eq!(auth.email(), "dev@example.com");
        assert_eq!(
            auth.to_basic_auth(),
            JiraAuth::new("dev@example.com".to_string(), "from-env".to_string()).to_basic_auth()
        );
    }
}

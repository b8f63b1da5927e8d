//! Request authenticators
//!
//! Services hold an `Arc<dyn Authenticator>` and call it once per outgoing
//! request, after all other headers have been applied.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::error::{CoreError, Result};

pub const AUTH_TYPE_NOAUTH: &str = "noauth";
pub const AUTH_TYPE_BASIC: &str = "basic";
pub const AUTH_TYPE_BEARER_TOKEN: &str = "bearertoken";

#[async_trait]
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Short name of the scheme, as used by external configuration
    fn authentication_type(&self) -> &'static str;

    /// Check the configured credentials without sending anything
    fn validate(&self) -> Result<()>;

    /// Add credentials to the outgoing request headers
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()>;
}

/// Sends requests without credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_NOAUTH
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    async fn authenticate(&self, _headers: &mut HeaderMap) -> Result<()> {
        Ok(())
    }
}

/// HTTP basic authentication
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let auth = Self {
            username: username.into(),
            password: password.into(),
        };
        auth.validate()?;
        Ok(auth)
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BASIC
    }

    fn validate(&self) -> Result<()> {
        check_credential("username", &self.username)?;
        check_credential("password", &self.password)
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| CoreError::authentication(e.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Static bearer token supplied by the caller
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    bearer_token: String,
}

impl BearerTokenAuthenticator {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        let auth = Self {
            bearer_token: bearer_token.into(),
        };
        auth.validate()?;
        Ok(auth)
    }

    /// Replace the token, e.g. after the caller refreshed it
    pub fn set_bearer_token(&mut self, bearer_token: impl Into<String>) -> Result<()> {
        let token = bearer_token.into();
        check_credential("bearer token", &token)?;
        self.bearer_token = token;
        Ok(())
    }
}

impl std::fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn authentication_type(&self) -> &'static str {
        AUTH_TYPE_BEARER_TOKEN
    }

    fn validate(&self) -> Result<()> {
        check_credential("bearer token", &self.bearer_token)
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))
            .map_err(|e| CoreError::authentication(e.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Reject empty values and values pasted with surrounding braces or quotes
fn check_credential(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CoreError::authentication(format!("{name} cannot be empty")));
    }

    let wrapped = |open: char, close: char| value.starts_with(open) && value.ends_with(close);
    if value.len() > 1 && (wrapped('{', '}') || wrapped('"', '"')) {
        return Err(CoreError::authentication(format!(
            "{name} must not be wrapped in braces or quotes"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noauth_leaves_headers_untouched() {
        let mut headers = HeaderMap::new();
        NoAuthAuthenticator
            .authenticate(&mut headers)
            .await
            .expect("Operation should succeed");
        assert!(headers.is_empty());
        assert_eq!(NoAuthAuthenticator.authentication_type(), "noauth");
    }

    #[tokio::test]
    async fn test_basic_header() {
        let auth = BasicAuthenticator::new("user", "pass").expect("Operation should succeed");
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers)
            .await
            .expect("Operation should succeed");

        assert_eq!(
            headers.get(AUTHORIZATION).expect("header present"),
            "Basic dXNlcjpwYXNz"
        );
        let debug = format!("{auth:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"pass\""));
    }

    #[tokio::test]
    async fn test_bearer_header() {
        let auth = BearerTokenAuthenticator::new("abc.def").expect("Operation should succeed");
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers)
            .await
            .expect("Operation should succeed");

        assert_eq!(
            headers.get(AUTHORIZATION).expect("header present"),
            "Bearer abc.def"
        );
    }

    #[test]
    fn test_credential_validation() {
        assert!(BearerTokenAuthenticator::new("").is_err());
        assert!(BearerTokenAuthenticator::new("{token}").is_err());
        assert!(BasicAuthenticator::new("\"user\"", "pass").is_err());
        assert!(BasicAuthenticator::new("user", "").is_err());
    }

    #[test]
    fn test_set_bearer_token() {
        let mut auth = BearerTokenAuthenticator::new("first").expect("Operation should succeed");
        assert!(auth.set_bearer_token("").is_err());
        auth.set_bearer_token("second")
            .expect("Operation should succeed");
        assert_eq!(auth.bearer_token, "second");
    }
}

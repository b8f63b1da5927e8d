//! External configuration for service clients
//!
//! Every value is looked up under `<SERVICE_NAME>_<PROPERTY>`, where the
//! service name is upper-cased and dashes become underscores. For the zone
//! settings service that gives `ZONES_SETTINGS_URL`,
//! `ZONES_SETTINGS_AUTH_TYPE` and so on.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    AUTH_TYPE_BASIC, AUTH_TYPE_BEARER_TOKEN, AUTH_TYPE_NOAUTH, Authenticator, BasicAuthenticator,
    BearerTokenAuthenticator, NoAuthAuthenticator,
};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name the values were read for
    pub service_name: String,

    /// Base URL override
    pub url: Option<String>,

    /// Authentication scheme (`noauth`, `basic`, `bearertoken`)
    pub auth_type: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,

    /// Skip TLS certificate verification
    pub disable_ssl: bool,

    /// Compress request bodies with gzip
    pub enable_gzip: bool,

    /// Retry transient failures
    pub enable_retries: bool,

    /// Retry limit; zero selects the default
    pub max_retries: u32,

    /// Backoff cap; zero selects the default
    pub retry_interval: Duration,
}

impl ServiceConfig {
    /// Read configuration for `service_name` from the process environment
    pub fn from_env(service_name: &str) -> Result<Self> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if service_name.is_empty() {
            return Err(CoreError::config("service name cannot be empty"));
        }

        let prefix = service_name.to_ascii_uppercase().replace('-', "_");
        let get = |property: &str| {
            lookup(&format!("{prefix}_{property}"))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let max_retries = match get("MAX_RETRIES") {
            Some(value) => value.parse().map_err(|_| {
                CoreError::config(format!("{prefix}_MAX_RETRIES is not a number: {value}"))
            })?,
            None => 0,
        };
        let retry_interval = match get("RETRY_INTERVAL") {
            Some(value) => Duration::from_secs(value.parse().map_err(|_| {
                CoreError::config(format!("{prefix}_RETRY_INTERVAL is not a number: {value}"))
            })?),
            None => Duration::ZERO,
        };

        Ok(Self {
            service_name: service_name.to_string(),
            url: get("URL"),
            auth_type: get("AUTH_TYPE").map(|value| value.to_ascii_lowercase()),
            username: get("USERNAME"),
            password: get("PASSWORD"),
            bearer_token: get("BEARER_TOKEN"),
            disable_ssl: get("DISABLE_SSL").is_some_and(|value| parse_flag(&value)),
            enable_gzip: get("ENABLE_GZIP").is_some_and(|value| parse_flag(&value)),
            enable_retries: get("ENABLE_RETRIES").is_some_and(|value| parse_flag(&value)),
            max_retries,
            retry_interval,
        })
    }

    /// Build the authenticator described by this configuration.
    ///
    /// Without an explicit auth type, a bearer token or username selects the
    /// matching scheme and anything else falls back to `noauth`.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        let auth_type = match self.auth_type.as_deref() {
            Some(auth_type) => auth_type,
            None if self.bearer_token.is_some() => AUTH_TYPE_BEARER_TOKEN,
            None if self.username.is_some() => AUTH_TYPE_BASIC,
            None => AUTH_TYPE_NOAUTH,
        };

        match auth_type {
            AUTH_TYPE_NOAUTH => Ok(Arc::new(NoAuthAuthenticator)),
            AUTH_TYPE_BASIC => Ok(Arc::new(BasicAuthenticator::new(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            )?)),
            AUTH_TYPE_BEARER_TOKEN => Ok(Arc::new(BearerTokenAuthenticator::new(
                self.bearer_token.clone().unwrap_or_default(),
            )?)),
            other => Err(CoreError::config(format!(
                "unsupported authentication type '{other}' for service '{}'",
                self.service_name
            ))),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

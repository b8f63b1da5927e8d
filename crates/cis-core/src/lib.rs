//! # cis-core - shared transport for CIS service clients
//!
//! Service crates such as `cis-zones-settings` are thin: each operation
//! describes a request (method, path template, path parameters, optional JSON
//! body) and hands it to a [`BaseService`]. This crate owns everything those
//! operations have in common:
//!
//! - **URL templating**: `{name}` placeholders resolved against the service
//!   URL, each value percent-encoded as a single path segment
//! - **Authentication**: the [`Authenticator`] abstraction with no-auth,
//!   basic and bearer token implementations
//! - **Retries**: opt-in exponential backoff with jitter that honours
//!   `Retry-After` ([`RetryPolicy`])
//! - **Compression**: gzip request bodies on demand, transparent response
//!   decompression
//! - **Errors**: [`CoreError`] separates transport, service, decode and
//!   validation failures
//! - **Configuration**: [`ServiceConfig`] reads `<SERVICE>_*` environment
//!   variables
//!
//! ## Example
//!
//! ```rust,no_run
//! use cis_core::{BaseService, NoAuthAuthenticator, ServiceInfo, ServiceRequest};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> cis_core::Result<()> {
//! let info = ServiceInfo {
//!     service_name: "zones_settings",
//!     service_version: "V1",
//!     sdk_name: "example",
//!     sdk_version: "0.1.0",
//! };
//! let mut service = BaseService::new(info, "https://api.cis.cloud.ibm.com", Arc::new(NoAuthAuthenticator))?;
//! service.enable_retries(3, Duration::from_secs(10));
//!
//! let request = ServiceRequest::get("/v1/{crn}/zones/{zone_identifier}/settings/http2")
//!     .path_param("crn", "crn:v1:...")
//!     .path_param("zone_identifier", "zone-id")
//!     .timeout(Some(Duration::from_secs(5)));
//!
//! let response = service.request::<serde_json::Value>(request).await?;
//! println!("{:?}", response.result);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod retry;
pub mod service;
pub mod transport;

pub use auth::{Authenticator, BasicAuthenticator, BearerTokenAuthenticator, NoAuthAuthenticator};
pub use config::ServiceConfig;
pub use error::{CoreError, Result};
pub use request::ServiceRequest;
pub use response::DetailedResponse;
pub use retry::RetryPolicy;
pub use service::{BaseService, ServiceInfo};
pub use transport::HttpConfig;

// Re-exported so service crates and callers agree on the http types
pub use reqwest::StatusCode;
pub use reqwest::header;

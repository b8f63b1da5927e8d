//! Base service shared by generated service clients
//!
//! A [`BaseService`] owns the reqwest client, the service URL, the
//! authenticator and the per-service knobs (default headers, retries, gzip).
//! Service crates describe each call with a [`ServiceRequest`] and hand it
//! to [`BaseService::request`].

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use reqwest::header::{
    ACCEPT, CONTENT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::Authenticator;
use crate::config::ServiceConfig;
use crate::error::{CoreError, Result, error_message_from_body};
use crate::request::ServiceRequest;
use crate::response::DetailedResponse;
use crate::retry::RetryPolicy;
use crate::transport::HttpConfig;

/// Header carrying the service name, version and operation of each call
pub const ANALYTICS_HEADER: &str = "x-ibmcloud-sdk-analytics";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Identity reported in `User-Agent` and the analytics header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub service_name: &'static str,
    pub service_version: &'static str,
    pub sdk_name: &'static str,
    pub sdk_version: &'static str,
}

impl ServiceInfo {
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{} ({}; {})",
            self.sdk_name,
            self.sdk_version,
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    }

    fn analytics(&self, operation_id: &str) -> String {
        format!(
            "service_name={};service_version={};operation_id={}",
            self.service_name, self.service_version, operation_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct BaseService {
    client: Client,
    http_config: HttpConfig,
    info: ServiceInfo,
    service_url: Url,
    authenticator: Arc<dyn Authenticator>,
    default_headers: HeaderMap,
    retry_policy: Option<RetryPolicy>,
    enable_gzip: bool,
}

impl BaseService {
    /// Create a service for `service_url` with retries and gzip disabled
    pub fn new(
        info: ServiceInfo,
        service_url: &str,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        authenticator.validate()?;

        let http_config = HttpConfig::default();
        let client = http_config.build_client(&info.user_agent())?;

        Ok(Self {
            client,
            http_config,
            service_url: parse_service_url(service_url)?,
            info,
            authenticator,
            default_headers: HeaderMap::new(),
            retry_policy: None,
            enable_gzip: false,
        })
    }

    /// Create a service and apply external configuration on top of the
    /// supplied defaults.
    pub fn from_config(
        info: ServiceInfo,
        default_url: &str,
        authenticator: Arc<dyn Authenticator>,
        config: &ServiceConfig,
    ) -> Result<Self> {
        let url = config.url.as_deref().unwrap_or(default_url);
        let mut service = Self::new(info, url, authenticator)?;

        if config.disable_ssl {
            service.set_http_config(HttpConfig {
                disable_ssl_verification: true,
                ..HttpConfig::default()
            })?;
        }
        service.set_enable_gzip_compression(config.enable_gzip);
        if config.enable_retries {
            service.enable_retries(config.max_retries, config.retry_interval);
        }

        Ok(service)
    }

    pub fn service_url(&self) -> &str {
        self.service_url.as_str().trim_end_matches('/')
    }

    /// Point the service at a different endpoint
    pub fn set_service_url(&mut self, service_url: &str) -> Result<()> {
        self.service_url = parse_service_url(service_url)?;
        Ok(())
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Headers sent with every request, before per-call headers
    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.default_headers = headers;
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Retry transient failures.
    ///
    /// `max_retries == 0` and a zero interval select the defaults.
    pub fn enable_retries(&mut self, max_retries: u32, max_retry_interval: Duration) {
        let policy = RetryPolicy::with_limits(max_retries, max_retry_interval);
        debug!(
            "Retries enabled: {} attempts, {:?} max interval",
            policy.max_attempts, policy.max_backoff
        );
        self.retry_policy = Some(policy);
    }

    /// Use an explicit retry policy
    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.retry_policy = Some(policy);
    }

    pub fn disable_retries(&mut self) {
        self.retry_policy = None;
    }

    pub fn retries_enabled(&self) -> bool {
        self.retry_policy.is_some()
    }

    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry_policy.as_ref()
    }

    /// Compress request bodies with gzip
    pub fn set_enable_gzip_compression(&mut self, enable: bool) {
        self.enable_gzip = enable;
    }

    pub fn gzip_compression_enabled(&self) -> bool {
        self.enable_gzip
    }

    /// Rebuild the underlying client with a new transport configuration
    pub fn set_http_config(&mut self, http_config: HttpConfig) -> Result<()> {
        self.client = http_config.build_client(&self.info.user_agent())?;
        self.http_config = http_config;
        Ok(())
    }

    pub fn http_config(&self) -> &HttpConfig {
        &self.http_config
    }

    /// Send a request and decode the JSON response into `T`.
    ///
    /// Non-2xx responses become [`CoreError::Service`]. An empty body yields
    /// a response whose `result` is `None`. The request deadline, when set,
    /// covers every attempt and the backoff between them.
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: ServiceRequest,
    ) -> Result<DetailedResponse<T>> {
        let url = request.resolve_url(&self.service_url)?;
        let headers = self.build_headers(&request).await?;
        let body = self.encode_body(request.body())?;

        let exchange = async {
            match &self.retry_policy {
                Some(policy) => {
                    policy
                        .execute(|| self.send_once(&request, &url, &headers, body.clone()))
                        .await
                }
                None => self.send_once(&request, &url, &headers, body.clone()).await,
            }
        };

        let (status, response_headers, bytes) = match request.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, exchange)
                .await
                .map_err(|_| {
                    warn!("{} {} exceeded deadline of {:?}", request.method(), url, deadline);
                    CoreError::DeadlineExceeded(deadline)
                })??,
            None => exchange.await?,
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            trace!("Empty response body from {}", url);
            return Ok(DetailedResponse::new(status, response_headers, None));
        }

        let result = serde_json::from_slice(&bytes)
            .map_err(|source| CoreError::Decode { status, source })?;
        Ok(DetailedResponse::new(status, response_headers, Some(result)))
    }

    async fn build_headers(&self, request: &ServiceRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        if let Some(operation) = request.operation() {
            let value = HeaderValue::from_str(&self.info.analytics(operation))
                .map_err(|e| CoreError::validation(e.to_string()))?;
            headers.insert(HeaderName::from_static(ANALYTICS_HEADER), value);
        }

        if request.body().is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            if self.enable_gzip {
                headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            }
        }

        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }
        for (name, value) in request.header_map() {
            headers.insert(name.clone(), value.clone());
        }

        self.authenticator.authenticate(&mut headers).await?;
        Ok(headers)
    }

    fn encode_body(&self, body: Option<&Bytes>) -> Result<Option<Bytes>> {
        let Some(body) = body else {
            return Ok(None);
        };
        if !self.enable_gzip {
            return Ok(Some(body.clone()));
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body)?;
        let compressed = encoder.finish()?;
        trace!(
            "Compressed request body from {} to {} bytes",
            body.len(),
            compressed.len()
        );
        Ok(Some(Bytes::from(compressed)))
    }

    async fn send_once(
        &self,
        request: &ServiceRequest,
        url: &Url,
        headers: &HeaderMap,
        body: Option<Bytes>,
    ) -> Result<(StatusCode, HeaderMap, Bytes)> {
        debug!("{} {}", request.method(), url);

        let mut builder = self
            .client
            .request(request.method().clone(), url.clone())
            .headers(headers.clone());
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success() {
            return Err(service_error(response).await);
        }

        let response_headers = response.headers().clone();
        let bytes = response.bytes().await?;
        Ok((status, response_headers, bytes))
    }
}

/// Turn a non-2xx response into a typed error
async fn service_error(response: Response) -> CoreError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let body = response
        .bytes()
        .await
        .ok()
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok());

    let message = body
        .as_ref()
        .and_then(error_message_from_body)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    CoreError::Service {
        status,
        message,
        body,
        retry_after,
    }
}

fn parse_service_url(service_url: &str) -> Result<Url> {
    let trimmed = service_url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::config("service URL cannot be empty"));
    }

    let url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::config(format!(
            "service URL must use http or https: {trimmed}"
        )));
    }
    Ok(url)
}

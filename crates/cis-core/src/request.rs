//! Request description handed to [`BaseService::request`](crate::BaseService::request)

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct ServiceRequest {
    method: Method,
    path_template: String,
    path_params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Bytes>,
    timeout: Option<Duration>,
    operation_id: Option<String>,
}

impl ServiceRequest {
    /// Start a request for a path template such as
    /// `/v1/{crn}/zones/{zone_identifier}/settings/minify`
    pub fn new(method: Method, path_template: impl Into<String>) -> Self {
        Self {
            method,
            path_template: path_template.into(),
            path_params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
            operation_id: None,
        }
    }

    pub fn get(path_template: impl Into<String>) -> Self {
        Self::new(Method::GET, path_template)
    }

    pub fn patch(path_template: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path_template)
    }

    /// Bind a value to a `{name}` placeholder
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    /// Add a single header, replacing earlier values of the same name
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| CoreError::validation(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| CoreError::validation(format!("invalid value for header '{name}': {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add caller supplied headers
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Result<Self> {
        for (name, value) in headers {
            self = self.header(name, value)?;
        }
        Ok(self)
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_vec(body).map_err(CoreError::Encode)?;
        self.body = Some(Bytes::from(encoded));
        Ok(self)
    }

    /// Use an already encoded JSON body
    pub fn json_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Deadline for the whole exchange, retries included
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Operation name reported in the analytics header
    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    pub(crate) fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub(crate) fn deadline(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn operation(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Resolve the path template against the service base URL.
    ///
    /// Literal segments are appended as-is, placeholders are replaced by the
    /// bound value as a single percent-encoded segment.
    pub fn resolve_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                CoreError::config(format!("service URL '{base}' cannot be used as a base"))
            })?;
            segments.pop_if_empty();

            for segment in self.path_template.split('/').filter(|s| !s.is_empty()) {
                match placeholder_name(segment) {
                    Some(name) => segments.push(self.param_value(name)?),
                    None => segments.push(segment),
                };
            }
        }
        Ok(url)
    }

    fn param_value(&self, name: &str) -> Result<&str> {
        let value = self
            .path_params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| CoreError::validation(format!("path parameter '{name}' is not set")))?;

        if value.is_empty() {
            return Err(CoreError::validation(format!(
                "path parameter '{name}' cannot be empty"
            )));
        }
        Ok(value)
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

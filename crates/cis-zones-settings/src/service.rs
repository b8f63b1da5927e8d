//! Zone settings service client

use cis_core::header::HeaderMap;
use cis_core::{
    Authenticator, BaseService, CoreError, DetailedResponse, HttpConfig, NoAuthAuthenticator,
    Result, RetryPolicy, ServiceConfig, ServiceInfo, ServiceRequest,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::models::{DnssecResp, DnssecStatus, LogRetentionResp, SettingResp};
use crate::options::{
    GetLogRetentionOptions, GetSettingOptions, GetZoneDnssecOptions, OperationOptions,
    RequestOptions, UpdateLogRetentionOptions, UpdateSettingOptions, UpdateZoneDnssecOptions,
};
use crate::settings::{SettingKind, ZoneSetting};

/// Public endpoint of the CIS API
pub const DEFAULT_SERVICE_URL: &str = "https://api.cis.cloud.ibm.com";

/// Prefix used when reading configuration from the environment
pub const DEFAULT_SERVICE_NAME: &str = "zones_settings";

const DNSSEC_PATH: &str = "/v1/{crn}/zones/{zone_identifier}/dnssec";
const LOG_RETENTION_PATH: &str = "/v1/{crn}/zones/{zone_identifier}/logs/retention";

const SERVICE_INFO: ServiceInfo = ServiceInfo {
    service_name: DEFAULT_SERVICE_NAME,
    service_version: "V1",
    sdk_name: env!("CARGO_PKG_NAME"),
    sdk_version: env!("CARGO_PKG_VERSION"),
};

/// Construction parameters for [`ZonesSettingsV1`]
#[derive(Debug, Clone)]
pub struct ZonesSettingsV1Options {
    /// Service URL, [`DEFAULT_SERVICE_URL`] when unset
    pub url: Option<String>,
    /// Authenticator, no authentication when unset
    pub authenticator: Option<Arc<dyn Authenticator>>,
    /// Full CRN of the CIS instance
    pub crn: String,
    /// Zone whose settings are read and written
    pub zone_identifier: String,
}

impl ZonesSettingsV1Options {
    pub fn new(crn: impl Into<String>, zone_identifier: impl Into<String>) -> Self {
        Self {
            url: None,
            authenticator: None,
            crn: crn.into(),
            zone_identifier: zone_identifier.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }
}

#[derive(Serialize)]
struct DnssecBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<DnssecStatus>,
}

#[derive(Serialize)]
struct LogRetentionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    flag: Option<bool>,
}

/// Client for the zone settings API of one zone
#[derive(Debug, Clone)]
pub struct ZonesSettingsV1 {
    service: BaseService,
    crn: String,
    zone_identifier: String,
}

impl ZonesSettingsV1 {
    pub fn new(options: ZonesSettingsV1Options) -> Result<Self> {
        let authenticator = options
            .authenticator
            .unwrap_or_else(|| Arc::new(NoAuthAuthenticator));
        let url = options.url.as_deref().unwrap_or(DEFAULT_SERVICE_URL);
        let service = BaseService::new(SERVICE_INFO, url, authenticator)?;
        Self::with_service(service, options.crn, options.zone_identifier)
    }

    /// Build a client from `<SERVICE_NAME>_*` environment variables.
    ///
    /// `service_name` defaults to [`DEFAULT_SERVICE_NAME`].
    pub fn from_env(
        service_name: Option<&str>,
        crn: impl Into<String>,
        zone_identifier: impl Into<String>,
    ) -> Result<Self> {
        let config = ServiceConfig::from_env(service_name.unwrap_or(DEFAULT_SERVICE_NAME))?;
        Self::from_config(&config, crn, zone_identifier)
    }

    /// Build a client from already loaded configuration
    pub fn from_config(
        config: &ServiceConfig,
        crn: impl Into<String>,
        zone_identifier: impl Into<String>,
    ) -> Result<Self> {
        let service = BaseService::from_config(
            SERVICE_INFO,
            DEFAULT_SERVICE_URL,
            config.authenticator()?,
            config,
        )?;
        Self::with_service(service, crn.into(), zone_identifier.into())
    }

    fn with_service(service: BaseService, crn: String, zone_identifier: String) -> Result<Self> {
        let crn = required("crn", crn)?;
        let zone_identifier = required("zone_identifier", zone_identifier)?;
        debug!(
            "Zone settings client for zone {} at {}",
            zone_identifier,
            service.service_url()
        );
        Ok(Self {
            service,
            crn,
            zone_identifier,
        })
    }

    pub fn crn(&self) -> &str {
        &self.crn
    }

    pub fn set_crn(&mut self, crn: impl Into<String>) -> Result<()> {
        self.crn = required("crn", crn.into())?;
        Ok(())
    }

    pub fn zone_identifier(&self) -> &str {
        &self.zone_identifier
    }

    pub fn set_zone_identifier(&mut self, zone_identifier: impl Into<String>) -> Result<()> {
        self.zone_identifier = required("zone_identifier", zone_identifier.into())?;
        Ok(())
    }

    pub fn service_url(&self) -> &str {
        self.service.service_url()
    }

    pub fn set_service_url(&mut self, url: &str) -> Result<()> {
        self.service.set_service_url(url)
    }

    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.service.set_default_headers(headers);
    }

    pub fn default_headers(&self) -> &HeaderMap {
        self.service.default_headers()
    }

    /// Retry transient failures; zero arguments select the defaults
    pub fn enable_retries(&mut self, max_retries: u32, max_retry_interval: Duration) {
        self.service.enable_retries(max_retries, max_retry_interval);
    }

    pub fn set_retry_policy(&mut self, policy: RetryPolicy) {
        self.service.set_retry_policy(policy);
    }

    pub fn disable_retries(&mut self) {
        self.service.disable_retries();
    }

    pub fn retries_enabled(&self) -> bool {
        self.service.retries_enabled()
    }

    pub fn set_enable_gzip_compression(&mut self, enable: bool) {
        self.service.set_enable_gzip_compression(enable);
    }

    pub fn gzip_compression_enabled(&self) -> bool {
        self.service.gzip_compression_enabled()
    }

    pub fn set_http_config(&mut self, config: HttpConfig) -> Result<()> {
        self.service.set_http_config(config)
    }

    pub fn service(&self) -> &BaseService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut BaseService {
        &mut self.service
    }

    /// Read setting `S`
    pub async fn get_setting<S: ZoneSetting>(
        &self,
        options: &GetSettingOptions<S>,
    ) -> Result<DetailedResponse<SettingResp<S::Value>>> {
        let request = self.zone_request(ServiceRequest::get(S::PATH), S::GET_OPERATION, options)?;
        self.service.request(request).await
    }

    /// Change setting `S`
    pub async fn update_setting<S: ZoneSetting>(
        &self,
        options: &UpdateSettingOptions<S>,
    ) -> Result<DetailedResponse<SettingResp<S::Value>>> {
        let body = S::update_body(options.value.as_ref()).map_err(CoreError::Encode)?;
        let request =
            self.zone_request(ServiceRequest::patch(S::PATH), S::UPDATE_OPERATION, options)?;
        self.service.request(request.json_bytes(body)).await
    }

    /// Read any setting by kind, keeping the value as raw JSON
    pub async fn get_setting_json(
        &self,
        kind: SettingKind,
        options: &RequestOptions,
    ) -> Result<DetailedResponse<SettingResp<Value>>> {
        let request =
            self.zone_request(ServiceRequest::get(kind.path()), kind.get_operation(), options)?;
        self.service.request(request).await
    }

    /// Change any setting by kind.
    ///
    /// `value` must deserialize into the setting's value type, otherwise a
    /// validation error is returned and nothing is sent.
    pub async fn update_setting_json(
        &self,
        kind: SettingKind,
        value: Value,
        options: &RequestOptions,
    ) -> Result<DetailedResponse<SettingResp<Value>>> {
        let body = kind.encode_update(value)?;
        let request = self.zone_request(
            ServiceRequest::patch(kind.path()),
            kind.update_operation(),
            options,
        )?;
        self.service.request(request.json_bytes(body)).await
    }

    /// Read the DNSSEC state of the zone
    pub async fn get_zone_dnssec(
        &self,
        options: &GetZoneDnssecOptions,
    ) -> Result<DetailedResponse<DnssecResp>> {
        let request =
            self.zone_request(ServiceRequest::get(DNSSEC_PATH), "get_zone_dnssec", options)?;
        self.service.request(request).await
    }

    /// Enable or disable DNSSEC for the zone
    pub async fn update_zone_dnssec(
        &self,
        options: &UpdateZoneDnssecOptions,
    ) -> Result<DetailedResponse<DnssecResp>> {
        let request = self
            .zone_request(ServiceRequest::patch(DNSSEC_PATH), "update_zone_dnssec", options)?
            .json(&DnssecBody {
                status: options.status,
            })?;
        self.service.request(request).await
    }

    /// Read whether logs are retained for the zone
    pub async fn get_log_retention(
        &self,
        options: &GetLogRetentionOptions,
    ) -> Result<DetailedResponse<LogRetentionResp>> {
        let request = self.zone_request(
            ServiceRequest::get(LOG_RETENTION_PATH),
            "get_log_retention",
            options,
        )?;
        self.service.request(request).await
    }

    pub async fn update_log_retention(
        &self,
        options: &UpdateLogRetentionOptions,
    ) -> Result<DetailedResponse<LogRetentionResp>> {
        let request = self
            .zone_request(
                ServiceRequest::patch(LOG_RETENTION_PATH),
                "update_log_retention",
                options,
            )?
            .json(&LogRetentionBody { flag: options.flag })?;
        self.service.request(request).await
    }

    fn zone_request(
        &self,
        request: ServiceRequest,
        operation: &str,
        options: &impl OperationOptions,
    ) -> Result<ServiceRequest> {
        request
            .path_param("crn", self.crn.as_str())
            .path_param("zone_identifier", self.zone_identifier.as_str())
            .operation_id(operation)
            .timeout(options.timeout())
            .headers(options.headers())
    }
}

fn required(name: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{name} cannot be empty")));
    }
    Ok(value)
}

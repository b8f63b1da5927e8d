//! Per-operation options
//!
//! Each operation takes an options struct with at most one semantic field
//! (the new value for updates) plus caller headers and an optional deadline.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Duration;

use crate::models::DnssecStatus;
use crate::settings::ZoneSetting;

/// Headers and deadline shared by every options struct
pub trait OperationOptions {
    fn headers(&self) -> &HashMap<String, String>;

    fn timeout(&self) -> Option<Duration>;
}

macro_rules! request_builders {
    () => {
        /// Add a header sent with this call only
        pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.headers.insert(name.into(), value.into());
            self
        }

        /// Replace all per-call headers
        pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
            self.headers = headers;
            self
        }

        /// Fail with `DeadlineExceeded` if the call, retries included,
        /// takes longer than `timeout`
        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = Some(timeout);
            self
        }
    };
}

macro_rules! operation_options {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl OperationOptions for $ty {
                fn headers(&self) -> &HashMap<String, String> {
                    &self.headers
                }

                fn timeout(&self) -> Option<Duration> {
                    self.timeout
                }
            }
        )+
    };
}

/// Options for untyped calls such as
/// [`get_setting_json`](crate::ZonesSettingsV1::get_setting_json)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    request_builders!();
}

/// Options for reading setting `S`
#[derive(Debug, Clone)]
pub struct GetSettingOptions<S: ZoneSetting> {
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
    setting: PhantomData<S>,
}

impl<S: ZoneSetting> GetSettingOptions<S> {
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            timeout: None,
            setting: PhantomData,
        }
    }

    request_builders!();
}

impl<S: ZoneSetting> Default for GetSettingOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ZoneSetting> From<RequestOptions> for GetSettingOptions<S> {
    fn from(options: RequestOptions) -> Self {
        Self {
            headers: options.headers,
            timeout: options.timeout,
            setting: PhantomData,
        }
    }
}

/// Options for changing setting `S`.
///
/// Without a value the request body is `{}` and the setting is left as is.
#[derive(Debug, Clone)]
pub struct UpdateSettingOptions<S: ZoneSetting> {
    pub value: Option<S::Value>,
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
    setting: PhantomData<S>,
}

impl<S: ZoneSetting> UpdateSettingOptions<S> {
    pub fn new() -> Self {
        Self {
            value: None,
            headers: HashMap::new(),
            timeout: None,
            setting: PhantomData,
        }
    }

    pub fn with_value(mut self, value: impl Into<S::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    request_builders!();
}

impl<S: ZoneSetting> Default for UpdateSettingOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetZoneDnssecOptions {
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl GetZoneDnssecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    request_builders!();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateZoneDnssecOptions {
    pub status: Option<DnssecStatus>,
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl UpdateZoneDnssecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: DnssecStatus) -> Self {
        self.status = Some(status);
        self
    }

    request_builders!();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLogRetentionOptions {
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl GetLogRetentionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    request_builders!();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateLogRetentionOptions {
    pub flag: Option<bool>,
    pub headers: HashMap<String, String>,
    pub timeout: Option<Duration>,
}

impl UpdateLogRetentionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, flag: bool) -> Self {
        self.flag = Some(flag);
        self
    }

    request_builders!();
}

operation_options!(
    RequestOptions,
    GetZoneDnssecOptions,
    UpdateZoneDnssecOptions,
    GetLogRetentionOptions,
    UpdateLogRetentionOptions,
);

impl<S: ZoneSetting> OperationOptions for GetSettingOptions<S> {
    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl<S: ZoneSetting> OperationOptions for UpdateSettingOptions<S> {
    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

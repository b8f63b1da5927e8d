//! # cis-zones-settings
//!
//! Typed client for the CIS zone settings API: DNSSEC, TLS versions, HTTP/2
//! and HTTP/3, minification, bot management and the rest of the per-zone
//! switches.
//!
//! Each setting is a [`ZoneSetting`] marker type. Read one with
//! [`ZonesSettingsV1::get_setting`] or its named wrapper, change it with
//! [`ZonesSettingsV1::update_setting`]:
//!
//! ```rust,no_run
//! use cis_zones_settings::{
//!     TlsVersion, UpdateMinTlsVersionOptions, ZonesSettingsV1, ZonesSettingsV1Options,
//! };
//!
//! # async fn run() -> cis_zones_settings::Result<()> {
//! let client = ZonesSettingsV1::new(ZonesSettingsV1Options::new("crn:v1:...", "zone-id"))?;
//!
//! let options = UpdateMinTlsVersionOptions::new().with_value(TlsVersion::V1_2);
//! let response = client.update_min_tls_version(&options).await?;
//! if let Some(resp) = response.result {
//!     println!("{} = {}", resp.result.id, resp.result.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Transport behaviour (retries, gzip, deadlines, errors) comes from
//! [`cis_core`].

pub mod models;
pub mod options;
pub mod service;
pub mod settings;

pub use models::*;
pub use options::{
    GetLogRetentionOptions, GetSettingOptions, GetZoneDnssecOptions, OperationOptions,
    RequestOptions, UpdateLogRetentionOptions, UpdateSettingOptions, UpdateZoneDnssecOptions,
};
pub use service::{
    DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL, ZonesSettingsV1, ZonesSettingsV1Options,
};
pub use settings::*;

pub use cis_core::{CoreError, DetailedResponse, Result};

//! CIS zone settings CLI library
//!
//! Argument types, client construction and command handlers for the
//! `cis-settings` binary.

pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use cis_core::ServiceConfig;
use cis_zones_settings::{
    DEFAULT_SERVICE_NAME, DnssecStatus, RequestOptions, SettingKind, ZonesSettingsV1,
};
use std::time::Duration;
use tracing::debug;

pub use crate::commands::{
    dnssec::handle as handle_dnssec, log_retention::handle as handle_log_retention,
    settings::handle_all, settings::handle_get, settings::handle_list, settings::handle_set,
};

/// Connection settings shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// CRN of the CIS instance
    #[arg(long, env = "CIS_CRN", global = true)]
    pub crn: Option<String>,

    /// Zone identifier
    #[arg(long = "zone", env = "CIS_ZONE_ID", global = true)]
    pub zone_id: Option<String>,

    /// Service name used to look up `<NAME>_*` environment configuration
    #[arg(long, default_value = DEFAULT_SERVICE_NAME, global = true)]
    pub service_name: String,

    /// Override the service URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Retry transient failures up to this many times (0 for the default)
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Per-call deadline in seconds, retries included
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Compress request bodies with gzip
    #[arg(long, global = true)]
    pub gzip: bool,
}

impl ClientArgs {
    /// Build a client from the environment and apply command-line overrides
    pub fn client(&self) -> Result<ZonesSettingsV1> {
        let crn = self
            .crn
            .as_deref()
            .context("missing CRN: pass --crn or set CIS_CRN")?;
        let zone_id = self
            .zone_id
            .as_deref()
            .context("missing zone identifier: pass --zone or set CIS_ZONE_ID")?;

        let config = ServiceConfig::from_env(&self.service_name)?;
        let mut client = ZonesSettingsV1::from_config(&config, crn, zone_id)?;

        if let Some(url) = &self.url {
            client.set_service_url(url)?;
        }
        if self.gzip {
            client.set_enable_gzip_compression(true);
        }
        if let Some(max_retries) = self.max_retries {
            client.enable_retries(max_retries, Duration::ZERO);
        }

        debug!("Using service URL {}", client.service_url());
        Ok(client)
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            timeout: self.timeout.map(Duration::from_secs),
            ..RequestOptions::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum DnssecCommands {
    /// Show the DNSSEC state of the zone
    Get,

    /// Change the DNSSEC state of the zone
    Set {
        /// New status (active, disabled)
        status: DnssecStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogRetentionCommands {
    /// Show whether logs are retained
    Get,

    /// Turn log retention on or off
    Set {
        /// true/false, on/off, yes/no
        #[arg(value_parser = clap::builder::BoolishValueParser::new(), action = clap::ArgAction::Set)]
        flag: bool,
    },
}

/// Arguments of `set`
#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Setting id, e.g. min_tls_version or always-use-https
    pub setting: SettingKind,

    /// New value as JSON; bare words are taken as strings
    pub value: String,
}

/// Output format
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

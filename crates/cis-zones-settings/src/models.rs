//! Request and response models
//!
//! Every setting response shares one envelope: `{"result": {...},
//! "success": bool, "errors": [...], "messages": [...]}`. The `result`
//! carries the setting id, its value, whether it can be edited on the
//! current plan, and when it was last changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseValueError {}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(ParseValueError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// On/off switch used by most boolean settings
    Toggle, "toggle" {
        On => "on",
        Off => "off",
    }
}

impl From<bool> for Toggle {
    fn from(enabled: bool) -> Self {
        if enabled { Self::On } else { Self::Off }
    }
}

impl Toggle {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

string_enum! {
    /// Minimum TLS version accepted from visitors
    TlsVersion, "TLS version" {
        V1_0 => "1.0",
        V1_1 => "1.1",
        V1_2 => "1.2",
        V1_3 => "1.3",
    }
}

string_enum! {
    CnameFlatteningMode, "CNAME flattening mode" {
        FlattenAtRoot => "flatten_at_root",
        FlattenAll => "flatten_all",
    }
}

string_enum! {
    ImageSizeMode, "image size optimization" {
        Off => "off",
        Lossless => "lossless",
        Lossy => "lossy",
    }
}

string_enum! {
    /// How pseudo IPv4 addresses are exposed to the origin
    PseudoIpv4Mode, "pseudo IPv4 mode" {
        Off => "off",
        AddHeader => "add_header",
        OverwriteHeader => "overwrite_header",
    }
}

string_enum! {
    /// Post-quantum key agreement towards the origin
    PostQuantumMode, "post-quantum encryption mode" {
        Preferred => "preferred",
        Supported => "supported",
        Off => "off",
    }
}

string_enum! {
    DnssecStatus, "DNSSEC status" {
        Active => "active",
        Disabled => "disabled",
        Pending => "pending",
        PendingDisabled => "pending-disabled",
        Error => "error",
    }
}

string_enum! {
    /// Maximum HTTP version used towards the origin
    HttpVersion, "origin HTTP version" {
        Http1 => "1",
        Http2 => "2",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifyValue {
    pub css: Toggle,
    pub html: Toggle,
    pub js: Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeaderValue {
    pub strict_transport_security: StrictTransportSecurity,
}

/// HSTS parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrictTransportSecurity {
    pub enabled: bool,
    /// Seconds
    pub max_age: i64,
    pub include_subdomains: bool,
    pub nosniff: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileRedirectValue {
    pub status: Toggle,
    pub mobile_subdomain: String,
    pub strip_uri: bool,
}

/// Bot management knobs. Unset fields are left unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotManagementValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_score: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_js: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_latest_model: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_bots_protection: Option<String>,
}

/// Envelope of every setting response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingResp<V> {
    pub result: SettingResult<V>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<Vec<String>>,
    #[serde(default)]
    pub messages: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingResult<V> {
    pub id: String,
    pub value: V,
    /// Absent for settings that are always editable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecResp {
    pub result: DnssecResult,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<Vec<String>>,
    #[serde(default)]
    pub messages: Vec<Vec<String>>,
}

/// DNSSEC state of the zone. Key material is only present once active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecResult {
    pub status: DnssecStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ds: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_tag: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRetentionResp {
    pub result: LogRetentionResult,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<Vec<String>>,
    #[serde(default)]
    pub messages: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRetentionResult {
    pub flag: bool,
}

//! Zone setting catalogue
//!
//! Every setting lives under `/v1/{crn}/zones/{zone_identifier}/settings/<id>`
//! and is read with GET and changed with PATCH. A setting is described once
//! by a marker type implementing [`ZoneSetting`]; the generic operations on
//! [`ZonesSettingsV1`] do the rest. The `zone_settings!` table below also
//! generates the named per-setting methods, option aliases and the
//! [`SettingKind`] enum used for dynamic dispatch.

use cis_core::{CoreError, DetailedResponse, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

use crate::models::{
    BotManagementValue, CnameFlatteningMode, HttpVersion, ImageSizeMode, MinifyValue,
    MobileRedirectValue, ParseValueError, PostQuantumMode, PseudoIpv4Mode, SecurityHeaderValue,
    SettingResp, TlsVersion, Toggle,
};
use crate::options::{GetSettingOptions, UpdateSettingOptions};
use crate::service::ZonesSettingsV1;

/// A single zone setting
pub trait ZoneSetting: Send + Sync + 'static {
    /// Setting id, the last path segment
    const ID: &'static str;

    /// Path template relative to the service URL
    const PATH: &'static str;

    /// Analytics operation ids
    const GET_OPERATION: &'static str;
    const UPDATE_OPERATION: &'static str;

    type Value: Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Encode the PATCH body. Defaults to `{"value": ...}`, or `{}` when no
    /// value was given.
    fn update_body(value: Option<&Self::Value>) -> serde_json::Result<Vec<u8>> {
        match value {
            Some(value) => serde_json::to_vec(&ValueBody { value }),
            None => Ok(b"{}".to_vec()),
        }
    }
}

#[derive(Serialize)]
struct ValueBody<'a, V: Serialize> {
    value: &'a V,
}

/// Bot management takes its fields at the top level of the body
fn flattened_body(value: Option<&BotManagementValue>) -> serde_json::Result<Vec<u8>> {
    match value {
        Some(value) => serde_json::to_vec(value),
        None => Ok(b"{}".to_vec()),
    }
}

macro_rules! zone_settings {
    ($(
        $(#[$meta:meta])*
        $marker:ident => $id:literal: $value:ty {
            $get:ident, $update:ident,
            $get_opts:ident, $update_opts:ident, $resp:ident
            $(, encode = $encode:path)?
        }
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $marker;

            impl ZoneSetting for $marker {
                const ID: &'static str = $id;
                const PATH: &'static str =
                    concat!("/v1/{crn}/zones/{zone_identifier}/settings/", $id);
                const GET_OPERATION: &'static str = stringify!($get);
                const UPDATE_OPERATION: &'static str = stringify!($update);

                type Value = $value;

                $(
                    fn update_body(value: Option<&Self::Value>) -> serde_json::Result<Vec<u8>> {
                        $encode(value)
                    }
                )?
            }

            pub type $get_opts = GetSettingOptions<$marker>;
            pub type $update_opts = UpdateSettingOptions<$marker>;
            pub type $resp = SettingResp<$value>;
        )+

        impl ZonesSettingsV1 {
            $(
                #[doc = concat!("Read the `", $id, "` setting")]
                pub async fn $get(
                    &self,
                    options: &$get_opts,
                ) -> Result<DetailedResponse<$resp>> {
                    self.get_setting::<$marker>(options).await
                }

                #[doc = concat!("Change the `", $id, "` setting")]
                pub async fn $update(
                    &self,
                    options: &$update_opts,
                ) -> Result<DetailedResponse<$resp>> {
                    self.update_setting::<$marker>(options).await
                }
            )+
        }

        /// Runtime handle for every known setting
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SettingKind {
            $($marker,)+
        }

        impl SettingKind {
            pub const ALL: &'static [Self] = &[$(Self::$marker),+];

            pub const fn id(self) -> &'static str {
                match self {
                    $(Self::$marker => <$marker as ZoneSetting>::ID,)+
                }
            }

            pub const fn path(self) -> &'static str {
                match self {
                    $(Self::$marker => <$marker as ZoneSetting>::PATH,)+
                }
            }

            pub const fn get_operation(self) -> &'static str {
                match self {
                    $(Self::$marker => <$marker as ZoneSetting>::GET_OPERATION,)+
                }
            }

            pub const fn update_operation(self) -> &'static str {
                match self {
                    $(Self::$marker => <$marker as ZoneSetting>::UPDATE_OPERATION,)+
                }
            }

            /// Check `value` against the setting's value type and encode the
            /// PATCH body from the typed value
            pub fn encode_update(self, value: serde_json::Value) -> Result<Vec<u8>> {
                match self {
                    $(Self::$marker => {
                        let typed: <$marker as ZoneSetting>::Value = serde_json::from_value(value)
                            .map_err(|e| CoreError::validation(format!(
                                "invalid value for setting '{}': {e}", $id
                            )))?;
                        <$marker as ZoneSetting>::update_body(Some(&typed)).map_err(CoreError::Encode)
                    })+
                }
            }
        }
    };
}

zone_settings! {
    CnameFlattening => "cname_flattening": CnameFlatteningMode {
        get_zone_cname_flattening, update_zone_cname_flattening,
        GetZoneCnameFlatteningOptions, UpdateZoneCnameFlatteningOptions, ZoneCnameFlatteningResp
    }
    OpportunisticEncryption => "opportunistic_encryption": Toggle {
        get_opportunistic_encryption, update_opportunistic_encryption,
        GetOpportunisticEncryptionOptions, UpdateOpportunisticEncryptionOptions, OpportunisticEncryptionResp
    }
    /// Seconds a visitor stays trusted after passing a challenge
    ChallengeTtl => "challenge_ttl": i64 {
        get_challenge_ttl, update_challenge_ttl,
        GetChallengeTtlOptions, UpdateChallengeTtlOptions, ChallengeTtlResp
    }
    AutomaticHttpsRewrites => "automatic_https_rewrites": Toggle {
        get_automatic_https_rewrites, update_automatic_https_rewrites,
        GetAutomaticHttpsRewritesOptions, UpdateAutomaticHttpsRewritesOptions, AutomaticHttpsRewritesResp
    }
    TrueClientIpHeader => "true_client_ip_header": Toggle {
        get_true_client_ip, update_true_client_ip,
        GetTrueClientIpOptions, UpdateTrueClientIpOptions, TrueClientIpResp
    }
    AlwaysUseHttps => "always_use_https": Toggle {
        get_always_use_https, update_always_use_https,
        GetAlwaysUseHttpsOptions, UpdateAlwaysUseHttpsOptions, AlwaysUseHttpsResp
    }
    ImageSizeOptimization => "image_size_optimization": ImageSizeMode {
        get_image_size_optimization, update_image_size_optimization,
        GetImageSizeOptimizationOptions, UpdateImageSizeOptimizationOptions, ImageSizeOptimizationResp
    }
    ScriptLoadOptimization => "script_load_optimization": Toggle {
        get_script_load_optimization, update_script_load_optimization,
        GetScriptLoadOptimizationOptions, UpdateScriptLoadOptimizationOptions, ScriptLoadOptimizationResp
    }
    ImageLoadOptimization => "image_load_optimization": Toggle {
        get_image_load_optimization, update_image_load_optimization,
        GetImageLoadOptimizationOptions, UpdateImageLoadOptimizationOptions, ImageLoadOptimizationResp
    }
    Minify => "minify": MinifyValue {
        get_minify, update_minify,
        GetMinifyOptions, UpdateMinifyOptions, MinifyResp
    }
    MinTlsVersion => "min_tls_version": TlsVersion {
        get_min_tls_version, update_min_tls_version,
        GetMinTlsVersionOptions, UpdateMinTlsVersionOptions, MinTlsVersionResp
    }
    IpGeolocation => "ip_geolocation": Toggle {
        get_ip_geolocation, update_ip_geolocation,
        GetIpGeolocationOptions, UpdateIpGeolocationOptions, IpGeolocationResp
    }
    ServerSideExclude => "server_side_exclude": Toggle {
        get_server_side_exclude, update_server_side_exclude,
        GetServerSideExcludeOptions, UpdateServerSideExcludeOptions, ServerSideExcludeResp
    }
    SecurityHeader => "security_header": SecurityHeaderValue {
        get_security_header, update_security_header,
        GetSecurityHeaderOptions, UpdateSecurityHeaderOptions, SecurityHeaderResp
    }
    MobileRedirect => "mobile_redirect": MobileRedirectValue {
        get_mobile_redirect, update_mobile_redirect,
        GetMobileRedirectOptions, UpdateMobileRedirectOptions, MobileRedirectResp
    }
    PrefetchPreload => "prefetch_preload": Toggle {
        get_prefetch_preload, update_prefetch_preload,
        GetPrefetchPreloadOptions, UpdatePrefetchPreloadOptions, PrefetchPreloadResp
    }
    Http2 => "http2": Toggle {
        get_http2, update_http2,
        GetHttp2Options, UpdateHttp2Options, Http2Resp
    }
    Http3 => "http3": Toggle {
        get_http3, update_http3,
        GetHttp3Options, UpdateHttp3Options, Http3Resp
    }
    Ipv6 => "ipv6": Toggle {
        get_ipv6, update_ipv6,
        GetIpv6Options, UpdateIpv6Options, Ipv6Resp
    }
    WebSockets => "websockets": Toggle {
        get_web_sockets, update_web_sockets,
        GetWebSocketsOptions, UpdateWebSocketsOptions, WebSocketsResp
    }
    PseudoIpv4 => "pseudo_ipv4": PseudoIpv4Mode {
        get_pseudo_ipv4, update_pseudo_ipv4,
        GetPseudoIpv4Options, UpdatePseudoIpv4Options, PseudoIpv4Resp
    }
    ResponseBuffering => "response_buffering": Toggle {
        get_response_buffering, update_response_buffering,
        GetResponseBufferingOptions, UpdateResponseBufferingOptions, ResponseBufferingResp
    }
    HotlinkProtection => "hotlink_protection": Toggle {
        get_hotlink_protection, update_hotlink_protection,
        GetHotlinkProtectionOptions, UpdateHotlinkProtectionOptions, HotlinkProtectionResp
    }
    /// Maximum upload size in megabytes
    MaxUpload => "max_upload": i64 {
        get_max_upload, update_max_upload,
        GetMaxUploadOptions, UpdateMaxUploadOptions, MaxUploadResp
    }
    TlsClientAuth => "tls_client_auth": Toggle {
        get_tls_client_auth, update_tls_client_auth,
        GetTlsClientAuthOptions, UpdateTlsClientAuthOptions, TlsClientAuthResp
    }
    BrowserCheck => "browser_check": Toggle {
        get_browser_check, update_browser_check,
        GetBrowserCheckOptions, UpdateBrowserCheckOptions, BrowserCheckResp
    }
    OriginErrorPagePassThru => "origin_error_page_pass_thru": Toggle {
        get_enable_error_pages_on, update_enable_error_pages_on,
        GetEnableErrorPagesOnOptions, UpdateEnableErrorPagesOnOptions, OriginErrorPagePassThruResp
    }
    Waf => "waf": Toggle {
        get_web_application_firewall, update_web_application_firewall,
        GetWebApplicationFirewallOptions, UpdateWebApplicationFirewallOptions, WafResp
    }
    /// Allowed cipher suites, empty for the service default
    Ciphers => "ciphers": Vec<String> {
        get_ciphers, update_ciphers,
        GetCiphersOptions, UpdateCiphersOptions, CiphersResp
    }
    OriginMaxHttpVersion => "origin_max_http_version": HttpVersion {
        get_origin_max_http_version, update_origin_max_http_version,
        GetOriginMaxHttpVersionOptions, UpdateOriginMaxHttpVersionOptions, OriginMaxHttpVersionResp
    }
    OriginPostQuantumEncryption => "origin_post_quantum_encryption": PostQuantumMode {
        get_origin_post_quantum_encryption, update_origin_post_quantum_encryption,
        GetOriginPostQuantumEncryptionOptions, UpdateOriginPostQuantumEncryptionOptions,
        OriginPostQuantumEncryptionResp
    }
    BotManagement => "bot_management": BotManagementValue {
        get_bot_management, update_bot_management,
        GetBotManagementOptions, UpdateBotManagementOptions, BotManagementResp,
        encode = flattened_body
    }
    ReplaceInsecureJs => "replace_insecure_js": Toggle {
        get_replace_insecure_js, update_replace_insecure_js,
        GetReplaceInsecureJsOptions, UpdateReplaceInsecureJsOptions, ReplaceInsecureJsResp
    }
    EmailObfuscation => "email_obfuscation": Toggle {
        get_email_obfuscation, update_email_obfuscation,
        GetEmailObfuscationOptions, UpdateEmailObfuscationOptions, EmailObfuscationResp
    }
    /// Seconds to wait for the origin before giving up
    ProxyReadTimeout => "proxy_read_timeout": i64 {
        get_proxy_read_timeout, update_proxy_read_timeout,
        GetProxyReadTimeoutOptions, UpdateProxyReadTimeoutOptions, ProxyReadTimeoutResp
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SettingKind {
    type Err = ParseValueError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Accept both the wire id and the dashed form used on command lines
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| ParseValueError {
                kind: "zone setting",
                value: s.to_string(),
            })
    }
}

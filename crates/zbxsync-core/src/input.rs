//! Raw desired-state records as supplied by the catalog collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::DiagnosticSink;
use crate::host::Macro;

pub(crate) const GROUP_DEPRECATION: &str =
    "Passing group to zabbix_host is deprecated and will be removed. Use groups instead.";

/// One raw host record, before migration, munging and validation.
///
/// Every field is optional. Fields that go through normalization (`use_ip`,
/// `group_create`, `tls_connect`, `tls_accept`) are carried as raw JSON
/// values so the source representation — native boolean, string token or
/// number — survives until the munge step. `port` stays raw because the
/// catalog may spell it as a string or an integer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "interfaceid", skip_serializing_if = "Option::is_none")]
    pub interface_id: Option<Value>,
    #[serde(rename = "ipaddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(rename = "interfacetype", skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<i64>,
    #[serde(rename = "interfacedetails", skip_serializing_if = "Option::is_none")]
    pub interface_details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ip: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_create: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macros: Option<Vec<Macro>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_connect: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_accept: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_subject: Option<String>,
}

impl HostInput {
    /// Record with only the hostname set, everything else unmanaged.
    pub fn named(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }
}

/// Move the deprecated `group` field onto `groups`.
///
/// Pure preprocessing step, run once before validation. When only `group`
/// is set it becomes a single-element `groups` and `group` is cleared. A
/// record without `group` passes through untouched and emits nothing.
///
/// When both fields were supplied the record is returned as-is so the
/// validation step can reject the pair; migration itself can never produce
/// that state. The deprecation warning is emitted whenever `group` was set,
/// exactly once.
pub fn migrate(mut input: HostInput, sink: &dyn DiagnosticSink) -> HostInput {
    let Some(group) = input.group.take() else {
        return input;
    };

    sink.warn(GROUP_DEPRECATION);

    if input.groups.is_some() {
        input.group = Some(group);
    } else {
        input.groups = Some(vec![group]);
    }
    input
}

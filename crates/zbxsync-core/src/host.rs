use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::DiagnosticSink;
use crate::error::{CoreError, Result};
use crate::input::{HostInput, migrate};
use crate::munge::{TlsMode, munge_boolean, munge_encryption};

/// Credentials file that must exist before a host is reconciled.
///
/// Declared as an ordering hint for the external scheduler; this crate never
/// checks or creates the file.
pub const API_CONFIG_FILE: &str = "/etc/zabbix/api.conf";

/// Lifecycle intent for a managed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}

impl FromStr for Ensure {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(Ensure::Present),
            "absent" => Ok(Ensure::Absent),
            _ => Err(CoreError::invalid_value("ensure only takes present or absent")),
        }
    }
}

/// One user macro, a (name, value) pair keyed by name.
///
/// Duplicate names are kept as-is; only the sorted-by-name view is used
/// when comparing macro lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macro {
    #[serde(rename = "macro")]
    pub name: String,
    pub value: String,
}

impl Macro {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Schema of fields the desired-state author may never write.
///
/// These are server-assigned and only populated from an observed read.
const OBSERVATIONAL_FIELDS: &[(&str, fn(&HostInput) -> bool)] = &[
    ("id", |input| input.id.is_some()),
    ("interfaceid", |input| input.interface_id.is_some()),
];

fn check_writable(input: &HostInput) -> Result<()> {
    for (name, is_set) in OBSERVATIONAL_FIELDS {
        if is_set(input) {
            return Err(CoreError::validation(format!(
                "{name} is read-only and is only available from an observed read"
            )));
        }
    }
    Ok(())
}

fn check_exclusive_groups(input: &HostInput) -> Result<()> {
    if input.group.is_some() && input.groups.is_some() {
        return Err(CoreError::validation(
            "The properties group and groups are mutually exclusive.",
        ));
    }
    Ok(())
}

/// A normalized, validated desired-state record for one monitored host.
///
/// Built once per reconciliation pass via [`HostSpec::from_input`] and
/// treated as immutable by the comparison step. The hostname is the natural
/// key and never changes after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSpec {
    pub hostname: String,
    #[serde(default)]
    pub ensure: Ensure,
    /// Server-assigned host identifier, observational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Server-assigned interface identifier, observational only.
    #[serde(rename = "interfaceid", default, skip_serializing_if = "Option::is_none")]
    pub interface_id: Option<String>,
    #[serde(rename = "ipaddress", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(rename = "interfacetype", default = "default_interface_type")]
    pub interface_type: i64,
    /// Additional interface details, carried opaquely.
    #[serde(rename = "interfacedetails", default, skip_serializing_if = "Option::is_none")]
    pub interface_details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_ip: Option<bool>,
    /// Agent port, kept as the catalog spelled it (string or integer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Instruction for the apply step: create missing groups instead of
    /// treating them as an error. Not a comparable property.
    #[serde(default)]
    pub group_create: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub macros: Vec<Macro>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_connect: Option<TlsMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_accept: Option<TlsMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_subject: Option<String>,
}

fn default_interface_type() -> i64 {
    1
}

impl HostSpec {
    /// Spec with only the hostname managed; everything else defaulted.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ensure: Ensure::default(),
            id: None,
            interface_id: None,
            ip_address: None,
            interface_type: default_interface_type(),
            interface_details: None,
            use_ip: None,
            port: None,
            groups: Vec::new(),
            group_create: false,
            templates: Vec::new(),
            macros: Vec::new(),
            proxy: None,
            tls_connect: None,
            tls_accept: None,
            tls_issuer: None,
            tls_subject: None,
        }
    }

    /// Build a validated spec from a raw catalog record.
    ///
    /// Order of operations: group migration, writable-schema check, per-field
    /// munging, then the mutual-exclusion validation. Any failure aborts
    /// construction for this host; there is no partially valid spec.
    pub fn from_input(input: HostInput, sink: &dyn DiagnosticSink) -> Result<Self> {
        let input = migrate(input, sink);
        check_writable(&input)?;
        check_exclusive_groups(&input)?;

        let hostname = input
            .hostname
            .ok_or_else(|| CoreError::validation("hostname is required"))?;
        let ensure = match input.ensure.as_deref() {
            Some(token) => token.parse()?,
            None => Ensure::default(),
        };
        let use_ip = input.use_ip.as_ref().map(munge_boolean).transpose()?;
        let group_create = input
            .group_create
            .as_ref()
            .map(munge_boolean)
            .transpose()?
            .unwrap_or(false);
        let tls_connect = input.tls_connect.as_ref().map(munge_encryption).transpose()?;
        let tls_accept = input.tls_accept.as_ref().map(munge_encryption).transpose()?;

        Ok(Self {
            hostname,
            ensure,
            id: None,
            interface_id: None,
            ip_address: input.ip_address,
            interface_type: input.interface_type.unwrap_or_else(default_interface_type),
            interface_details: input.interface_details,
            use_ip,
            port: input.port,
            groups: input.groups.unwrap_or_default(),
            group_create,
            templates: input.templates.unwrap_or_default(),
            macros: input.macros.unwrap_or_default(),
            proxy: input.proxy,
            tls_connect,
            tls_accept,
            tls_issuer: input.tls_issuer,
            tls_subject: input.tls_subject,
        })
    }

    /// Copy the server-assigned identifiers from an observed read.
    ///
    /// This is the only path that populates `id` and `interfaceid`; the
    /// desired-state path rejects both.
    pub fn with_server_ids(
        mut self,
        id: impl Into<String>,
        interface_id: impl Into<String>,
    ) -> Self {
        self.id = Some(id.into());
        self.interface_id = Some(interface_id.into());
        self
    }

    pub fn with_ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = ensure;
        self
    }

    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_port(mut self, port: Value) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_templates(mut self, templates: Vec<String>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_macros(mut self, macros: Vec<Macro>) -> Self {
        self.macros = macros;
        self
    }

    pub fn with_tls(mut self, connect: TlsMode, accept: TlsMode) -> Self {
        self.tls_connect = Some(connect);
        self.tls_accept = Some(accept);
        self
    }

    /// Ordering hint for the scheduler: the file this host's reconciliation
    /// depends on. Never verified here.
    pub fn autorequire(&self) -> &'static str {
        API_CONFIG_FILE
    }

    pub fn is_present(&self) -> bool {
        matches!(self.ensure, Ensure::Present)
    }
}

//! Per-property equality rules and minimal changeset construction.
//!
//! The external diff/apply loop never compares raw values blindly: each
//! property carries a [`SyncRule`] deciding how (observed, desired) are
//! compared. A property the desired spec leaves unmanaged is always in sync.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};
use crate::host::{Ensure, HostSpec, Macro};

/// Comparable properties of a host record.
///
/// `group_create` is deliberately absent: it is an instruction to the apply
/// step, not a property with sync status. `id` and `interfaceid` are absent
/// because they are observational and never reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Ipaddress,
    Interfacetype,
    Interfacedetails,
    UseIp,
    Port,
    Groups,
    Templates,
    Macros,
    Proxy,
    TlsConnect,
    TlsAccept,
    TlsIssuer,
    TlsSubject,
}

impl Property {
    pub const ALL: [Property; 13] = [
        Property::Ipaddress,
        Property::Interfacetype,
        Property::Interfacedetails,
        Property::UseIp,
        Property::Port,
        Property::Groups,
        Property::Templates,
        Property::Macros,
        Property::Proxy,
        Property::TlsConnect,
        Property::TlsAccept,
        Property::TlsIssuer,
        Property::TlsSubject,
    ];

    /// The equality rule applied when deciding whether this property is in
    /// sync.
    pub fn rule(self) -> SyncRule {
        match self {
            Property::Interfacedetails => SyncRule::Text,
            Property::Port | Property::TlsConnect | Property::TlsAccept => SyncRule::Numeric,
            Property::Groups | Property::Templates => SyncRule::UnorderedSet,
            Property::Macros => SyncRule::KeyedPairs,
            _ => SyncRule::Exact,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Property::Ipaddress => "ipaddress",
            Property::Interfacetype => "interfacetype",
            Property::Interfacedetails => "interfacedetails",
            Property::UseIp => "use_ip",
            Property::Port => "port",
            Property::Groups => "groups",
            Property::Templates => "templates",
            Property::Macros => "macros",
            Property::Proxy => "proxy",
            Property::TlsConnect => "tls_connect",
            Property::TlsAccept => "tls_accept",
            Property::TlsIssuer => "tls_issuer",
            Property::TlsSubject => "tls_subject",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Property {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ipaddress" => Ok(Property::Ipaddress),
            "interfacetype" => Ok(Property::Interfacetype),
            "interfacedetails" => Ok(Property::Interfacedetails),
            "use_ip" => Ok(Property::UseIp),
            "port" => Ok(Property::Port),
            "groups" => Ok(Property::Groups),
            "templates" => Ok(Property::Templates),
            "macros" => Ok(Property::Macros),
            "proxy" => Ok(Property::Proxy),
            "tls_connect" => Ok(Property::TlsConnect),
            "tls_accept" => Ok(Property::TlsAccept),
            "tls_issuer" => Ok(Property::TlsIssuer),
            "tls_subject" => Ok(Property::TlsSubject),
            _ => Err(CoreError::invalid_value(format!("unknown property: {s}"))),
        }
    }
}

/// Equality rule for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRule {
    /// Exact value equality.
    Exact,
    /// Compare the string forms of both sides.
    Text,
    /// Compare both sides as integers.
    Numeric,
    /// Sort both sequences, then compare element-wise.
    UnorderedSet,
    /// Sort both pair sequences by key, then compare element-wise.
    KeyedPairs,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_int(value: &Value) -> i64 {
    // Mirrors the lenient integer coercion of the original resource:
    // unparseable input counts as 0.
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// String-form equality.
pub fn text_eq(observed: &Value, desired: &Value) -> bool {
    value_text(observed) == value_text(desired)
}

/// Integer equality after coercion, so `"10050"` matches `10050`.
pub fn numeric_eq(observed: &Value, desired: &Value) -> bool {
    value_int(observed) == value_int(desired)
}

/// Membership equality: sort both sequences, compare element-wise.
pub fn set_eq(observed: &[String], desired: &[String]) -> bool {
    let mut is = observed.to_vec();
    let mut should = desired.to_vec();
    is.sort();
    should.sort();
    is == should
}

/// Keyed-pair equality: sort both sequences by macro name, compare
/// element-wise. Duplicate names are not deduplicated.
pub fn macros_eq(observed: &[Macro], desired: &[Macro]) -> bool {
    let by_name = |macros: &[Macro]| {
        let mut sorted = macros.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    };
    by_name(observed) == by_name(desired)
}

impl HostSpec {
    /// Snapshot of one property's value, `None` when unmanaged.
    ///
    /// Sequence properties report `None` when empty, which the comparison
    /// step reads as "not managed by this spec".
    pub fn property_value(&self, property: Property) -> Option<Value> {
        match property {
            Property::Ipaddress => self.ip_address.clone().map(Value::String),
            Property::Interfacetype => Some(json!(self.interface_type)),
            Property::Interfacedetails => self.interface_details.clone(),
            Property::UseIp => self.use_ip.map(Value::Bool),
            Property::Port => self.port.clone(),
            Property::Groups => (!self.groups.is_empty()).then(|| json!(self.groups)),
            Property::Templates => (!self.templates.is_empty()).then(|| json!(self.templates)),
            Property::Macros => (!self.macros.is_empty()).then(|| json!(self.macros)),
            Property::Proxy => self.proxy.clone().map(Value::String),
            Property::TlsConnect => self.tls_connect.map(|mode| json!(mode.as_code())),
            Property::TlsAccept => self.tls_accept.map(|mode| json!(mode.as_code())),
            Property::TlsIssuer => self.tls_issuer.clone().map(Value::String),
            Property::TlsSubject => self.tls_subject.clone().map(Value::String),
        }
    }
}

/// Whether one property of `desired` is satisfied by `observed`.
pub fn property_in_sync(property: Property, observed: &HostSpec, desired: &HostSpec) -> bool {
    match property {
        Property::Groups => desired.groups.is_empty() || set_eq(&observed.groups, &desired.groups),
        Property::Templates => {
            desired.templates.is_empty() || set_eq(&observed.templates, &desired.templates)
        }
        Property::Macros => {
            desired.macros.is_empty() || macros_eq(&observed.macros, &desired.macros)
        }
        _ => {
            let Some(should) = desired.property_value(property) else {
                return true;
            };
            let Some(is) = observed.property_value(property) else {
                return false;
            };
            match property.rule() {
                SyncRule::Text => text_eq(&is, &should),
                SyncRule::Numeric => numeric_eq(&is, &should),
                _ => is == should,
            }
        }
    }
}

/// Properties of `desired` that are out of sync with `observed`.
pub fn diff(observed: &HostSpec, desired: &HostSpec) -> Vec<Property> {
    Property::ALL
        .into_iter()
        .filter(|property| !property_in_sync(*property, observed, desired))
        .collect()
}

/// Whether the host requires a change at all: lifecycle intent differs or
/// any managed property is out of sync.
pub fn needs_change(observed: &HostSpec, desired: &HostSpec) -> bool {
    observed.ensure != desired.ensure || !diff(observed, desired).is_empty()
}

/// Minimal update for one host, handed to the apply collaborator.
///
/// Only out-of-sync properties appear in `updates`. The group-create side
/// channel rides along as an instruction, never as a compared property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Changeset {
    pub hostname: String,
    pub ensure: Ensure,
    pub updates: IndexMap<Property, Value>,
    pub group_create: bool,
}

impl Changeset {
    /// Collect the out-of-sync properties of `desired` against `observed`.
    pub fn build(observed: &HostSpec, desired: &HostSpec) -> Self {
        let mut updates = IndexMap::new();
        for property in Property::ALL {
            if !property_in_sync(property, observed, desired)
                && let Some(value) = desired.property_value(property)
            {
                updates.insert(property, value);
            }
        }
        Self {
            hostname: desired.hostname.clone(),
            ensure: desired.ensure,
            updates,
            group_create: desired.group_create,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

const BOOLEAN_DOMAIN: &str = "munge_boolean only takes booleans";
const ENCRYPTION_DOMAIN: &str = "munge_encryption only takes unencrypted, psk or cert";

/// Connection encryption mode for a host, as the Zabbix API encodes it.
///
/// The wire representation is always the numeric code: 1 (unencrypted),
/// 2 (PSK) or 4 (certificate). No other code can exist on a valid spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TlsMode {
    Unencrypted = 1,
    Psk = 2,
    Cert = 4,
}

impl TlsMode {
    /// Numeric Zabbix API code for this mode
    pub fn as_code(self) -> u8 {
        self as u8
    }
}

impl From<TlsMode> for u8 {
    fn from(mode: TlsMode) -> u8 {
        mode.as_code()
    }
}

impl TryFrom<u8> for TlsMode {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(TlsMode::Unencrypted),
            2 => Ok(TlsMode::Psk),
            4 => Ok(TlsMode::Cert),
            _ => Err(CoreError::invalid_value(ENCRYPTION_DOMAIN)),
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsMode::Unencrypted => write!(f, "unencrypted"),
            TlsMode::Psk => write!(f, "psk"),
            TlsMode::Cert => write!(f, "cert"),
        }
    }
}

impl FromStr for TlsMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unencrypted" => Ok(TlsMode::Unencrypted),
            "psk" => Ok(TlsMode::Psk),
            "cert" => Ok(TlsMode::Cert),
            _ => Err(CoreError::invalid_value(ENCRYPTION_DOMAIN)),
        }
    }
}

/// Normalize a raw value to a strict boolean.
///
/// Accepts native booleans and the "true"/"false" string tokens, regardless
/// of how the catalog spelled them. Anything else is outside the domain.
pub fn munge_boolean(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        _ => Err(CoreError::invalid_value(BOOLEAN_DOMAIN)),
    }
}

/// Normalize a raw value to a [`TlsMode`].
///
/// Accepts the numeric codes 1/2/4 and the "unencrypted"/"psk"/"cert" string
/// tokens. Anything else is outside the domain.
pub fn munge_encryption(value: &Value) -> Result<TlsMode> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(code) if code <= u64::from(u8::MAX) => TlsMode::try_from(code as u8),
            _ => Err(CoreError::invalid_value(ENCRYPTION_DOMAIN)),
        },
        Value::String(s) => s.parse(),
        _ => Err(CoreError::invalid_value(ENCRYPTION_DOMAIN)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_munge_boolean_native() {
        assert_eq!(munge_boolean(&json!(true)).unwrap(), true);
        assert_eq!(munge_boolean(&json!(false)).unwrap(), false);
    }

    #[test]
    fn test_munge_boolean_tokens() {
        assert_eq!(munge_boolean(&json!("true")).unwrap(), true);
        assert_eq!(munge_boolean(&json!("false")).unwrap(), false);
    }

    #[test]
    fn test_munge_boolean_rejects_everything_else() {
        for bad in [json!("maybe"), json!(1), json!(0), json!(null), json!(["true"])] {
            let err = munge_boolean(&bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidValue(_)));
            assert!(err.to_string().contains("munge_boolean only takes booleans"));
        }
    }

    #[test]
    fn test_munge_encryption_codes() {
        assert_eq!(munge_encryption(&json!(1)).unwrap(), TlsMode::Unencrypted);
        assert_eq!(munge_encryption(&json!(2)).unwrap(), TlsMode::Psk);
        assert_eq!(munge_encryption(&json!(4)).unwrap(), TlsMode::Cert);
    }

    #[test]
    fn test_munge_encryption_tokens() {
        assert_eq!(munge_encryption(&json!("unencrypted")).unwrap(), TlsMode::Unencrypted);
        assert_eq!(munge_encryption(&json!("psk")).unwrap(), TlsMode::Psk);
        assert_eq!(munge_encryption(&json!("cert")).unwrap(), TlsMode::Cert);
    }

    #[test]
    fn test_munge_encryption_rejects_everything_else() {
        for bad in [json!(3), json!(0), json!(256), json!(-1), json!("foo"), json!(true)] {
            let err = munge_encryption(&bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidValue(_)));
            assert!(
                err.to_string()
                    .contains("munge_encryption only takes unencrypted, psk or cert")
            );
        }
    }

    #[test]
    fn test_tls_mode_codes() {
        assert_eq!(TlsMode::Unencrypted.as_code(), 1);
        assert_eq!(TlsMode::Psk.as_code(), 2);
        assert_eq!(TlsMode::Cert.as_code(), 4);
    }

    #[test]
    fn test_tls_mode_display_and_from_str() {
        for mode in [TlsMode::Unencrypted, TlsMode::Psk, TlsMode::Cert] {
            let parsed: TlsMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert!("foo".parse::<TlsMode>().is_err());
    }

    #[test]
    fn test_tls_mode_serialization() {
        assert_eq!(serde_json::to_value(TlsMode::Psk).unwrap(), json!(2));
        assert_eq!(serde_json::to_value(TlsMode::Cert).unwrap(), json!(4));
    }

    #[test]
    fn test_tls_mode_deserialization() {
        let mode: TlsMode = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(mode, TlsMode::Unencrypted);

        assert!(serde_json::from_value::<TlsMode>(json!(3)).is_err());
    }
}

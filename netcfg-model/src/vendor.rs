use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device vendor / command language family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Cisco,
    Mikrotik,
    Fortigate,
    Generic,
}

impl Vendor {
    pub const ALL: [Vendor; 4] = [
        Vendor::Cisco,
        Vendor::Mikrotik,
        Vendor::Fortigate,
        Vendor::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Cisco => "cisco",
            Vendor::Mikrotik => "mikrotik",
            Vendor::Fortigate => "fortigate",
            Vendor::Generic => "generic",
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vendor '{0}' (expected cisco, mikrotik, fortigate or generic)")]
pub struct UnknownVendor(pub String);

impl FromStr for Vendor {
    type Err = UnknownVendor;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Vendor::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVendor(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Vendor;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("FortiGate".parse::<Vendor>(), Ok(Vendor::Fortigate));
        assert_eq!(" cisco ".parse::<Vendor>(), Ok(Vendor::Cisco));
    }

    #[test]
    fn rejects_unknown_vendor() {
        let err = "juniper".parse::<Vendor>().unwrap_err();
        assert!(err.to_string().contains("juniper"));
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Vendor::Mikrotik).expect("serialize");
        assert_eq!(json, "\"mikrotik\"");
    }
}

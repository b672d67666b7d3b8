//! Single-intent command templates.
//!
//! Unlike [`crate::render`], which compiles a whole intent model, a generator
//! call turns one action and a flat parameter map into a ready-to-paste CLI
//! snippet for one vendor. Output is deterministic for a given request.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use netcfg_model::Vendor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

mod cisco;
mod fortigate;
mod mikrotik;

pub type Params = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Baseline,
    WanUplink,
    LanVlan,
    DhcpServer,
    StaticRoute,
    Ospf,
    NatOverload,
    FirewallBasic,
    LoadBalancing,
    Bridge,
    SecureBaseline,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Baseline,
        Action::WanUplink,
        Action::LanVlan,
        Action::DhcpServer,
        Action::StaticRoute,
        Action::Ospf,
        Action::NatOverload,
        Action::FirewallBasic,
        Action::LoadBalancing,
        Action::Bridge,
        Action::SecureBaseline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Baseline => "baseline",
            Action::WanUplink => "wan_uplink",
            Action::LanVlan => "lan_vlan",
            Action::DhcpServer => "dhcp_server",
            Action::StaticRoute => "static_route",
            Action::Ospf => "ospf",
            Action::NatOverload => "nat_overload",
            Action::FirewallBasic => "firewall_basic",
            Action::LoadBalancing => "load_balancing",
            Action::Bridge => "bridge",
            Action::SecureBaseline => "secure_baseline",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = GenerateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GenerateError::UnknownAction(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("missing param: {key}")]
    MissingParam { key: String },
    #[error("invalid param {key}: expected {expected}")]
    InvalidParam { key: String, expected: &'static str },
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("vendor '{0}' has no command templates")]
    UnsupportedVendor(Vendor),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateRequest {
    pub vendor: Vendor,
    pub action: Action,
    #[serde(default)]
    pub params: Params,
}

impl GenerateRequest {
    pub fn new(vendor: Vendor, action: Action, params: Params) -> Self {
        Self { vendor, action, params }
    }
}

/// Generate the CLI snippet for `request`.
///
/// # Arguments
///
/// * `request` - vendor, action and the action's parameters
///
/// # Returns
///
/// Newline-joined commands, or the first missing or ill-typed parameter in
/// template order
pub fn generate_config_command(request: &GenerateRequest) -> Result<String, GenerateError> {
    let params = ParamReader::new(&request.params);
    let lines = match request.vendor {
        Vendor::Cisco => cisco::generate(request.action, &params)?,
        Vendor::Fortigate => fortigate::generate(request.action, &params)?,
        Vendor::Mikrotik => mikrotik::generate(request.action, &params)?,
        Vendor::Generic => return Err(GenerateError::UnsupportedVendor(request.vendor)),
    };
    Ok(join(lines))
}

/// Join template lines, dropping the empty ones left by absent optionals.
fn join(lines: Vec<String>) -> String {
    lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Typed access to a request's parameters. Absent, `null` and `""` all count
/// as missing.
pub(crate) struct ParamReader<'a> {
    params: &'a Params,
}

impl<'a> ParamReader<'a> {
    fn new(params: &'a Params) -> Self {
        Self { params }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        match self.params.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        }
    }

    fn missing(key: &str) -> GenerateError {
        GenerateError::MissingParam { key: key.to_string() }
    }

    fn invalid(key: &str, expected: &'static str) -> GenerateError {
        GenerateError::InvalidParam {
            key: key.to_string(),
            expected,
        }
    }

    fn scalar(key: &str, value: &Value) -> Result<String, GenerateError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(Self::invalid(key, "a string")),
        }
    }

    pub(crate) fn require_str(&self, key: &str) -> Result<String, GenerateError> {
        let value = self.present(key).ok_or_else(|| Self::missing(key))?;
        Self::scalar(key, value)
    }

    pub(crate) fn opt_str(&self, key: &str) -> Result<Option<String>, GenerateError> {
        self.present(key).map(|v| Self::scalar(key, v)).transpose()
    }

    pub(crate) fn str_or(&self, key: &str, default: &str) -> Result<String, GenerateError> {
        Ok(self.opt_str(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// A VLAN id as a number or numeric string, within 1-4094.
    pub(crate) fn require_vlan_id(&self, key: &str) -> Result<u16, GenerateError> {
        let value = self.present(key).ok_or_else(|| Self::missing(key))?;
        let id = match value {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u16>().ok(),
            _ => None,
        };
        id.filter(|id| (1..=4094).contains(id))
            .ok_or_else(|| Self::invalid(key, "a VLAN id between 1 and 4094"))
    }

    /// A list of scalars; a single scalar is read as a one-element list.
    pub(crate) fn require_list(&self, key: &str) -> Result<Vec<String>, GenerateError> {
        let value = self.present(key).ok_or_else(|| Self::missing(key))?;
        Self::list(key, value)
    }

    pub(crate) fn opt_list(&self, key: &str) -> Result<Vec<String>, GenerateError> {
        match self.present(key) {
            Some(value) => Self::list(key, value),
            None => Ok(Vec::new()),
        }
    }

    fn list(key: &str, value: &Value) -> Result<Vec<String>, GenerateError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| Self::scalar(key, item).map_err(|_| Self::invalid(key, "a list of strings")))
                .collect(),
            other => Ok(vec![Self::scalar(key, other)?]),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn generate(vendor: Vendor, action: Action, value: Value) -> Result<String, GenerateError> {
        generate_config_command(&GenerateRequest::new(vendor, action, params(value)))
    }

    #[test]
    fn action_names_round_trip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert_eq!(
            "teleport".parse::<Action>(),
            Err(GenerateError::UnknownAction("teleport".into()))
        );
    }

    #[test]
    fn request_deserializes_from_json() {
        let request: GenerateRequest = serde_json::from_value(json!({
            "vendor": "mikrotik",
            "action": "static_route",
            "params": {"dst": "10.0.0.0/8", "gateway": "192.0.2.1"}
        }))
        .expect("request");
        assert_eq!(request.action, Action::StaticRoute);
        assert_eq!(
            generate_config_command(&request).expect("generate"),
            "/ip route add dst-address=10.0.0.0/8 gateway=192.0.2.1"
        );
    }

    #[test]
    fn missing_params_are_reported_in_template_order() {
        let err = generate(Vendor::Cisco, Action::WanUplink, json!({})).unwrap_err();
        assert_eq!(err.to_string(), "missing param: interface");

        let err = generate(
            Vendor::Cisco,
            Action::WanUplink,
            json!({"interface": "Gi0/0", "ip": "", "mask": null}),
        )
        .unwrap_err();
        assert_eq!(err, GenerateError::MissingParam { key: "ip".into() });
    }

    #[test]
    fn wrong_typed_params_are_invalid() {
        let err = generate(
            Vendor::Cisco,
            Action::LanVlan,
            json!({"vlanId": 5000, "ip": "10.0.0.1", "mask": "255.255.255.0"}),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParam { ref key, .. } if key == "vlanId"));

        let err = generate(
            Vendor::Cisco,
            Action::WanUplink,
            json!({"interface": {"name": "Gi0/0"}}),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParam { ref key, .. } if key == "interface"));
    }

    #[test]
    fn generic_vendor_is_unsupported() {
        let err = generate(Vendor::Generic, Action::Baseline, json!({"hostname": "x"})).unwrap_err();
        assert_eq!(err, GenerateError::UnsupportedVendor(Vendor::Generic));
    }

    #[test]
    fn scalar_list_params_become_single_items() {
        let p = params(json!({"networks": "10.0.0.0 0.0.0.255", "ports": ["Gi0/1", 2]}));
        let reader = ParamReader::new(&p);
        assert_eq!(reader.require_list("networks").expect("list"), vec!["10.0.0.0 0.0.0.255"]);
        assert_eq!(reader.require_list("ports").expect("list"), vec!["Gi0/1", "2"]);
        assert!(reader.opt_list("absent").expect("list").is_empty());
    }

    #[test]
    fn every_vendor_covers_every_action() {
        let full = json!({
            "hostname": "edge-01",
            "interface": "port1",
            "ip": "203.0.113.2",
            "mask": "255.255.255.252",
            "cidr": "203.0.113.2/30",
            "gateway": "203.0.113.1",
            "vlanId": 20,
            "pool": "USERS",
            "network": "10.20.0.0",
            "start": "10.20.0.100",
            "end": "10.20.0.200",
            "nextHop": "10.0.0.1",
            "dst": "10.30.0.0/16",
            "networks": ["10.20.0.0 0.0.0.255"],
            "insideInterfaces": ["Gi0/1"],
            "outsideInterface": "Gi0/0",
            "insideInterface": "Gi0/1",
            "insideNetworks": ["10.20.0.0 0.0.0.255"],
            "outInterface": "ether1",
            "gateway1": "198.51.100.1",
            "gateway2": "198.51.100.5",
            "ports": ["Gi0/2", "Gi0/3"],
            "adminSecret": "s3cret",
            "adminPassword": "s3cret",
            "snmpAuth": "authkey",
            "snmpPriv": "privkey"
        });
        for vendor in [Vendor::Cisco, Vendor::Fortigate, Vendor::Mikrotik] {
            for action in Action::ALL {
                let out = generate(vendor, action, full.clone())
                    .unwrap_or_else(|e| panic!("{vendor} {action}: {e}"));
                assert!(!out.is_empty(), "{vendor} {action}");
                assert!(!out.lines().any(str::is_empty), "{vendor} {action} has blank lines");
            }
        }
    }
}

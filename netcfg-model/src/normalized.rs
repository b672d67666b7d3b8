//! Normalized (vendor-neutral) snapshot of a device's effective configuration.
//!
//! This is lint input. It is produced outside this workspace by whatever
//! collects and parses device config, so every collection defaults to empty
//! and every sub-tree to its empty form: partially-populated documents load.
//!
//! Optional scalars are skipped on serialization so that the path-addressing
//! view (`serde_json::to_value`) sees them as missing rather than `null`.
//! Keys this model does not know are preserved in `extensions` maps and stay
//! addressable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vendor::Vendor;

pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedConfig {
    pub schema_version: String,
    pub device: Device,
    pub interfaces: Vec<Interface>,
    pub vlans: Vec<Vlan>,
    pub routing: Routing,
    pub security: Security,
    pub mgmt: Management,
    pub metadata: Metadata,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for NormalizedConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            device: Device::default(),
            interfaces: Vec::new(),
            vlans: Vec::new(),
            routing: Routing::default(),
            security: Security::default(),
            mgmt: Management::default(),
            metadata: Metadata::default(),
            extensions: BTreeMap::new(),
        }
    }
}

impl NormalizedConfig {
    /// An empty config for `vendor`, convenient for building test inputs.
    pub fn for_vendor(vendor: Vendor, hostname: &str) -> Self {
        Self {
            device: Device {
                vendor,
                hostname: hostname.to_string(),
                ..Device::default()
            },
            ..Self::default()
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.device.vendor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub vendor: Vendor,
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mgmt_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            vendor: Vendor::Generic,
            hostname: String::new(),
            mgmt_ip: None,
            os_version: None,
            model: None,
            domain: None,
            extensions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    #[default]
    Physical,
    Vlan,
    Loopback,
    Tunnel,
    Aggregate,
    Bridge,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VlanMode {
    Access,
    Trunk,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interface {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InterfaceKind,
    pub admin_up: bool,
    pub ips: Vec<IpAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_mode: Option<VlanMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_vlan: Option<u16>,
    /// Older collectors report the access VLAN under this key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trunk_vlans: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: InterfaceKind::Physical,
            admin_up: true,
            ips: Vec::new(),
            vlan_mode: None,
            access_vlan: None,
            vlan: None,
            trunk_vlans: Vec::new(),
            native_vlan: None,
            description: None,
            zone: None,
            mtu: None,
            extensions: BTreeMap::new(),
        }
    }
}

impl Interface {
    /// True when the interface carries VLAN 1 untagged, under either key.
    pub fn uses_vlan1(&self) -> bool {
        self.vlan == Some(1) || self.access_vlan == Some(1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    #[default]
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAssignment {
    pub address: String,
    pub prefix: u8,
    #[serde(rename = "type")]
    pub family: IpFamily,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secondary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vlan {
    pub id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub l3_gateway_ips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Routing {
    pub static_routes: Vec<StaticRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_gateway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticRoute {
    pub destination: String,
    pub prefix: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Security {
    pub acls: Vec<Acl>,
    pub firewall_policies: Vec<FirewallPolicy>,
    pub nat_rules: Vec<NatRule>,
    pub vpn_tunnels: Vec<VpnTunnel>,
    pub users: Vec<LocalUser>,
}

/// A field that collectors emit either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl Default for StringOrList {
    fn default() -> Self {
        StringOrList::Many(Vec::new())
    }
}

impl StringOrList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            StringOrList::One(one) => std::slice::from_ref(one),
            StringOrList::Many(many) => many,
        };
        items.iter().map(String::as_str)
    }

    pub fn any(&self, mut pred: impl FnMut(&str) -> bool) -> bool {
        self.iter().any(|item| pred(item))
    }
}

/// Identifiers that may be numeric (FortiGate policy ids) or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Number(i64),
    Text(String),
}

impl Default for TextOrNumber {
    fn default() -> Self {
        TextOrNumber::Text(String::new())
    }
}

impl std::fmt::Display for TextOrNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextOrNumber::Number(n) => write!(f, "{n}"),
            TextOrNumber::Text(s) => f.write_str(s),
        }
    }
}

impl From<TextOrNumber> for Value {
    fn from(id: TextOrNumber) -> Self {
        match id {
            TextOrNumber::Number(n) => Value::from(n),
            TextOrNumber::Text(s) => Value::from(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclType {
    Standard,
    Extended,
    Named,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Acl {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AclType>,
    #[serde(alias = "rules")]
    pub entries: Vec<AclEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclAction {
    #[default]
    #[serde(alias = "accept", alias = "allow")]
    Permit,
    Deny,
    Drop,
    Reject,
    #[serde(other)]
    Other,
}

impl AclAction {
    pub fn is_terminal_deny(self) -> bool {
        matches!(self, AclAction::Deny | AclAction::Drop)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AclEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    pub action: AclAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    #[default]
    #[serde(alias = "allow", alias = "permit")]
    Accept,
    Deny,
    Drop,
    Reject,
    #[serde(other)]
    Other,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallPolicy {
    #[serde(default)]
    pub id: TextOrNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub src_zone: StringOrList,
    #[serde(default)]
    pub dst_zone: StringOrList,
    #[serde(default)]
    pub src_addr: StringOrList,
    #[serde(default)]
    pub dst_addr: StringOrList,
    #[serde(default)]
    pub service: StringOrList,
    #[serde(default)]
    pub action: PolicyAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat: Option<bool>,
    #[serde(default)]
    pub log: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatType {
    #[default]
    Snat,
    Dnat,
    Static,
    Masquerade,
    Pat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatRule {
    #[serde(default)]
    pub id: TextOrNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<TextOrNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<TextOrNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_port: Option<TextOrNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnType {
    Ipsec,
    Ssl,
    Gre,
    L2tp,
    Wireguard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VpnTunnel {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<VpnType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase1: Option<VpnPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase2: Option<VpnPhase>,
}

/// Proposal set for one IKE/IPsec phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VpnPhase {
    pub encryption: Vec<String>,
    pub hash: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dh_group: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pfs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalUser {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privilege: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Management {
    pub ssh: Ssh,
    pub telnet: Telnet,
    pub snmp: Snmp,
    pub syslog: Syslog,
    pub ntp: Ntp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ssh {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Telnet {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snmp {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<SnmpVersion>,
    /// Redacted upstream; only presence is meaningful.
    pub communities: Vec<String>,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    Udp,
    Tcp,
    Tls,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Syslog {
    pub enabled: bool,
    pub servers: Vec<SyslogServer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SyslogServerRepr")]
pub struct SyslogServer {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TransportProtocol>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SyslogServerRepr {
    Address(String),
    #[serde(rename_all = "camelCase")]
    Full {
        address: String,
        #[serde(default)]
        port: Option<u16>,
        #[serde(default)]
        protocol: Option<TransportProtocol>,
    },
}

impl From<SyslogServerRepr> for SyslogServer {
    fn from(repr: SyslogServerRepr) -> Self {
        match repr {
            SyslogServerRepr::Address(address) => Self {
                address,
                ..Self::default()
            },
            SyslogServerRepr::Full {
                address,
                port,
                protocol,
            } => Self {
                address,
                port,
                protocol,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ntp {
    pub enabled: bool,
    pub servers: Vec<NtpServer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "NtpServerRepr")]
pub struct NtpServer {
    pub address: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub prefer: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NtpServerRepr {
    Address(String),
    Full {
        address: String,
        #[serde(default)]
        prefer: bool,
    },
}

impl From<NtpServerRepr> for NtpServer {
    fn from(repr: NtpServerRepr) -> Self {
        match repr {
            NtpServerRepr::Address(address) => Self {
                address,
                prefer: false,
            },
            NtpServerRepr::Full { address, prefer } => Self { address, prefer },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_document_loads_with_defaults() {
        let cfg: NormalizedConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg.schema_version, SCHEMA_VERSION);
        assert_eq!(cfg.vendor(), Vendor::Generic);
        assert!(cfg.interfaces.is_empty());
        assert!(!cfg.mgmt.ssh.enabled);
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let cfg = NormalizedConfig::for_vendor(Vendor::Cisco, "r1");
        let value = serde_json::to_value(&cfg).expect("serialize");
        assert!(value["device"].get("mgmtIp").is_none());
        assert!(value["mgmt"]["snmp"].get("version").is_none());
        assert_eq!(value["device"]["vendor"], json!("cisco"));
    }

    #[test]
    fn policy_fields_accept_string_or_list() {
        let policy: FirewallPolicy = serde_json::from_value(json!({
            "id": 7,
            "srcAddr": "all",
            "dstAddr": ["10.0.0.0/8", "any"],
            "service": "ALL",
            "action": "accept"
        }))
        .expect("parse");
        assert_eq!(policy.id, TextOrNumber::Number(7));
        assert!(policy.src_addr.any(|a| a == "all"));
        assert_eq!(policy.dst_addr.iter().count(), 2);
        assert!(!policy.log);
        assert!(policy.enabled);
    }

    #[test]
    fn ntp_and_syslog_servers_accept_bare_strings() {
        let mgmt: Management = serde_json::from_value(json!({
            "ntp": { "enabled": true, "servers": ["a.pool", { "address": "b.pool", "prefer": true }] },
            "syslog": { "servers": ["10.0.0.5", { "address": "10.0.0.6", "port": 514 }] }
        }))
        .expect("parse");
        assert_eq!(mgmt.ntp.servers[0].address, "a.pool");
        assert!(mgmt.ntp.servers[1].prefer);
        assert_eq!(mgmt.syslog.servers[1].port, Some(514));
    }

    #[test]
    fn acl_rules_alias_and_action_spellings() {
        let acl: Acl = serde_json::from_value(json!({
            "name": "MGMT",
            "type": "extended",
            "rules": [{ "action": "permit" }, { "action": "accept" }, { "action": "deny" }]
        }))
        .expect("parse");
        assert_eq!(acl.entries.len(), 3);
        assert_eq!(acl.entries[1].action, AclAction::Permit);
        assert!(acl.entries[2].action.is_terminal_deny());
    }

    #[test]
    fn unknown_keys_are_kept_as_extensions() {
        let cfg: NormalizedConfig = serde_json::from_value(json!({
            "device": { "vendor": "mikrotik", "hostname": "mt", "serial": "X1" },
            "site": "lab"
        }))
        .expect("parse");
        assert_eq!(cfg.extensions.get("site"), Some(&json!("lab")));
        assert_eq!(cfg.device.extensions.get("serial"), Some(&json!("X1")));
        let back = serde_json::to_value(&cfg).expect("serialize");
        assert_eq!(back["site"], json!("lab"));
    }

    #[test]
    fn legacy_vlan_key_counts_as_vlan1() {
        let iface: Interface =
            serde_json::from_value(json!({ "name": "ether2", "vlan": 1 })).expect("parse");
        assert!(iface.uses_vlan1());
        assert!(iface.admin_up);
    }
}

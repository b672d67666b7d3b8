//! Vendor-neutral intent model: what the operator wants configured.
//!
//! Render input. Everything is optional so a change request can describe a
//! single VLAN without restating the whole device.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub interfaces: Vec<InterfaceIntent>,
    pub vlans: Vec<VlanIntent>,
    pub routing: RoutingIntent,
    pub services: ServicesIntent,
    pub firewall: FirewallIntent,
    pub metadata: IntentMetadata,
}

impl CanonicalConfig {
    pub fn ssh(&self) -> Option<&SshIntent> {
        self.services.ssh.as_ref()
    }

    pub fn ssh_enabled(&self) -> bool {
        self.ssh().is_some_and(|ssh| ssh.enabled)
    }

    pub fn environment(&self) -> Option<Environment> {
        self.metadata.environment
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceRole {
    Uplink,
    #[default]
    Access,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceIntent {
    pub name: String,
    pub role: InterfaceRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` means "leave enabled".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl InterfaceIntent {
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VlanIntent {
    pub id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CIDR, e.g. `10.10.0.0/24`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingIntent {
    pub static_routes: Vec<RouteIntent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteIntent {
    pub destination: String,
    /// Dotted mask or prefix length; renderers convert as needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    pub next_hop: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesIntent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshIntent>,
    pub ntp_servers: Vec<String>,
    pub dns_servers: Vec<String>,
    pub syslog_servers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SshIntent {
    pub enabled: bool,
    /// Left unset when the intent does not name a protocol version.
    pub version: Option<u8>,
    pub allow_password: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirewallIntent {
    pub enabled: bool,
    /// Management source network (CIDR).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_mgmt_from: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
}

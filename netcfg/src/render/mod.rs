//! Compile a [`CanonicalConfig`] into vendor CLI.
//!
//! Every renderer emits the same six sections in the same order, so that
//! resources exist before anything refers to them. Mutating commands are
//! recorded through a [`RenderPlan`], which pairs each one with the single
//! command that undoes it and reverses the undo list at the end. Verify
//! commands are read-only and never appear in the rollback.

use netcfg_model::{mask_from_cidr, mask_to_prefix, CanonicalConfig, Vendor};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

mod cisco;
mod fortigate;
mod mikrotik;
mod preflight;

pub use cisco::CiscoRenderer;
pub use fortigate::FortigateRenderer;
pub use mikrotik::MikrotikRenderer;
pub use preflight::lint_config;

pub const DEFAULT_MASK: &str = "255.255.255.0";
pub const DEFAULT_PREFIX: &str = "24";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Base,
    Vlan,
    Interfaces,
    Routing,
    Services,
    Firewall,
}

impl Section {
    /// Application order.
    pub const ALL: [Section; 6] = [
        Section::Base,
        Section::Vlan,
        Section::Interfaces,
        Section::Routing,
        Section::Services,
        Section::Firewall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Base => "base",
            Section::Vlan => "vlan",
            Section::Interfaces => "interfaces",
            Section::Routing => "routing",
            Section::Services => "services",
            Section::Firewall => "firewall",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSection {
    pub name: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub vendor: Vendor,
    /// All section commands, flattened in application order.
    pub commands: Vec<String>,
    pub sections: Vec<RenderSection>,
    pub verify_commands: Vec<String>,
    pub rollback_commands: Vec<String>,
}

impl RenderResult {
    pub fn section(&self, name: &str) -> Option<&RenderSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("vendor '{0}' has no renderer")]
    UnsupportedVendor(Vendor),
    #[error("missing required field {field}")]
    MissingField { field: String },
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

/// Accumulates section commands and their undo commands.
#[derive(Debug, Default)]
pub struct RenderPlan {
    sections: Vec<(Section, Vec<String>)>,
    undo: Vec<String>,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self {
            sections: Section::ALL.iter().map(|s| (*s, Vec::new())).collect(),
            undo: Vec::new(),
        }
    }

    /// Record one logical mutation: its command lines and the one command
    /// (possibly multi-line) that reverses it.
    pub fn mutate<I, S>(&mut self, section: Section, commands: I, rollback: impl Into<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some((_, lines)) = self.sections.iter_mut().find(|(s, _)| *s == section) {
            lines.extend(commands.into_iter().map(Into::into));
        }
        self.undo.push(rollback.into());
    }

    pub fn mutation_count(&self) -> usize {
        self.undo.len()
    }

    pub fn finish(self, vendor: Vendor, verify_commands: Vec<String>) -> RenderResult {
        let sections: Vec<RenderSection> = self
            .sections
            .into_iter()
            .map(|(section, commands)| RenderSection {
                name: section.as_str().to_string(),
                commands,
            })
            .collect();
        let commands = sections.iter().flat_map(|s| s.commands.iter().cloned()).collect();
        let mut rollback_commands = self.undo;
        rollback_commands.reverse();
        RenderResult {
            vendor,
            commands,
            sections,
            verify_commands,
            rollback_commands,
        }
    }
}

/// A vendor command-language backend.
pub trait Renderer: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// Record every section's mutations into `plan`.
    fn plan(&self, config: &CanonicalConfig, plan: &mut RenderPlan);

    fn verify_commands(&self, config: &CanonicalConfig) -> Vec<String>;

    fn render(&self, config: &CanonicalConfig) -> Result<RenderResult, RenderError> {
        validate(config)?;
        let mut plan = RenderPlan::new();
        self.plan(config, &mut plan);
        let mutations = plan.mutation_count();
        let result = plan.finish(self.vendor(), self.verify_commands(config));
        debug!(
            vendor = %self.vendor(),
            mutations,
            verify = result.verify_commands.len(),
            "rendered config"
        );
        Ok(result)
    }
}

static CISCO: CiscoRenderer = CiscoRenderer;
static MIKROTIK: MikrotikRenderer = MikrotikRenderer;
static FORTIGATE: FortigateRenderer = FortigateRenderer;

pub fn renderer_for(vendor: Vendor) -> Result<&'static dyn Renderer, RenderError> {
    match vendor {
        Vendor::Cisco => Ok(&CISCO),
        Vendor::Mikrotik => Ok(&MIKROTIK),
        Vendor::Fortigate => Ok(&FORTIGATE),
        Vendor::Generic => Err(RenderError::UnsupportedVendor(vendor)),
    }
}

/// Render `config` for `vendor`.
///
/// # Returns
///
/// The ordered sections with verify and rollback plans, or a
/// [`RenderError`] naming the unsupported vendor or the offending field
pub fn render_config(config: &CanonicalConfig, vendor: Vendor) -> Result<RenderResult, RenderError> {
    renderer_for(vendor)?.render(config)
}

/// Reject intent that no vendor can express.
fn validate(config: &CanonicalConfig) -> Result<(), RenderError> {
    for (i, iface) in config.interfaces.iter().enumerate() {
        if iface.name.trim().is_empty() {
            return Err(RenderError::MissingField {
                field: format!("interfaces[{i}].name"),
            });
        }
    }
    for (i, vlan) in config.vlans.iter().enumerate() {
        if !(1..=4094).contains(&vlan.id) {
            return Err(RenderError::InvalidField {
                field: format!("vlans[{i}].id"),
                reason: format!("{} is outside 1-4094", vlan.id),
            });
        }
    }
    for (i, route) in config.routing.static_routes.iter().enumerate() {
        if route.destination.trim().is_empty() {
            return Err(RenderError::MissingField {
                field: format!("routing.staticRoutes[{i}].destination"),
            });
        }
        if route.next_hop.trim().is_empty() {
            return Err(RenderError::MissingField {
                field: format!("routing.staticRoutes[{i}].nextHop"),
            });
        }
    }
    Ok(())
}

/// Dotted mask for a dotted mask, `/N` CIDR or bare prefix length; falls
/// back to [`DEFAULT_MASK`].
pub(crate) fn dotted_mask(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_MASK.to_string();
    };
    let mask = if raw.contains('/') {
        mask_from_cidr(raw)
    } else if raw.contains('.') {
        if mask_to_prefix(raw).is_empty() {
            String::new()
        } else {
            raw.to_string()
        }
    } else {
        mask_from_cidr(&format!("0.0.0.0/{raw}"))
    };
    if mask.is_empty() {
        DEFAULT_MASK.to_string()
    } else {
        mask
    }
}

/// Prefix length for the same inputs as [`dotted_mask`]; falls back to
/// [`DEFAULT_PREFIX`].
pub(crate) fn prefix_len(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_PREFIX.to_string();
    };
    let prefix = if raw.contains('/') || raw.contains('.') {
        mask_to_prefix(raw)
    } else {
        raw.to_string()
    };
    match prefix.parse::<u8>() {
        Ok(bits) if bits <= 32 => bits.to_string(),
        _ => DEFAULT_PREFIX.to_string(),
    }
}

/// Network part of a possibly-CIDR address.
pub(crate) fn network(raw: &str) -> &str {
    raw.split('/').next().unwrap_or(raw).trim()
}

/// Destination network and the mask source for a static route: an explicit
/// netmask wins over a `/N` on the destination.
pub(crate) fn route_target(destination: &str, netmask: Option<&str>) -> (String, Option<String>) {
    let net = network(destination).to_string();
    let mask = netmask
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| destination.contains('/').then(|| destination.trim().to_string()));
    (net, mask)
}

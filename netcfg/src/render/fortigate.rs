//! FortiGate FortiOS renderer.
//!
//! Each mutation is one `config ... end` block starting at column 0, with
//! nested lines indented by four spaces per level. The matching rollback is
//! a block of the same shape that unsets or deletes what was added.

use netcfg_model::canonical::{InterfaceRole, VlanIntent};
use netcfg_model::{CanonicalConfig, Vendor};

use super::{dotted_mask, network, route_target, RenderPlan, Renderer, Section};

const MGMT_ADDRESS: &str = "NETCFG-MGMT";
const DEFAULT_VLAN_PARENT: &str = "internal";
/// FortiOS exposes syslogd, syslogd2 .. syslogd4.
const MAX_SYSLOG_SERVERS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct FortigateRenderer;

impl Renderer for FortigateRenderer {
    fn vendor(&self) -> Vendor {
        Vendor::Fortigate
    }

    fn plan(&self, config: &CanonicalConfig, plan: &mut RenderPlan) {
        if let Some(hostname) = config.hostname.as_deref().filter(|h| !h.trim().is_empty()) {
            plan.mutate(
                Section::Base,
                block("system global", &[format!("set hostname \"{hostname}\"")]),
                undo_block("system global", &["unset hostname"]),
            );
        }
        let parent = vlan_parent(config);
        for vlan in &config.vlans {
            vlan_interface(vlan, parent, plan);
        }
        interfaces(config, plan);
        routing(config, plan);
        services(config, plan);
        firewall(config, plan);
    }

    fn verify_commands(&self, config: &CanonicalConfig) -> Vec<String> {
        let mut verify = vec![
            "get system status".to_string(),
            "show system interface".to_string(),
            "get router info routing-table all".to_string(),
        ];
        if config.firewall.enabled && config.firewall.allow_mgmt_from.is_some() {
            verify.push("show firewall local-in-policy".to_string());
        }
        verify
    }
}

/// `config <path>` block with one level of `lines`.
fn block(path: &str, lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("config {path}"));
    out.extend(lines.iter().map(|l| format!("    {l}")));
    out.push("end".to_string());
    out
}

/// `config <path>` block wrapping one `edit` entry.
fn edit_block(path: &str, entry: &str, settings: &[String]) -> Vec<String> {
    let mut lines = vec![format!("edit {entry}")];
    lines.extend(settings.iter().map(|s| format!("    {s}")));
    lines.push("next".to_string());
    block(path, &lines)
}

fn undo_block(path: &str, lines: &[&str]) -> String {
    let owned: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    block(path, &owned).join("\n")
}

/// VLANs hang off the first access interface, or `internal`.
fn vlan_parent(config: &CanonicalConfig) -> &str {
    config
        .interfaces
        .iter()
        .find(|i| i.role == InterfaceRole::Access)
        .map_or(DEFAULT_VLAN_PARENT, |i| i.name.as_str())
}

fn vlan_interface(vlan: &VlanIntent, parent: &str, plan: &mut RenderPlan) {
    let name = format!("\"vlan{}\"", vlan.id);
    let mut settings = vec![
        "set vdom \"root\"".to_string(),
        "set type vlan".to_string(),
        format!("set vlanid {}", vlan.id),
        format!("set interface \"{parent}\""),
    ];
    if let Some(gateway) = vlan.gateway.as_deref() {
        settings.push(format!("set ip {gateway} {}", dotted_mask(vlan.subnet.as_deref())));
        settings.push("set allowaccess ping".to_string());
    }
    if let Some(alias) = vlan.name.as_deref() {
        settings.push(format!("set alias \"{alias}\""));
    }
    plan.mutate(
        Section::Vlan,
        edit_block("system interface", &name, &settings),
        undo_block("system interface", &[&format!("delete {name}")]),
    );
}

fn interfaces(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for iface in &config.interfaces {
        let mut settings = Vec::new();
        let mut undo = Vec::new();
        if let Some(alias) = iface.description.as_deref() {
            settings.push(format!("set alias \"{alias}\""));
            undo.push("unset alias".to_string());
        }
        if let Some(ip) = iface.ip_address.as_deref() {
            settings.push(format!("set ip {ip} {}", dotted_mask(iface.subnet_mask.as_deref())));
            undo.push("unset ip".to_string());
        }
        let role = match iface.role {
            InterfaceRole::Uplink => "wan",
            InterfaceRole::Access => "lan",
        };
        settings.push(format!("set role {role}"));
        undo.push("unset role".to_string());
        if !iface.is_enabled() {
            settings.push("set status down".to_string());
            undo.push("set status up".to_string());
        }
        let entry = format!("\"{}\"", iface.name);
        plan.mutate(
            Section::Interfaces,
            edit_block("system interface", &entry, &settings),
            edit_block("system interface", &entry, &undo).join("\n"),
        );
    }
}

fn routing(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for (i, route) in config.routing.static_routes.iter().enumerate() {
        let seq = i + 1;
        let (net, mask) = route_target(&route.destination, route.netmask.as_deref());
        let settings = [
            format!("set dst {net} {}", dotted_mask(mask.as_deref())),
            format!("set gateway {}", route.next_hop),
        ];
        plan.mutate(
            Section::Routing,
            edit_block("router static", &seq.to_string(), &settings),
            undo_block("router static", &[&format!("delete {seq}")]),
        );
    }
}

fn services(config: &CanonicalConfig, plan: &mut RenderPlan) {
    if let Some(ssh) = config.ssh() {
        let password = if ssh.allow_password { "enable" } else { "disable" };
        plan.mutate(
            Section::Services,
            block(
                "system global",
                &["set admin-ssh-port 22".to_string(), format!("set admin-ssh-password {password}")],
            ),
            undo_block("system global", &["unset admin-ssh-port", "unset admin-ssh-password"]),
        );
        plan.mutate(
            Section::Services,
            block("system global", &["set admin-telnet disable".to_string()]),
            undo_block("system global", &["unset admin-telnet"]),
        );
    }

    let svc = &config.services;
    if !svc.ntp_servers.is_empty() {
        let mut lines = vec![
            "set ntpsync enable".to_string(),
            "set type custom".to_string(),
            "config ntpserver".to_string(),
        ];
        for (i, server) in svc.ntp_servers.iter().enumerate() {
            lines.push(format!("    edit {}", i + 1));
            lines.push(format!("        set server \"{server}\""));
            lines.push("    next".to_string());
        }
        lines.push("end".to_string());
        plan.mutate(
            Section::Services,
            block("system ntp", &lines),
            undo_block("system ntp", &["set type fortiguard"]),
        );
    }
    if let Some(primary) = svc.dns_servers.first() {
        let mut lines = vec![format!("set primary {primary}")];
        let mut undo = vec!["unset primary"];
        if let Some(secondary) = svc.dns_servers.get(1) {
            lines.push(format!("set secondary {secondary}"));
            undo.push("unset secondary");
        }
        plan.mutate(Section::Services, block("system dns", &lines), undo_block("system dns", &undo));
    }
    for (i, server) in svc.syslog_servers.iter().take(MAX_SYSLOG_SERVERS).enumerate() {
        let path = if i == 0 {
            "log syslogd setting".to_string()
        } else {
            format!("log syslogd{} setting", i + 1)
        };
        plan.mutate(
            Section::Services,
            block(&path, &["set status enable".to_string(), format!("set server \"{server}\"")]),
            undo_block(&path, &["set status disable"]),
        );
    }
}

/// Local-in policies admitting management from one source network and
/// denying everyone else. Nothing is emitted without a source.
fn firewall(config: &CanonicalConfig, plan: &mut RenderPlan) {
    if !config.firewall.enabled {
        return;
    }
    let Some(source) = config.firewall.allow_mgmt_from.as_deref() else {
        return;
    };
    let address = format!("\"{MGMT_ADDRESS}\"");
    plan.mutate(
        Section::Firewall,
        edit_block(
            "firewall address",
            &address,
            &[format!("set subnet {} {}", network(source), dotted_mask(Some(source)))],
        ),
        undo_block("firewall address", &[&format!("delete {address}")]),
    );

    let mut lines = Vec::new();
    for (seq, src, action) in [(1, address.as_str(), "accept"), (2, "\"all\"", "deny")] {
        lines.push(format!("edit {seq}"));
        lines.push("    set intf \"any\"".to_string());
        lines.push(format!("    set srcaddr {src}"));
        lines.push("    set dstaddr \"all\"".to_string());
        lines.push(format!("    set action {action}"));
        lines.push("    set service \"SSH\" \"HTTPS\"".to_string());
        lines.push("    set schedule \"always\"".to_string());
        lines.push("next".to_string());
    }
    plan.mutate(
        Section::Firewall,
        block("firewall local-in-policy", &lines),
        undo_block("firewall local-in-policy", &["delete 1", "delete 2"]),
    );
}

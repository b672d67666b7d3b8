//! MikroTik RouterOS renderer. Every command line is its own mutation.

use netcfg_model::canonical::InterfaceRole;
use netcfg_model::{CanonicalConfig, Vendor};

use super::{prefix_len, route_target, RenderPlan, Renderer, Section};

const BRIDGE: &str = "br0";
const DEFAULT_IDENTITY: &str = "MikroTik";
/// Uplink used for the management accept rule when no source is given.
const FALLBACK_MGMT_INTERFACE: &str = "ether1";

#[derive(Debug, Clone, Copy, Default)]
pub struct MikrotikRenderer;

impl Renderer for MikrotikRenderer {
    fn vendor(&self) -> Vendor {
        Vendor::Mikrotik
    }

    fn plan(&self, config: &CanonicalConfig, plan: &mut RenderPlan) {
        base(config, plan);
        vlans(config, plan);
        interfaces(config, plan);
        routing(config, plan);
        services(config, plan);
        firewall(config, plan);
    }

    fn verify_commands(&self, config: &CanonicalConfig) -> Vec<String> {
        let mut verify = vec![
            "/interface vlan print".to_string(),
            "/ip address print".to_string(),
            "/ip route print".to_string(),
        ];
        if config.firewall.enabled {
            verify.push("/ip firewall filter print".to_string());
        }
        verify
    }
}

fn needs_bridge(config: &CanonicalConfig) -> bool {
    !config.vlans.is_empty()
        || config
            .interfaces
            .iter()
            .any(|i| i.role == InterfaceRole::Access && i.vlan_id.is_some())
}

fn base(config: &CanonicalConfig, plan: &mut RenderPlan) {
    if let Some(hostname) = config.hostname.as_deref().filter(|h| !h.trim().is_empty()) {
        plan.mutate(
            Section::Base,
            [format!("/system identity set name={hostname}")],
            format!("/system identity set name={DEFAULT_IDENTITY}"),
        );
    }
    if needs_bridge(config) {
        plan.mutate(
            Section::Base,
            [format!("/interface bridge add name={BRIDGE} vlan-filtering=yes")],
            format!("/interface bridge remove [find name={BRIDGE}]"),
        );
    }
}

/// The VLAN interface is created before its gateway address, so the
/// reversed rollback drops the address first.
fn vlans(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for vlan in &config.vlans {
        let ifname = format!("vlan{}", vlan.id);
        let comment = vlan
            .name
            .as_deref()
            .map(|n| format!(" comment=\"{n}\""))
            .unwrap_or_default();
        plan.mutate(
            Section::Vlan,
            [format!(
                "/interface vlan add name={ifname} vlan-id={} interface={BRIDGE}{comment}",
                vlan.id
            )],
            format!("/interface vlan remove [find name={ifname}]"),
        );
        if let Some(gateway) = vlan.gateway.as_deref() {
            let prefix = prefix_len(vlan.subnet.as_deref());
            plan.mutate(
                Section::Vlan,
                [format!("/ip address add address={gateway}/{prefix} interface={ifname}")],
                format!("/ip address remove [find interface={ifname}]"),
            );
        }
    }
}

fn interfaces(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for iface in &config.interfaces {
        let name = &iface.name;
        if let Some(ip) = iface.ip_address.as_deref() {
            let address = format!("{ip}/{}", prefix_len(iface.subnet_mask.as_deref()));
            plan.mutate(
                Section::Interfaces,
                [format!("/ip address add address={address} interface={name}")],
                format!("/ip address remove [find address=\"{address}\" interface={name}]"),
            );
        }
        if let (InterfaceRole::Access, Some(vlan_id)) = (iface.role, iface.vlan_id) {
            plan.mutate(
                Section::Interfaces,
                [format!("/interface bridge port add bridge={BRIDGE} interface={name} pvid={vlan_id}")],
                format!("/interface bridge port remove [find interface={name}]"),
            );
        }
        if let Some(description) = iface.description.as_deref() {
            plan.mutate(
                Section::Interfaces,
                [format!("/interface set [find name={name}] comment=\"{description}\"")],
                format!("/interface set [find name={name}] comment=\"\""),
            );
        }
        if !iface.is_enabled() {
            plan.mutate(
                Section::Interfaces,
                [format!("/interface disable {name}")],
                format!("/interface enable {name}"),
            );
        }
    }
}

fn routing(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for route in &config.routing.static_routes {
        let (net, mask) = route_target(&route.destination, route.netmask.as_deref());
        let dst = format!("{net}/{}", prefix_len(mask.as_deref()));
        plan.mutate(
            Section::Routing,
            [format!("/ip route add dst-address={dst} gateway={}", route.next_hop)],
            format!("/ip route remove [find dst-address={dst} gateway={}]", route.next_hop),
        );
    }
}

fn services(config: &CanonicalConfig, plan: &mut RenderPlan) {
    // Remote-access services are only touched when the intent states SSH.
    if let Some(ssh) = config.ssh() {
        let (set, undo) = if ssh.enabled { ("no", "yes") } else { ("yes", "no") };
        plan.mutate(
            Section::Services,
            [format!("/ip service set ssh disabled={set}")],
            format!("/ip service set ssh disabled={undo}"),
        );
        plan.mutate(
            Section::Services,
            ["/ip service set telnet disabled=yes"],
            "/ip service set telnet disabled=no",
        );
    }

    let svc = &config.services;
    if let Some(primary) = svc.ntp_servers.first() {
        let secondary = svc
            .ntp_servers
            .get(1)
            .map(|s| format!(" secondary-ntp={s}"))
            .unwrap_or_default();
        plan.mutate(
            Section::Services,
            [format!("/system ntp client set enabled=yes primary-ntp={primary}{secondary}")],
            "/system ntp client set enabled=no",
        );
    }
    if !svc.dns_servers.is_empty() {
        plan.mutate(
            Section::Services,
            [format!("/ip dns set servers={}", svc.dns_servers.join(","))],
            "/ip dns set servers=\"\"",
        );
    }
    if let Some(remote) = svc.syslog_servers.first() {
        plan.mutate(
            Section::Services,
            [format!("/system logging action set remote remote={remote}")],
            "/system logging action set remote remote=0.0.0.0",
        );
        plan.mutate(
            Section::Services,
            ["/system logging add topics=info action=remote"],
            "/system logging remove [find topics=info action=remote]",
        );
    }
}

/// Input-chain filter rules, tagged by comment so each can be removed alone.
fn firewall(config: &CanonicalConfig, plan: &mut RenderPlan) {
    if !config.firewall.enabled {
        return;
    }
    let mgmt_match = match config.firewall.allow_mgmt_from.as_deref() {
        Some(source) => format!("src-address={source}"),
        None => format!("in-interface={FALLBACK_MGMT_INTERFACE}"),
    };
    let rules = [
        ("netcfg-established", "connection-state=established,related action=accept".to_string()),
        ("netcfg-invalid", "connection-state=invalid action=drop".to_string()),
        ("netcfg-mgmt", format!("{mgmt_match} action=accept")),
        ("netcfg-drop", "action=drop".to_string()),
    ];
    for (tag, body) in rules {
        plan.mutate(
            Section::Firewall,
            [format!("/ip firewall filter add chain=input {body} comment={tag}")],
            format!("/ip firewall filter remove [find comment={tag}]"),
        );
    }
}

//! Cisco IOS renderer.
//!
//! One mutation is one top-level command plus the indented sub-commands of
//! its block, so top-level lines and rollback entries stay one-to-one.

use netcfg_model::canonical::{InterfaceRole, VlanIntent};
use netcfg_model::{wildcard_from_cidr, CanonicalConfig, Vendor};

use super::{dotted_mask, network, route_target, RenderPlan, Renderer, Section};

const MGMT_ACL: &str = "MGMT-IN";

#[derive(Debug, Clone, Copy, Default)]
pub struct CiscoRenderer;

impl Renderer for CiscoRenderer {
    fn vendor(&self) -> Vendor {
        Vendor::Cisco
    }

    fn plan(&self, config: &CanonicalConfig, plan: &mut RenderPlan) {
        if let Some(hostname) = config.hostname.as_deref().filter(|h| !h.trim().is_empty()) {
            plan.mutate(Section::Base, [format!("hostname {hostname}")], "no hostname");
        }

        for vlan in &config.vlans {
            let name = vlan.name.clone().unwrap_or_else(|| format!("VLAN{}", vlan.id));
            plan.mutate(
                Section::Vlan,
                [format!("vlan {}", vlan.id), format!(" name {name}")],
                format!("no vlan {}", vlan.id),
            );
        }

        for vlan in config.vlans.iter().filter(|v| v.gateway.is_some()) {
            svi(vlan, plan);
        }
        interfaces(config, plan);
        routing(config, plan);
        services(config, plan);
        firewall(config, plan);
    }

    fn verify_commands(&self, config: &CanonicalConfig) -> Vec<String> {
        let mut verify = vec![
            "show vlan brief".to_string(),
            "show ip interface brief".to_string(),
            "show ip route".to_string(),
        ];
        if config.ssh_enabled() {
            verify.push("show ip ssh".to_string());
        }
        if config.firewall.enabled {
            verify.push(format!("show access-lists {MGMT_ACL}"));
        }
        verify
    }
}

/// Layer-3 interface for a VLAN gateway.
fn svi(vlan: &VlanIntent, plan: &mut RenderPlan) {
    let Some(gateway) = vlan.gateway.as_deref() else {
        return;
    };
    plan.mutate(
        Section::Interfaces,
        [
            format!("interface Vlan{}", vlan.id),
            format!(" ip address {gateway} {}", dotted_mask(vlan.subnet.as_deref())),
            " no shutdown".to_string(),
        ],
        format!("no interface Vlan{}", vlan.id),
    );
}

fn interfaces(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for iface in &config.interfaces {
        let mut block = vec![format!("interface {}", iface.name)];
        if let Some(description) = iface.description.as_deref() {
            block.push(format!(" description {description}"));
        }
        if let (InterfaceRole::Access, Some(vlan_id)) = (iface.role, iface.vlan_id) {
            block.push(" switchport mode access".to_string());
            block.push(format!(" switchport access vlan {vlan_id}"));
        }
        if let Some(ip) = iface.ip_address.as_deref() {
            block.push(format!(" ip address {ip} {}", dotted_mask(iface.subnet_mask.as_deref())));
        }
        block.push(if iface.is_enabled() { " no shutdown" } else { " shutdown" }.to_string());
        plan.mutate(Section::Interfaces, block, format!("default interface {}", iface.name));
    }
}

fn routing(config: &CanonicalConfig, plan: &mut RenderPlan) {
    for route in &config.routing.static_routes {
        let (net, mask) = route_target(&route.destination, route.netmask.as_deref());
        let line = format!("ip route {net} {} {}", dotted_mask(mask.as_deref()), route.next_hop);
        plan.mutate(Section::Routing, [line.clone()], format!("no {line}"));
    }
}

fn services(config: &CanonicalConfig, plan: &mut RenderPlan) {
    if config.ssh_enabled() {
        plan.mutate(Section::Services, ["ip ssh version 2"], "no ip ssh version");
        plan.mutate(
            Section::Services,
            ["line vty 0 4", " transport input ssh"],
            "line vty 0 4\n transport input telnet",
        );
    }
    plan.mutate(Section::Services, ["no ip http server"], "ip http server");

    let svc = &config.services;
    for server in &svc.ntp_servers {
        plan.mutate(Section::Services, [format!("ntp server {server}")], format!("no ntp server {server}"));
    }
    for server in &svc.dns_servers {
        plan.mutate(
            Section::Services,
            [format!("ip name-server {server}")],
            format!("no ip name-server {server}"),
        );
    }
    if !svc.syslog_servers.is_empty() {
        for server in &svc.syslog_servers {
            plan.mutate(
                Section::Services,
                [format!("logging host {server}")],
                format!("no logging host {server}"),
            );
        }
        plan.mutate(Section::Services, ["logging trap informational"], "no logging trap");
    }
}

/// Management ACL on the VTY lines. Without a source network the ACL is
/// created permissive and left unapplied.
fn firewall(config: &CanonicalConfig, plan: &mut RenderPlan) {
    if !config.firewall.enabled {
        return;
    }
    let header = format!("ip access-list extended {MGMT_ACL}");
    let undo = format!("no {header}");
    let Some(source) = config.firewall.allow_mgmt_from.as_deref() else {
        plan.mutate(Section::Firewall, [header, " permit ip any any".to_string()], undo);
        return;
    };

    let wildcard = wildcard_from_cidr(source);
    let permit = if wildcard.is_empty() {
        format!(" permit ip host {} any", network(source))
    } else {
        format!(" permit ip {} {wildcard} any", network(source))
    };
    plan.mutate(
        Section::Firewall,
        [header, permit, " deny ip any any log".to_string()],
        undo,
    );
    plan.mutate(
        Section::Firewall,
        ["line vty 0 4".to_string(), format!(" access-class {MGMT_ACL} in")],
        format!("line vty 0 4\n no access-class {MGMT_ACL} in"),
    );
}

//! Cisco IOS templates. Every snippet enters and leaves configuration mode.

use super::{Action, GenerateError, ParamReader};

pub(super) fn generate(action: Action, p: &ParamReader<'_>) -> Result<Vec<String>, GenerateError> {
    let mut out = vec!["configure terminal".to_string()];
    match action {
        Action::Baseline => {
            let hostname = p.require_str("hostname")?;
            let domain = p.str_or("domain", "local")?;
            let dns = p.opt_list("dnsServers")?;
            out.push(format!("hostname {hostname}"));
            out.push(format!("ip domain-name {domain}"));
            if !dns.is_empty() {
                out.push(format!("ip name-server {}", dns.join(" ")));
            }
            out.extend(p.opt_list("ntpServers")?.iter().map(|s| format!("ntp server {s}")));
            out.extend(
                [
                    "service timestamps debug datetime msec",
                    "service timestamps log datetime msec",
                    "no ip domain-lookup",
                    "line con 0",
                    " logging synchronous",
                    " exec-timeout 10 0",
                    " privilege level 15",
                    "line vty 0 4",
                    " transport input ssh",
                    " login local",
                    " exec-timeout 10 0",
                ]
                .map(String::from),
            );
        }
        Action::WanUplink => {
            let iface = p.require_str("interface")?;
            let ip = p.require_str("ip")?;
            let mask = p.require_str("mask")?;
            let gateway = p.require_str("gateway")?;
            out.push(format!("interface {iface}"));
            if let Some(description) = p.opt_str("description")? {
                out.push(format!(" description {description}"));
            }
            out.push(format!(" ip address {ip} {mask}"));
            out.push(" no shutdown".to_string());
            out.push("exit".to_string());
            out.push(format!("ip route 0.0.0.0 0.0.0.0 {gateway}"));
        }
        Action::LanVlan => {
            let vlan_id = p.require_vlan_id("vlanId")?;
            let name = p.opt_str("name")?;
            let ip = p.require_str("ip")?;
            let mask = p.require_str("mask")?;
            out.push(format!("vlan {vlan_id}"));
            if let Some(name) = name {
                out.push(format!(" name {name}"));
            }
            out.push("exit".to_string());
            out.push(format!("interface Vlan{vlan_id}"));
            out.push(format!(" ip address {ip} {mask}"));
            out.push(" no shutdown".to_string());
            out.push("exit".to_string());
        }
        Action::DhcpServer => {
            let pool = p.require_str("pool")?;
            let network = p.require_str("network")?;
            let mask = p.require_str("mask")?;
            let gateway = p.require_str("gateway")?;
            let dns = p.opt_list("dnsServers")?;
            out.push(format!("ip dhcp pool {pool}"));
            out.push(format!(" network {network} {mask}"));
            out.push(format!(" default-router {gateway}"));
            if !dns.is_empty() {
                out.push(format!(" dns-server {}", dns.join(" ")));
            }
            out.push("exit".to_string());
        }
        Action::StaticRoute => {
            let network = p.require_str("network")?;
            let mask = p.require_str("mask")?;
            let next_hop = p.require_str("nextHop")?;
            out.push(format!("ip route {network} {mask} {next_hop}"));
        }
        Action::Ospf => {
            let process_id = p.str_or("processId", "1")?;
            let area = p.str_or("area", "0")?;
            let networks = p.require_list("networks")?;
            out.push(format!("router ospf {process_id}"));
            out.extend(networks.iter().map(|n| format!(" network {n} area {area}")));
            out.push("exit".to_string());
        }
        Action::NatOverload => {
            let inside = p.require_list("insideInterfaces")?;
            let outside = p.require_str("outsideInterface")?;
            let acl = p.str_or("aclName", "NAT_INSIDE")?;
            let networks = p.require_list("insideNetworks")?;
            out.extend(networks.iter().map(|n| format!("access-list {acl} permit {n}")));
            for iface in &inside {
                out.push(format!("interface {iface}"));
                out.push(" ip nat inside".to_string());
            }
            out.push(format!("interface {outside}"));
            out.push(" ip nat outside".to_string());
            out.push(format!("ip nat inside source list {acl} interface {outside} overload"));
        }
        Action::FirewallBasic => {
            let outside = p.require_str("outsideInterface")?;
            let inside = p.require_str("insideInterface")?;
            let inside_acl = p.str_or("insideAcl", "INSIDE-IN")?;
            let mgmt_host = p.opt_str("mgmtHost")?;
            out.push(format!("interface {inside}"));
            out.push(format!(" ip access-group {inside_acl} in"));
            out.push(format!("ip access-list extended {inside_acl}"));
            out.push(" permit ip any any".to_string());
            out.push("exit".to_string());
            out.push(format!("interface {outside}"));
            out.push(" ip access-group OUTSIDE-IN in".to_string());
            out.push("ip access-list extended OUTSIDE-IN".to_string());
            out.push(" permit icmp any any".to_string());
            if let Some(host) = mgmt_host {
                out.push(format!(" permit tcp any host {host} eq 22"));
            }
            out.push(" deny   ip any any log".to_string());
            out.push("exit".to_string());
        }
        Action::LoadBalancing => {
            let gw1 = p.require_str("gateway1")?;
            let gw2 = p.require_str("gateway2")?;
            out.push(format!("ip route 0.0.0.0 0.0.0.0 {gw1} 1"));
            out.push(format!("ip route 0.0.0.0 0.0.0.0 {gw2} 2"));
        }
        Action::Bridge => {
            let vlan_id = p.require_vlan_id("vlanId")?;
            let ports = p.require_list("ports")?;
            out.push(format!("vlan {vlan_id}"));
            for port in &ports {
                out.push(format!("interface {port}"));
                out.push(format!(" switchport access vlan {vlan_id}"));
                out.push(" switchport mode access".to_string());
            }
        }
        Action::SecureBaseline => {
            let hostname = p.str_or("hostname", "CORE-01")?;
            let mgmt_acl = p.str_or("mgmtAcl", "MGMT-ACL")?;
            let mgmt_network = p.str_or("mgmtNetwork", "10.0.100.0 0.0.0.255")?;
            let syslog = p.str_or("syslog", "10.0.200.10")?;
            let snmp_user = p.str_or("snmpUser", "secops")?;
            let admin_secret = p.require_str("adminSecret")?;
            let snmp_auth = p.require_str("snmpAuth")?;
            let snmp_priv = p.require_str("snmpPriv")?;
            let ntp = p.opt_list("ntpServers")?;
            out.push(format!("hostname {hostname}"));
            out.extend(
                [
                    "no ip http server",
                    "no ip http secure-server",
                    "ip ssh version 2",
                    "service password-encryption",
                    "aaa new-model",
                ]
                .map(String::from),
            );
            out.push(format!("username admin privilege 15 secret {admin_secret}"));
            out.push(format!("ip access-list standard {mgmt_acl}"));
            out.push(format!(" permit {mgmt_network}"));
            out.push(" deny any log".to_string());
            out.push("line vty 0 4".to_string());
            out.push(format!(" access-class {mgmt_acl} in"));
            out.extend([" transport input ssh", " login local", " exec-timeout 10 0"].map(String::from));
            out.extend(ntp.iter().map(|s| format!("ntp server {s}")));
            out.push(format!("logging host {syslog}"));
            out.push("logging trap warnings".to_string());
            out.push("snmp-server group SECOPS v3 priv".to_string());
            out.push(format!(
                "snmp-server user {snmp_user} SECOPS v3 auth sha {snmp_auth} priv aes 128 {snmp_priv}"
            ));
            out.extend(
                [
                    "snmp-server enable traps syslog",
                    "ip tcp synwait-time 10",
                    "ip ssh time-out 60",
                    "ip ssh authentication-retries 2",
                ]
                .map(String::from),
            );
        }
    }
    out.push("end".to_string());
    Ok(out)
}

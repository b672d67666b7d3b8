//! FortiOS templates.

use super::{Action, GenerateError, ParamReader};

/// Builds `config ... end` blocks with four-space nesting.
#[derive(Default)]
struct Blocks {
    lines: Vec<String>,
    depth: usize,
}

impl Blocks {
    fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("{}{}", "    ".repeat(self.depth), text.as_ref()));
        self
    }

    fn config(&mut self, path: &str) -> &mut Self {
        self.line(format!("config {path}"));
        self.depth += 1;
        self
    }

    fn edit(&mut self, entry: impl AsRef<str>) -> &mut Self {
        self.line(format!("edit {}", entry.as_ref()));
        self.depth += 1;
        self
    }

    fn next(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("next")
    }

    fn end(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("end")
    }

    fn set(&mut self, setting: impl AsRef<str>) -> &mut Self {
        self.line(format!("set {}", setting.as_ref()))
    }

    fn finish(self) -> Vec<String> {
        self.lines
    }
}

pub(super) fn generate(action: Action, p: &ParamReader<'_>) -> Result<Vec<String>, GenerateError> {
    let mut b = Blocks::default();
    match action {
        Action::Baseline => {
            let hostname = p.require_str("hostname")?;
            let timezone = p.str_or("timezone", "04")?;
            let dns = p.opt_list("dnsServers")?;
            let ntp = p.opt_list("ntpServers")?;
            b.config("system global")
                .set(format!("hostname \"{hostname}\""))
                .set(format!("timezone {timezone}"))
                .end();
            dns_block(&mut b, &dns);
            ntp_block(&mut b, &ntp);
        }
        Action::WanUplink => {
            let iface = p.require_str("interface")?;
            let ip = p.require_str("ip")?;
            let mask = p.require_str("mask")?;
            let gateway = p.require_str("gateway")?;
            b.config("system interface")
                .edit(format!("\"{iface}\""))
                .set(format!("ip {ip} {mask}"))
                .set("allowaccess ping https ssh")
                .next()
                .end();
            b.config("router static")
                .edit("1")
                .set("dst 0.0.0.0 0.0.0.0")
                .set(format!("gateway {gateway}"))
                .set(format!("device \"{iface}\""))
                .next()
                .end();
        }
        Action::LanVlan => {
            let vlan_id = p.require_vlan_id("vlanId")?;
            let iface = p.require_str("interface")?;
            let name = p.str_or("name", &format!("vlan{vlan_id}"))?;
            let ip = p.require_str("ip")?;
            let mask = p.require_str("mask")?;
            b.config("system interface")
                .edit(format!("\"{name}\""))
                .set("vdom \"root\"")
                .set(format!("interface \"{iface}\""))
                .set(format!("vlanid {vlan_id}"))
                .set(format!("ip {ip} {mask}"))
                .set("allowaccess ping")
                .next()
                .end();
        }
        Action::DhcpServer => {
            let iface = p.require_str("interface")?;
            let start = p.require_str("start")?;
            let end = p.require_str("end")?;
            let gateway = p.require_str("gateway")?;
            let dns = p.opt_list("dnsServers")?;
            b.config("system dhcp server")
                .edit("1")
                .set(format!("interface \"{iface}\""))
                .set(format!("default-gateway {gateway}"));
            if let Some(primary) = dns.first() {
                b.set(format!("dns-server1 {primary}"));
            }
            b.config("ip-range")
                .edit("1")
                .set(format!("start-ip {start}"))
                .set(format!("end-ip {end}"))
                .next()
                .end()
                .next()
                .end();
        }
        Action::StaticRoute => {
            let network = p.require_str("network")?;
            let mask = p.require_str("mask")?;
            let next_hop = p.require_str("nextHop")?;
            let device = p.opt_str("device")?;
            b.config("router static")
                .edit("0")
                .set(format!("dst {network} {mask}"))
                .set(format!("gateway {next_hop}"));
            if let Some(device) = device {
                b.set(format!("device \"{device}\""));
            }
            b.next().end();
        }
        Action::Ospf => {
            let router_id = p.str_or("routerId", "1.1.1.1")?;
            let area = p.str_or("area", "0.0.0.0")?;
            let networks = p.require_list("networks")?;
            b.config("router ospf").set(format!("router-id {router_id}"));
            if !networks.is_empty() {
                b.config("network");
                for (i, prefix) in networks.iter().enumerate() {
                    b.edit((i + 1).to_string())
                        .set(format!("prefix {prefix}"))
                        .set(format!("area \"{area}\""))
                        .next();
                }
                b.end();
            }
            b.end();
        }
        Action::NatOverload => {
            let src = p.str_or("srcintf", "lan")?;
            let dst = p.str_or("dstintf", "wan")?;
            policy(&mut b, 0, &src, &dst, "\"all\"", "accept", true);
        }
        Action::FirewallBasic => {
            let inside = p.str_or("srcintf", "lan")?;
            let outside = p.str_or("dstintf", "wan")?;
            policy(&mut b, 1, &inside, &outside, "\"all\"", "accept", true);
            policy(&mut b, 2, &outside, &inside, "\"all\"", "deny", false);
        }
        Action::LoadBalancing => {
            let gw1 = p.require_str("gateway1")?;
            let gw2 = p.require_str("gateway2")?;
            let dev1 = p.str_or("dstintf1", "wan1")?;
            let dev2 = p.str_or("dstintf2", "wan2")?;
            b.config("router static");
            for (seq, gateway, device, distance) in [(1, &gw1, &dev1, 10), (2, &gw2, &dev2, 20)] {
                b.edit(seq.to_string())
                    .set("dst 0.0.0.0 0.0.0.0")
                    .set(format!("gateway {gateway}"))
                    .set(format!("device \"{device}\""))
                    .set(format!("distance {distance}"))
                    .next();
            }
            b.end();
        }
        Action::Bridge => {
            let name = p.str_or("name", "br0")?;
            let ports = p.require_list("ports")?;
            b.config("system interface")
                .edit(format!("\"{name}\""))
                .set("type bridge")
                .next()
                .end();
            b.config("system switch-interface").edit(format!("\"{name}\""));
            let members: Vec<String> = ports.iter().map(|port| format!("\"{port}\"")).collect();
            b.set(format!("member {}", members.join(" "))).next().end();
        }
        Action::SecureBaseline => {
            let hostname = p.str_or("hostname", "FGT-01")?;
            let admin_password = p.require_str("adminPassword")?;
            let syslog = p.str_or("syslog", "10.0.200.10")?;
            let ntp = p.opt_list("ntpServers")?;
            let mgmt = p.str_or("mgmtSubnet", "10.0.100.0 255.255.255.0")?;
            let mgmt_intf = p.str_or("mgmtInterface", "mgmt")?;
            let wan_intf = p.str_or("wanInterface", "wan1")?;
            b.config("system global")
                .set(format!("hostname \"{hostname}\""))
                .set("admin-https disable")
                .set("admin-scp enable")
                .set("admin-ssh-port 22")
                .set("admin-lockout-threshold 3")
                .set("admin-lockout-duration 300")
                .end();
            b.config("system admin")
                .edit("\"admin\"")
                .set(format!("password \"{admin_password}\""))
                .next()
                .end();
            ntp_block(&mut b, &ntp);
            b.config("log syslogd setting")
                .set("status enable")
                .set(format!("server \"{syslog}\""))
                .set("facility local7")
                .end();
            b.config("firewall address")
                .edit("\"MGMT_NET\"")
                .set(format!("subnet {mgmt}"))
                .next()
                .end();
            b.config("firewall policy")
                .edit("10")
                .set(format!("srcintf \"{mgmt_intf}\""))
                .set(format!("dstintf \"{wan_intf}\""))
                .set("srcaddr \"MGMT_NET\"")
                .set("dstaddr \"all\"")
                .set("action accept")
                .set("schedule \"always\"")
                .set("service \"ALL\"")
                .set("logtraffic all")
                .next()
                .end();
        }
    }
    Ok(b.finish())
}

fn dns_block(b: &mut Blocks, servers: &[String]) {
    if servers.is_empty() {
        return;
    }
    b.config("system dns");
    b.set(format!("primary {}", servers[0]));
    if let Some(secondary) = servers.get(1) {
        b.set(format!("secondary {secondary}"));
    }
    b.end();
}

fn ntp_block(b: &mut Blocks, servers: &[String]) {
    if servers.is_empty() {
        return;
    }
    b.config("system ntp").set("ntpsync enable").set("type custom").config("ntpserver");
    for (i, server) in servers.iter().enumerate() {
        b.edit((i + 1).to_string()).set(format!("server \"{server}\"")).next();
    }
    b.end().end();
}

fn policy(b: &mut Blocks, seq: u32, src: &str, dst: &str, addr: &str, action: &str, nat: bool) {
    b.config("firewall policy")
        .edit(seq.to_string())
        .set(format!("srcintf \"{src}\""))
        .set(format!("dstintf \"{dst}\""))
        .set(format!("srcaddr {addr}"))
        .set(format!("dstaddr {addr}"))
        .set(format!("action {action}"))
        .set("schedule \"always\"")
        .set("service \"ALL\"");
    if nat {
        b.set("nat enable");
    }
    b.next().end();
}

#[cfg(test)]
mod tests {
    use netcfg_model::Vendor;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::generate::{generate_config_command, Action, GenerateError, GenerateRequest};

    fn run(action: Action, params: Value) -> Result<String, GenerateError> {
        let Value::Object(params) = params else {
            panic!("params must be an object");
        };
        generate_config_command(&GenerateRequest::new(Vendor::Fortigate, action, params))
    }

    #[test]
    fn static_route_with_device() {
        let out = run(
            Action::StaticRoute,
            json!({"network": "10.50.0.0", "mask": "255.255.0.0", "nextHop": "10.0.0.254", "device": "port2"}),
        )
        .expect("generate");
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                "config router static",
                "    edit 0",
                "        set dst 10.50.0.0 255.255.0.0",
                "        set gateway 10.0.0.254",
                "        set device \"port2\"",
                "    next",
                "end",
            ]
        );
    }

    #[test]
    fn dhcp_server_nests_ip_range() {
        let out = run(
            Action::DhcpServer,
            json!({"interface": "lan", "start": "10.0.0.100", "end": "10.0.0.200", "gateway": "10.0.0.1"}),
        )
        .expect("generate");
        assert!(out.contains("        config ip-range\n            edit 1\n                set start-ip 10.0.0.100"));
        assert!(out.ends_with("        end\n    next\nend"));
        assert!(!out.contains("dns-server1"));
    }

    #[test]
    fn baseline_blocks_for_optional_services() {
        let out = run(Action::Baseline, json!({"hostname": "fw1"})).expect("generate");
        assert_eq!(out.matches("config ").count(), 1);

        let out = run(
            Action::Baseline,
            json!({"hostname": "fw1", "dnsServers": ["1.1.1.1", "9.9.9.9"], "ntpServers": ["10.0.0.1"]}),
        )
        .expect("generate");
        assert!(out.contains("config system dns\n    set primary 1.1.1.1\n    set secondary 9.9.9.9\nend"));
        assert!(out.contains("config ntpserver"));
    }

    #[test]
    fn firewall_basic_has_accept_then_deny() {
        let out = run(Action::FirewallBasic, json!({})).expect("generate");
        let accept = out.find("set action accept").expect("accept");
        let deny = out.find("set action deny").expect("deny");
        assert!(accept < deny);
        assert_eq!(out.matches("set nat enable").count(), 1);
    }

    #[test]
    fn secure_baseline_requires_admin_password() {
        let err = run(Action::SecureBaseline, json!({})).unwrap_err();
        assert_eq!(err, GenerateError::MissingParam { key: "adminPassword".into() });
    }
}

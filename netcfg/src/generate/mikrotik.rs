//! RouterOS templates. One command per line, no configuration mode.

use super::{Action, GenerateError, ParamReader};

pub(super) fn generate(action: Action, p: &ParamReader<'_>) -> Result<Vec<String>, GenerateError> {
    let out = match action {
        Action::Baseline => {
            let hostname = p.require_str("hostname")?;
            let dns = p.opt_list("dnsServers")?;
            let ntp = p.opt_list("ntpServers")?;
            let mut out = vec![format!("/system identity set name={hostname}")];
            if !dns.is_empty() {
                out.push(format!("/ip dns set servers={} allow-remote-requests=yes", dns.join(",")));
            }
            if let Some(primary) = ntp.first() {
                let mut line = format!("/system ntp client set enabled=yes primary-ntp={primary}");
                if let Some(secondary) = ntp.get(1) {
                    line.push_str(&format!(" secondary-ntp={secondary}"));
                }
                out.push(line);
            }
            out.push("/system logging add topics=firewall action=memory".to_string());
            out
        }
        Action::WanUplink => {
            let iface = p.require_str("interface")?;
            let cidr = p.require_str("cidr")?;
            let gateway = p.require_str("gateway")?;
            vec![
                format!("/ip address add address={cidr} interface={iface} comment=\"WAN\""),
                format!("/ip route add dst-address=0.0.0.0/0 gateway={gateway}"),
            ]
        }
        Action::LanVlan => {
            let vlan_id = p.require_vlan_id("vlanId")?;
            let iface = p.require_str("interface")?;
            let name = p.str_or("name", &format!("vlan{vlan_id}"))?;
            let cidr = p.require_str("cidr")?;
            vec![
                format!("/interface vlan add name={name} vlan-id={vlan_id} interface={iface}"),
                format!("/ip address add address={cidr} interface={name}"),
            ]
        }
        Action::DhcpServer => {
            let iface = p.require_str("interface")?;
            let pool = p.str_or("pool", "dhcp_pool")?;
            let start = p.require_str("start")?;
            let end = p.require_str("end")?;
            let gateway = p.require_str("gateway")?;
            let network = p.str_or("network", &gateway)?;
            let dns = p.opt_list("dnsServers")?;
            let dns = dns.first().unwrap_or(&gateway);
            vec![
                format!("/ip pool add name={pool} ranges={start}-{end}"),
                format!("/ip dhcp-server network add address={network} gateway={gateway} dns-server={dns}"),
                format!(
                    "/ip dhcp-server add name=dhcp1 interface={iface} address-pool={pool} lease-time=1d disabled=no"
                ),
            ]
        }
        Action::StaticRoute => {
            let dst = p.require_str("dst")?;
            let gateway = p.require_str("gateway")?;
            vec![format!("/ip route add dst-address={dst} gateway={gateway}")]
        }
        Action::Ospf => {
            let area = p.str_or("area", "backbone")?;
            let networks = p.require_list("networks")?;
            let mut out = vec![format!("/routing ospf area add name={area}")];
            out.extend(
                networks
                    .iter()
                    .map(|n| format!("/routing ospf network add network={n} area={area}")),
            );
            out
        }
        Action::NatOverload => {
            let out_iface = p.require_str("outInterface")?;
            vec![format!("/ip firewall nat add chain=srcnat out-interface={out_iface} action=masquerade")]
        }
        Action::FirewallBasic => {
            let lan = p.str_or("lanInterface", "lan")?;
            let wan = p.str_or("wanInterface", "WAN")?;
            vec![
                "/ip firewall filter add chain=input action=accept connection-state=established,related".to_string(),
                "/ip firewall filter add chain=input action=drop connection-state=invalid".to_string(),
                "/ip firewall filter add chain=input protocol=tcp dst-port=22,80,443 action=accept".to_string(),
                format!("/ip firewall filter add chain=input in-interface=!{lan} action=drop"),
                "/ip firewall filter add chain=forward action=accept connection-state=established,related".to_string(),
                "/ip firewall filter add chain=forward action=drop connection-state=invalid".to_string(),
                format!(
                    "/ip firewall filter add chain=forward action=accept connection-state=new in-interface={lan} out-interface={wan}"
                ),
                "/ip firewall filter add chain=forward action=drop".to_string(),
            ]
        }
        Action::LoadBalancing => {
            let gw1 = p.require_str("gateway1")?;
            let gw2 = p.require_str("gateway2")?;
            let mut out = vec![format!(
                "/ip route add dst-address=0.0.0.0/0 gateway={gw1},{gw2} check-gateway=ping"
            )];
            for (i, mark) in ["WAN1", "WAN2"].iter().enumerate() {
                out.push(format!(
                    "/ip firewall mangle add chain=prerouting dst-address-type=!local action=mark-connection new-connection-mark={mark} passthrough=yes per-connection-classifier=src-address:2/{i}"
                ));
            }
            for mark in ["WAN1", "WAN2"] {
                out.push(format!(
                    "/ip firewall mangle add chain=prerouting connection-mark={mark} action=mark-routing new-routing-mark=to_{mark} passthrough=yes"
                ));
            }
            for (gateway, mark) in [(&gw1, "WAN1"), (&gw2, "WAN2")] {
                out.push(format!(
                    "/ip route add dst-address=0.0.0.0/0 gateway={gateway} routing-mark=to_{mark} check-gateway=ping"
                ));
            }
            out
        }
        Action::Bridge => {
            let name = p.str_or("name", "bridge1")?;
            let ports = p.require_list("ports")?;
            let mut out = vec![format!("/interface bridge add name={name} comment=\"LAN bridge\"")];
            out.extend(
                ports
                    .iter()
                    .map(|port| format!("/interface bridge port add bridge={name} interface={port}")),
            );
            out
        }
        Action::SecureBaseline => {
            let hostname = p.str_or("hostname", "RB-01")?;
            let syslog = p.str_or("syslog", "10.0.200.10")?;
            let mgmt = p.str_or("mgmtCidr", "10.0.100.0/24")?;
            let ntp = p.opt_list("ntpServers")?;
            let ntp = ntp.first().map_or("pool.ntp.org", String::as_str);
            let mut out = vec![
                format!("/system identity set name={hostname}"),
                format!("/system ntp client set enabled=yes primary-ntp={ntp}"),
                format!("/system logging action add name=remote target=remote remote={syslog} remote-port=514"),
                "/system logging add topics=info action=remote".to_string(),
            ];
            out.extend(
                ["www", "telnet", "ftp", "api", "api-ssl"]
                    .iter()
                    .map(|svc| format!("/ip service set {svc} disabled=yes")),
            );
            out.push(format!("/ip service set ssh address={mgmt}"));
            out.extend([
                "/ip firewall filter add chain=input action=accept connection-state=established,related".to_string(),
                "/ip firewall filter add chain=input action=drop connection-state=invalid".to_string(),
                format!("/ip firewall filter add chain=input src-address={mgmt} action=accept"),
                "/ip firewall filter add chain=input in-interface=!mgmt action=drop".to_string(),
                "/ip firewall filter add chain=forward action=accept connection-state=established,related".to_string(),
                "/ip firewall filter add chain=forward action=drop connection-state=invalid".to_string(),
                "/ip firewall filter add chain=forward action=drop connection-state=new in-interface=!lan".to_string(),
            ]);
            out
        }
    };
    Ok(out)
}

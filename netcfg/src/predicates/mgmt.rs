//! Management-plane checks: SSH, SNMP, NTP and enable secrets.

use netcfg_model::normalized::SnmpVersion;
use netcfg_model::{NormalizedConfig, Vendor};

use super::{BuiltinPredicate, PredicateOutcome};

inventory::submit! {
    BuiltinPredicate {
        name: "snmp_community_not_default",
        description: "SNMP is disabled, or runs v3 with configured users",
        check: snmp_community_not_default,
    }
}

inventory::submit! {
    BuiltinPredicate {
        name: "snmpV3Only",
        description: "SNMP version is v3",
        check: snmp_v3_only,
    }
}

inventory::submit! {
    BuiltinPredicate {
        name: "sshEnabled",
        description: "SSH management access is enabled",
        check: ssh_enabled,
    }
}

inventory::submit! {
    BuiltinPredicate {
        name: "multipleNtpServers",
        description: "At least two NTP servers are configured",
        check: multiple_ntp_servers,
    }
}

inventory::submit! {
    BuiltinPredicate {
        name: "cisco_enable_encrypted",
        description: "Enable secret encryption (advisory; needs raw config)",
        check: cisco_enable_encrypted,
    }
}

/// Community strings are redacted upstream, so v1/v2c is flagged for review
/// whenever SNMP is on.
fn snmp_community_not_default(config: &NormalizedConfig) -> PredicateOutcome {
    let snmp = &config.mgmt.snmp;
    if !snmp.enabled {
        return PredicateOutcome::pass();
    }
    if snmp.version == Some(SnmpVersion::V3) && !snmp.users.is_empty() {
        return PredicateOutcome::pass();
    }
    PredicateOutcome::verdict(
        snmp.version == Some(SnmpVersion::V3),
        "SNMP v1/v2c detected - ensure non-default community strings are used",
    )
    .at_path("$.mgmt.snmp")
}

fn snmp_v3_only(config: &NormalizedConfig) -> PredicateOutcome {
    PredicateOutcome::verdict(config.mgmt.snmp.version == Some(SnmpVersion::V3), "SNMP not v3")
}

fn ssh_enabled(config: &NormalizedConfig) -> PredicateOutcome {
    PredicateOutcome::verdict(config.mgmt.ssh.enabled, "SSH not enabled")
}

fn multiple_ntp_servers(config: &NormalizedConfig) -> PredicateOutcome {
    let count = config.mgmt.ntp.servers.len();
    let outcome = if count >= 2 {
        PredicateOutcome::pass()
    } else {
        PredicateOutcome::fail("")
    };
    outcome.with_message(format!("NTP servers: {count}"))
}

fn cisco_enable_encrypted(config: &NormalizedConfig) -> PredicateOutcome {
    if config.vendor() != Vendor::Cisco {
        return PredicateOutcome::pass();
    }
    PredicateOutcome::pass().with_message("Enable secret encryption check requires raw config analysis")
}

#[cfg(test)]
mod tests {
    use netcfg_model::normalized::NtpServer;

    use super::*;

    fn snmp(enabled: bool, version: Option<SnmpVersion>, users: &[&str]) -> NormalizedConfig {
        let mut cfg = NormalizedConfig::for_vendor(Vendor::Cisco, "r1");
        cfg.mgmt.snmp.enabled = enabled;
        cfg.mgmt.snmp.version = version;
        cfg.mgmt.snmp.users = users.iter().map(|u| u.to_string()).collect();
        cfg
    }

    #[test]
    fn snmp_community_flags_legacy_versions() {
        assert!(snmp_community_not_default(&snmp(false, Some(SnmpVersion::V2c), &[])).passed);
        assert!(snmp_community_not_default(&snmp(true, Some(SnmpVersion::V3), &["ops"])).passed);

        let out = snmp_community_not_default(&snmp(true, Some(SnmpVersion::V2c), &[]));
        assert!(!out.passed);
        assert_eq!(out.path.as_deref(), Some("$.mgmt.snmp"));
        assert!(out.message.unwrap_or_default().contains("v1/v2c"));
    }

    #[test]
    fn snmp_v3_without_users_still_passes_version_gate() {
        assert!(snmp_community_not_default(&snmp(true, Some(SnmpVersion::V3), &[])).passed);
        assert!(!snmp_v3_only(&snmp(true, None, &[])).passed);
    }

    #[test]
    fn ntp_needs_two_servers() {
        let mut cfg = NormalizedConfig::for_vendor(Vendor::Mikrotik, "mt");
        cfg.mgmt.ntp.servers.push(NtpServer {
            address: "0.pool.ntp.org".into(),
            prefer: false,
        });
        let out = multiple_ntp_servers(&cfg);
        assert!(!out.passed);
        assert_eq!(out.message.as_deref(), Some("NTP servers: 1"));

        cfg.mgmt.ntp.servers.push(NtpServer {
            address: "1.pool.ntp.org".into(),
            prefer: false,
        });
        assert!(multiple_ntp_servers(&cfg).passed);
    }

    #[test]
    fn enable_secret_check_is_advisory() {
        let cisco = cisco_enable_encrypted(&NormalizedConfig::for_vendor(Vendor::Cisco, "r1"));
        assert!(cisco.passed);
        assert!(cisco.message.is_some());
        let forti = cisco_enable_encrypted(&NormalizedConfig::for_vendor(Vendor::Fortigate, "fw"));
        assert!(forti.message.is_none());
    }

    #[test]
    fn ssh_must_be_enabled() {
        let mut cfg = NormalizedConfig::for_vendor(Vendor::Cisco, "r1");
        assert_eq!(ssh_enabled(&cfg).message.as_deref(), Some("SSH not enabled"));
        cfg.mgmt.ssh.enabled = true;
        assert!(ssh_enabled(&cfg).passed);
    }
}

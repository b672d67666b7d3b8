use netcfg_model::NormalizedConfig;

use super::{BuiltinPredicate, PredicateOutcome};

/// Substrings that mark a phase-1 proposal as weak. `3des` also contains
/// `des`; a proposal is reported once either way.
const WEAK_CRYPTO: [&str; 3] = ["des", "3des", "md5"];

inventory::submit! {
    BuiltinPredicate {
        name: "vpn_strong_crypto",
        description: "VPN phase-1 proposals avoid DES, 3DES and MD5",
        check: vpn_strong_crypto,
    }
}

fn is_weak(algorithm: &str) -> bool {
    let lower = algorithm.to_ascii_lowercase();
    WEAK_CRYPTO.iter().any(|weak| lower.contains(weak))
}

fn vpn_strong_crypto(config: &NormalizedConfig) -> PredicateOutcome {
    let mut violations = Vec::new();
    for tunnel in &config.security.vpn_tunnels {
        let Some(phase1) = &tunnel.phase1 else {
            continue;
        };
        for enc in phase1.encryption.iter().filter(|enc| is_weak(enc)) {
            violations.push(format!("VPN {}: weak encryption {enc}", tunnel.name));
        }
        for hash in phase1.hash.iter().filter(|hash| is_weak(hash)) {
            violations.push(format!("VPN {}: weak hash {hash}", tunnel.name));
        }
    }
    PredicateOutcome::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use netcfg_model::normalized::{VpnPhase, VpnTunnel};
    use netcfg_model::Vendor;

    use super::*;

    fn tunnel(name: &str, encryption: &[&str], hash: &[&str]) -> VpnTunnel {
        VpnTunnel {
            name: name.into(),
            phase1: Some(VpnPhase {
                encryption: encryption.iter().map(|s| s.to_string()).collect(),
                hash: hash.iter().map(|s| s.to_string()).collect(),
                ..VpnPhase::default()
            }),
            ..VpnTunnel::default()
        }
    }

    #[test]
    fn weak_phase1_algorithms_are_listed() {
        let mut cfg = NormalizedConfig::for_vendor(Vendor::Fortigate, "fw");
        cfg.security.vpn_tunnels = vec![
            tunnel("hq", &["aes256"], &["sha256"]),
            tunnel("legacy", &["3DES", "aes128"], &["md5"]),
        ];
        let out = vpn_strong_crypto(&cfg);
        assert!(!out.passed);
        assert_eq!(
            out.message.as_deref(),
            Some("VPN legacy: weak encryption 3DES; VPN legacy: weak hash md5")
        );
    }

    #[test]
    fn phase2_and_missing_phases_are_ignored() {
        let mut cfg = NormalizedConfig::for_vendor(Vendor::Cisco, "r1");
        let mut t = tunnel("p2", &["aes256"], &["sha1"]);
        t.phase2 = Some(VpnPhase {
            encryption: vec!["des".into()],
            ..VpnPhase::default()
        });
        cfg.security.vpn_tunnels = vec![t, VpnTunnel::default()];
        assert!(vpn_strong_crypto(&cfg).passed);
    }
}

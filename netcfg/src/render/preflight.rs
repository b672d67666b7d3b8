//! Pre-flight checks on intent before it is rendered.

use netcfg_model::canonical::Environment;
use netcfg_model::{CanonicalConfig, Vendor};

use crate::lint::{LintFinding, Severity};

use super::RenderError;

struct Check {
    id: &'static str,
    name: &'static str,
    severity: Severity,
    field: &'static str,
    message: &'static str,
    remediation: &'static str,
}

impl Check {
    fn finding(&self) -> LintFinding {
        LintFinding::new(self.id, self.name, self.severity, self.message)
            .at_path(self.field)
            .with_remediation(self.remediation)
    }
}

const CISCO_SSH_REQUIRED: Check = Check {
    id: "ssh-required",
    name: "SSH required",
    severity: Severity::High,
    field: "services.ssh.enabled",
    message: "SSH must be enabled on Cisco IOS.",
    remediation: "Enable SSH and enforce v2.",
};

const CISCO_SSH_V2: Check = Check {
    id: "ssh-v2",
    name: "SSH version 2",
    severity: Severity::Medium,
    field: "services.ssh.version",
    message: "Cisco requires SSH v2.",
    remediation: "Set SSH version to 2.",
};

const MIKROTIK_SSH_ENABLED: Check = Check {
    id: "ssh-enabled",
    name: "SSH enabled",
    severity: Severity::Medium,
    field: "services.ssh.enabled",
    message: "SSH service should be enabled on RouterOS.",
    remediation: "Enable SSH or ensure remote access policy.",
};

const FORTIGATE_SSH_ENABLED: Check = Check {
    id: "ssh-enabled",
    name: "SSH enabled",
    severity: Severity::Medium,
    field: "services.ssh.enabled",
    message: "SSH administrative access should be enabled on FortiOS.",
    remediation: "Enable SSH admin access on the management interface.",
};

const FORTIGATE_MGMT_SOURCE: Check = Check {
    id: "mgmt-source",
    name: "Management source restricted",
    severity: Severity::Medium,
    field: "firewall.allowMgmtFrom",
    message: "Firewall is enabled but no management source network is set.",
    remediation: "Set allowMgmtFrom so local-in policies can restrict admin access.",
};

const PROD_SSH_PASSWORD: Check = Check {
    id: "prod-ssh-password",
    name: "No SSH passwords in production",
    severity: Severity::Medium,
    field: "services.ssh.allowPassword",
    message: "Production devices should not allow SSH password authentication.",
    remediation: "Disable password authentication and use keys.",
};

/// Check `config` against the constraints of `vendor`.
///
/// An empty list means the intent is safe to render; findings never block
/// rendering by themselves.
pub fn lint_config(config: &CanonicalConfig, vendor: Vendor) -> Result<Vec<LintFinding>, RenderError> {
    let ssh = config.ssh();
    let ssh_disabled = ssh.is_some_and(|s| !s.enabled);
    let mut findings = Vec::new();

    match vendor {
        Vendor::Cisco => {
            if !config.ssh_enabled() {
                findings.push(CISCO_SSH_REQUIRED.finding());
            }
            if ssh.and_then(|s| s.version) != Some(2) {
                findings.push(CISCO_SSH_V2.finding());
            }
        }
        Vendor::Mikrotik => {
            if ssh_disabled {
                findings.push(MIKROTIK_SSH_ENABLED.finding());
            }
        }
        Vendor::Fortigate => {
            if ssh_disabled {
                findings.push(FORTIGATE_SSH_ENABLED.finding());
            }
            if config.firewall.enabled && config.firewall.allow_mgmt_from.is_none() {
                findings.push(FORTIGATE_MGMT_SOURCE.finding());
            }
        }
        Vendor::Generic => return Err(RenderError::UnsupportedVendor(vendor)),
    }

    if config.environment() == Some(Environment::Prod) && ssh.is_some_and(|s| s.allow_password) {
        findings.push(PROD_SSH_PASSWORD.finding());
    }
    Ok(findings)
}

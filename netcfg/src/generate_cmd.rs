use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use netcfg::generate::{generate_config_command, GenerateRequest, Params};
use netcfg_model::{load_file, Vendor};
use serde_json::Value;

use crate::cli::GenerateArgs;

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut params: Params = match &args.params {
        Some(path) => load_file(path).with_context(|| format!("failed to parse {}", path.display()))?,
        None => Params::new(),
    };
    apply_overrides(&mut params, &args.param)?;

    let request = GenerateRequest::new(Vendor::from(args.vendor), args.action, params);
    let snippet = generate_config_command(&request).with_context(|| {
        format!("generate failed for {} {}", request.vendor, request.action)
    })?;
    println!("{snippet}");
    Ok(())
}

/// Apply `key=value` overrides on top of the params document. The first
/// override of a key replaces the document's value; later ones for the same
/// key accumulate into an array.
fn apply_overrides(params: &mut Params, overrides: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for raw in overrides {
        let Some((key, value)) = raw.split_once('=') else {
            bail!("invalid --param '{raw}': expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid --param '{raw}': empty key");
        }
        let value = parse_value(value);
        if seen.insert(key.to_string()) {
            params.insert(key.to_string(), value);
            continue;
        }
        let slot = params.entry(key.to_string()).or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            let first = slot.take();
            *slot = Value::Array(vec![first]);
        }
        if let Value::Array(items) = slot {
            match value {
                Value::Array(more) => items.extend(more),
                one => items.push(one),
            }
        }
    }
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn overrides_parse_json_and_accumulate_repeats() {
        let mut params = Params::new();
        params.insert("hostname".into(), json!("from-file"));
        let overrides = [
            "hostname=edge-01",
            "vlanId=20",
            "ports=Gi0/1",
            "ports=Gi0/2",
            "networks=[\"10.0.0.0 0.0.0.255\"]",
        ]
        .map(String::from);
        apply_overrides(&mut params, &overrides).expect("overrides");
        assert_eq!(
            Value::Object(params),
            json!({
                "hostname": "edge-01",
                "vlanId": 20,
                "ports": ["Gi0/1", "Gi0/2"],
                "networks": ["10.0.0.0 0.0.0.255"]
            })
        );
    }

    #[test]
    fn override_without_equals_is_rejected() {
        let err = apply_overrides(&mut Params::new(), &["hostname".to_string()]).unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }
}

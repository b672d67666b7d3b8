use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// On-disk document encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(DocumentFormat::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(DocumentFormat::Toml)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("unsupported document extension for {path} (expected .json or .toml)")]
    UnsupportedExtension { path: String },
}

/// Read and deserialize a JSON or TOML document.
///
/// # Arguments
///
/// * `path` - File to read; the extension selects the decoder
///
/// # Returns
///
/// The decoded document, or a [`LoadError`] naming `path`
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let label = path.display().to_string();
    let Some(format) = DocumentFormat::from_path(path) else {
        return Err(LoadError::UnsupportedExtension { path: label });
    };
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: label.clone(),
        source,
    })?;
    load_str(&raw, format, label)
}

/// Deserialize an in-memory document. `label` is used in error messages.
pub fn load_str<T: DeserializeOwned>(
    raw: &str,
    format: DocumentFormat,
    label: impl Into<String>,
) -> Result<T, LoadError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(raw).map_err(|source| LoadError::Json {
            path: label.into(),
            source,
        }),
        DocumentFormat::Toml => toml::from_str(raw).map_err(|source| LoadError::Toml {
            path: label.into(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::{CanonicalConfig, NormalizedConfig, Vendor};

    #[test]
    fn picks_format_by_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/b.JSON")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("rules.toml")),
            Some(DocumentFormat::Toml)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("x.yaml")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn loads_json_and_toml_files() {
        let dir = tempdir().expect("tempdir");
        let json = dir.path().join("device.json");
        fs::write(&json, r#"{"device":{"vendor":"cisco","hostname":"r1"}}"#).expect("write");
        let cfg: NormalizedConfig = load_file(&json).expect("load json");
        assert_eq!(cfg.vendor(), Vendor::Cisco);

        let toml_path = dir.path().join("intent.toml");
        fs::write(&toml_path, "hostname = \"edge\"\n[[vlans]]\nid = 20\n").expect("write");
        let intent: CanonicalConfig = load_file(&toml_path).expect("load toml");
        assert_eq!(intent.hostname.as_deref(), Some("edge"));
        assert_eq!(intent.vlans[0].id, 20);
    }

    #[test]
    fn errors_name_the_path() {
        let dir = tempdir().expect("tempdir");
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").expect("write");
        let err = load_file::<NormalizedConfig>(&bad).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));

        let missing = dir.path().join("missing.toml");
        let err = load_file::<NormalizedConfig>(&missing).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));

        let err = load_file::<NormalizedConfig>(Path::new("config.xml")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension { .. }));
    }
}

use crate::error::{Error, Result};
use crate::types::{Addon, AddonDescriptor, Host, MANIFEST_VERSION, Manifest};
use crate::utils::fs::{descriptor_files, display_name};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Loads every descriptor in `dir`, in file-name order. All problems across
/// all files are reported together as one `Error::Validation`.
pub fn load_descriptors(dir: &Path) -> Result<Vec<Addon>> {
    let mut addons = Vec::new();
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();

    for path in descriptor_files(dir)? {
        let file = display_name(&path);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                errors.push(format!("{}: {}", file, e));
                continue;
            }
        };

        let descriptor: AddonDescriptor = match toml::from_str(&text) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                errors.push(format!("{}: {}", file, e.to_string().trim_end()));
                continue;
            }
        };

        let problems = check_descriptor(&descriptor);
        if !problems.is_empty() {
            errors.extend(problems.into_iter().map(|p| format!("{}: {}", file, p)));
            continue;
        }

        if !seen_ids.insert(descriptor.package.id.clone()) {
            errors.push(format!(
                "{}: duplicate addon id '{}'",
                file, descriptor.package.id
            ));
            continue;
        }

        addons.push(Addon::from(descriptor));
    }

    if errors.is_empty() {
        Ok(addons)
    } else {
        Err(Error::Validation(errors))
    }
}

/// Semantic checks that the descriptor's shape alone does not enforce.
pub fn check_descriptor(descriptor: &AddonDescriptor) -> Vec<String> {
    let mut problems = Vec::new();
    let package = &descriptor.package;

    if package.id.trim().is_empty() {
        problems.push("package.id must not be empty".to_string());
    }
    if package.name.trim().is_empty() {
        problems.push("package.name must not be empty".to_string());
    }

    match &descriptor.host {
        Host::Github(host) => {
            if host.owner_repo().is_none() {
                problems.push(format!(
                    "host.github.url '{}' must have the form owner/repo",
                    host.url
                ));
            }
        }
        Host::Standalone(host) => {
            if host.url.trim().is_empty() {
                problems.push("host.standalone.url must not be empty".to_string());
            }
            if host.version_url.trim().is_empty() {
                problems.push("host.standalone.version_url must not be empty".to_string());
            }
            if host.prerelease_url.is_some() != host.prerelease_version_url.is_some() {
                problems.push(
                    "host.standalone.prerelease_url and prerelease_version_url must be set together"
                        .to_string(),
                );
            }
        }
    }

    problems
}

/// Reads the previously published manifest. A missing file means there is
/// no previous state.
pub fn read_manifest(path: &Path) -> Result<Option<Manifest>> {
    match fs::read_to_string(path) {
        Ok(text) => parse_manifest(&text, path).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Accepts the current `{"version": 1, "data": {...}}` shape and the legacy
/// bare array of addons.
pub fn parse_manifest(text: &str, path: &Path) -> Result<Manifest> {
    let invalid = |reason: String| Error::InvalidManifest {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    if let Some(version) = value.get("version") {
        if version.as_u64() != Some(u64::from(MANIFEST_VERSION)) {
            return Err(invalid(format!("unsupported manifest version {}", version)));
        }
    }

    match value {
        Value::Array(_) => serde_json::from_value::<Vec<Addon>>(value)
            .map(Manifest::new)
            .map_err(|e| invalid(format!("legacy addon list: {}", e))),
        Value::Object(_) => {
            serde_json::from_value::<Manifest>(value).map_err(|e| invalid(e.to_string()))
        }
        _ => Err(invalid(
            "expected a versioned manifest object or an array of addons".to_string(),
        )),
    }
}

/// Pretty-printed JSON with a trailing newline.
pub fn manifest_to_json(manifest: &Manifest) -> Result<String> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    fs::write(path, manifest_to_json(manifest)?)?;
    Ok(())
}

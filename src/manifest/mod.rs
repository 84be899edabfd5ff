pub mod load;
pub mod merge;

pub use load::{
    check_descriptor, load_descriptors, manifest_to_json, parse_manifest, read_manifest,
    write_manifest,
};
pub use merge::{MergeOutcome, merge};

use crate::error::{Error, Result};
use crate::host::Resolver;
use crate::types::Manifest;
use crate::utils::spinner::{Spinner, run_step};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory holding one `*.toml` descriptor per addon.
    pub addons_path: PathBuf,
    /// Previously published manifest, if any.
    pub manifest_path: Option<PathBuf>,
}

/// An addon whose release check failed; its previous state was kept.
#[derive(Debug)]
pub struct AddonFailure {
    pub addon: String,
    pub error: Error,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub manifest: Manifest,
    pub warnings: Vec<String>,
    pub failures: Vec<AddonFailure>,
}

/// Builds the new manifest: load descriptors, carry over the previous
/// release state and check every addon for new releases, one at a time.
///
/// Only descriptor and manifest problems fail the run. A failing addon is
/// reported in `GenerateReport::failures` and keeps what it had before.
pub async fn generate_manifest(
    options: &GenerateOptions,
    resolver: &Resolver<'_>,
) -> Result<GenerateReport> {
    let fresh = run_step(
        "Loading addon descriptors",
        |addons: &Vec<_>| format!("Loaded {} addon descriptors", addons.len()),
        async { load_descriptors(&options.addons_path) },
    )
    .await?;

    let previous = match &options.manifest_path {
        Some(path) => read_manifest(path)?,
        None => None,
    };

    let MergeOutcome {
        mut addons,
        warnings,
    } = merge(fresh, previous);

    let mut failures = Vec::new();
    for addon in addons.iter_mut() {
        let name = addon.package.name.clone();
        let spinner = Spinner::new(format!("Checking releases of {}", name));
        let result = resolver.resolve(addon).await;
        match result {
            Ok(resolution) => {
                resolution.apply(addon);
                spinner.succeed(format!("Checked {}", name));
            }
            Err(error) => {
                spinner.fail(format!("Failed to update addon {}: {}", name, error));
                failures.push(AddonFailure { addon: name, error });
            }
        }
    }

    Ok(GenerateReport {
        manifest: Manifest::new(addons),
        warnings,
        failures,
    })
}

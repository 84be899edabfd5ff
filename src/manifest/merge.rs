use crate::types::{Addon, Manifest};
use crate::utils::logger::{LogLevel, Logger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub addons: Vec<Addon>,
    pub warnings: Vec<String>,
}

/// Carries release state from the previous manifest onto freshly loaded
/// descriptors. Descriptor metadata always wins; addons that no longer have
/// a descriptor are dropped with a warning.
pub fn merge(fresh: Vec<Addon>, previous: Option<Manifest>) -> MergeOutcome {
    let mut addons = fresh;
    let mut warnings = Vec::new();
    let logger = Logger::new();

    for old in previous.map(Manifest::into_addons).unwrap_or_default() {
        match addons.iter_mut().find(|a| a.package.id == old.package.id) {
            Some(addon) => {
                addon.release = old.release;
                addon.prerelease = old.prerelease;
                addon.addon_names = old.addon_names;
            }
            None => {
                let warning = format!("Addon {} was removed from manifest!", old.package.id);
                logger.log_message(LogLevel::Warning, &warning);
                warnings.push(warning);
            }
        }
    }

    MergeOutcome { addons, warnings }
}

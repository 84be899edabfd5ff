pub mod github;
pub mod http;
pub mod standalone;

pub use github::{GithubAsset, GithubClient, GithubRelease, ReleaseApi};
pub use http::{Fetcher, HttpFetcher, TextResponse};

use crate::error::Result;
use crate::release::{ArtifactKind, ExportProbe, create_release, is_greater};
use crate::types::{Addon, Host, Release};
use crate::utils::logger::{LogLevel, Logger};

/// Result of checking one release track (stable or pre-release).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Upstream artifact did not change; nothing was downloaded.
    Unchanged,
    /// A strictly newer release was found.
    Updated(Release),
    /// A usable artifact was found but it is not newer than the known one.
    NotNewer(Release),
}

impl TrackOutcome {
    /// Value the track's slot should hold given what it held before.
    pub fn into_slot(self, previous: Option<&Release>) -> Option<Release> {
        match self {
            TrackOutcome::Updated(release) => Some(release),
            TrackOutcome::Unchanged | TrackOutcome::NotNewer(_) => previous.cloned(),
        }
    }
}

/// Accepts `candidate` only when there is no previous release or it is
/// strictly greater than it.
pub fn accept_if_newer(candidate: Release, previous: Option<&Release>) -> TrackOutcome {
    match previous {
        Some(previous) if !is_greater(&candidate.version, &previous.version) => {
            TrackOutcome::NotNewer(candidate)
        }
        _ => TrackOutcome::Updated(candidate),
    }
}

pub(crate) fn log_new_release(addon_name: &str, track: &str, outcome: &TrackOutcome) {
    if let TrackOutcome::Updated(release) = outcome {
        Logger::new().log_message(
            LogLevel::Info,
            &format!("New {} {} for addon {}", track, release.version_str, addon_name),
        );
    }
}

/// New release state for one addon. Applied by the caller only when the whole
/// resolution succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub release: Option<Release>,
    pub prerelease: Option<Release>,
    pub discovered_names: Vec<String>,
}

impl Resolution {
    pub fn apply(self, addon: &mut Addon) {
        addon.release = self.release;
        addon.prerelease = self.prerelease;
        for name in &self.discovered_names {
            addon.add_addon_name(name);
        }
    }
}

/// Collaborators needed to resolve releases, borrowed for the length of a run.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    pub releases: &'a dyn ReleaseApi,
    pub fetcher: &'a dyn Fetcher,
    pub probe: &'a dyn ExportProbe,
}

impl<'a> Resolver<'a> {
    pub fn new(
        releases: &'a dyn ReleaseApi,
        fetcher: &'a dyn Fetcher,
        probe: &'a dyn ExportProbe,
    ) -> Self {
        Resolver {
            releases,
            fetcher,
            probe,
        }
    }

    /// Computes the new release state of `addon` without touching it.
    pub async fn resolve(&self, addon: &Addon) -> Result<Resolution> {
        match &addon.host {
            Host::Github(host) => github::resolve(self, addon, host).await,
            Host::Standalone(host) => standalone::resolve(self, addon, host).await,
        }
    }

    /// Downloads `url` and runs artifact selection on it, recording the name
    /// of any binary found.
    async fn download_candidate(
        &self,
        addon_name: &str,
        kind: ArtifactKind,
        url: &str,
        id: &str,
        names: &mut Vec<String>,
    ) -> Result<Option<Release>> {
        let bytes = self.fetcher.fetch(url).await?;
        let release = create_release(kind, self.probe, addon_name, &bytes, id, url).await?;
        if let Some(release) = &release {
            if !names.contains(&release.name) {
                names.push(release.name.clone());
            }
        }
        Ok(release)
    }
}

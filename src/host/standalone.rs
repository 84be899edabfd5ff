use crate::error::{Error, Result};
use crate::host::{Resolution, Resolver, TrackOutcome, accept_if_newer, log_new_release};
use crate::release::{ArtifactKind, is_greater};
use crate::types::{Addon, Release, StandaloneHost};
use crate::utils::logger::{LogLevel, Logger};

pub(crate) async fn resolve(
    resolver: &Resolver<'_>,
    addon: &Addon,
    host: &StandaloneHost,
) -> Result<Resolution> {
    let addon_name = addon.package.name.as_str();
    let mut names = Vec::new();

    let outcome = check_and_download(
        resolver,
        addon_name,
        addon.release.as_ref(),
        &host.version_url,
        &host.url,
        &mut names,
    )
    .await?;
    log_new_release(addon_name, "release", &outcome);
    let release = outcome.into_slot(addon.release.as_ref());

    // Pre-releases only count while they are ahead of the stable release.
    let mut prerelease = None;
    if let (Some((url, version_url)), Some(stable)) = (host.prerelease_endpoints(), &release) {
        let outcome = check_and_download(
            resolver,
            addon_name,
            addon.prerelease.as_ref(),
            version_url,
            url,
            &mut names,
        )
        .await?;
        prerelease = outcome
            .into_slot(addon.prerelease.as_ref())
            .filter(|candidate| is_greater(&candidate.version, &stable.version));
        if let Some(candidate) = &prerelease {
            if addon.prerelease.as_ref() != Some(candidate) {
                Logger::new().log_message(
                    LogLevel::Info,
                    &format!(
                        "New pre-release {} for addon {}",
                        candidate.version_str, addon_name
                    ),
                );
            }
        }
    }

    Ok(Resolution {
        release,
        prerelease,
        discovered_names: names,
    })
}

/// Reads the version endpoint and downloads `download_url` only when the
/// reported id differs from the cached one.
async fn check_and_download(
    resolver: &Resolver<'_>,
    addon_name: &str,
    previous: Option<&Release>,
    version_url: &str,
    download_url: &str,
    names: &mut Vec<String>,
) -> Result<TrackOutcome> {
    let response = resolver.fetcher.fetch_text(version_url).await?;
    if response.status != 200 {
        return Err(Error::VersionFetch {
            addon: addon_name.to_string(),
            status: response.status,
        });
    }

    let id = response.body.trim();
    if previous.is_some_and(|release| release.id == id) {
        return Ok(TrackOutcome::Unchanged);
    }

    let kind = ArtifactKind::detect(download_url).ok_or_else(|| Error::UnsupportedArtifact {
        url: download_url.to_string(),
    })?;

    match resolver
        .download_candidate(addon_name, kind, download_url, id, names)
        .await?
    {
        Some(release) => Ok(accept_if_newer(release, previous)),
        None => Err(Error::NoReleaseAsset {
            addon: addon_name.to_string(),
        }),
    }
}

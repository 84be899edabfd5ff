use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::{Resolution, Resolver, TrackOutcome, accept_if_newer, log_new_release};
use crate::release::ArtifactKind;
use crate::types::{Addon, GithubHost, Release};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubAsset {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

/// Release listing of a GitHub repository.
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Releases in the order GitHub lists them (newest first).
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<GithubRelease>>;

    /// The release GitHub marks as latest (never a draft or pre-release).
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<GithubRelease>;
}

pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(GithubClient {
            client: config.http_client()?,
            api_url: config.github_api_base().to_string(),
            token: config.github_token.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.api_url, path);
        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::Download {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ReleaseApi for GithubClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<GithubRelease>> {
        self.get_json(&format!("repos/{}/{}/releases", owner, repo))
            .await
    }

    async fn latest_release(&self, owner: &str, repo: &str) -> Result<GithubRelease> {
        self.get_json(&format!("repos/{}/{}/releases/latest", owner, repo))
            .await
    }
}

pub(crate) async fn resolve(
    resolver: &Resolver<'_>,
    addon: &Addon,
    host: &GithubHost,
) -> Result<Resolution> {
    let addon_name = addon.package.name.as_str();
    let (owner, repo) = host.owner_repo().ok_or_else(|| Error::InvalidHost {
        addon: addon_name.to_string(),
        url: host.url.clone(),
    })?;

    let releases = resolver.releases.list_releases(owner, repo).await?;
    let latest = resolver.releases.latest_release(owner, repo).await?;
    let mut names = Vec::new();

    let release = find_release(resolver, addon_name, addon.release.as_ref(), &latest, &mut names)
        .await?;
    log_new_release(addon_name, "release", &release);
    let release = release.into_slot(addon.release.as_ref());

    // Only a pre-release listed before the latest stable tag is still current.
    let mut prerelease = addon.prerelease.clone();
    for candidate in &releases {
        if candidate.prerelease {
            let outcome = find_release(
                resolver,
                addon_name,
                addon.prerelease.as_ref(),
                candidate,
                &mut names,
            )
            .await?;
            log_new_release(addon_name, "pre-release", &outcome);
            prerelease = outcome.into_slot(addon.prerelease.as_ref());
            break;
        } else if candidate.tag_name == latest.tag_name {
            prerelease = None;
            break;
        }
    }

    Ok(Resolution {
        release,
        prerelease,
        discovered_names: names,
    })
}

/// Walks the assets of `github_release` until one yields an addon binary.
async fn find_release(
    resolver: &Resolver<'_>,
    addon_name: &str,
    previous: Option<&Release>,
    github_release: &GithubRelease,
    names: &mut Vec<String>,
) -> Result<TrackOutcome> {
    if !asset_changed(previous, github_release) {
        return Ok(TrackOutcome::Unchanged);
    }

    for (index, asset) in github_release.assets.iter().enumerate() {
        let Some(kind) = ArtifactKind::detect(&asset.name) else {
            continue;
        };
        let id = asset.id.to_string();
        let candidate = resolver
            .download_candidate(addon_name, kind, &asset.browser_download_url, &id, names)
            .await?;
        if let Some(mut release) = candidate {
            release.asset_index = Some(index);
            return Ok(accept_if_newer(release, previous));
        }
    }

    Err(Error::NoReleaseAsset {
        addon: addon_name.to_string(),
    })
}

/// Compares only the asset at the cached index; a release that moved its
/// addon asset to another index is treated as changed.
pub fn asset_changed(previous: Option<&Release>, github_release: &GithubRelease) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    let Some(index) = previous.asset_index else {
        return true;
    };
    match github_release.assets.get(index) {
        Some(asset) => asset.id.to_string() != previous.id,
        None => true,
    }
}

use crate::types::release::Release;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tooltip: String,
    pub website: String,
    pub developer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_tracker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubHost {
    /// `owner/repo`
    pub url: String,
}

impl GithubHost {
    pub fn owner_repo(&self) -> Option<(&str, &str)> {
        let (owner, repo) = self.url.trim_matches('/').split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some((owner, repo))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneHost {
    pub url: String,
    pub version_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease_version_url: Option<String>,
}

impl StandaloneHost {
    /// Pre-release download and version endpoints, when both are configured.
    pub fn prerelease_endpoints(&self) -> Option<(&str, &str)> {
        match (&self.prerelease_url, &self.prerelease_version_url) {
            (Some(url), Some(version_url)) => Some((url.as_str(), version_url.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Host {
    Github(GithubHost),
    Standalone(StandaloneHost),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
    Gw2load,
    Arc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub mode: InstallMode,
}

/// Contents of one descriptor file in the addons directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddonDescriptor {
    pub package: Package,
    pub host: Host,
    pub installation: Installation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub package: Package,
    pub host: Host,
    pub installation: Installation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<Release>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addon_names: Option<IndexSet<String>>,
}

impl Addon {
    /// Records a display name read from a binary; exact duplicates are ignored.
    pub fn add_addon_name(&mut self, name: &str) {
        let names = self.addon_names.get_or_insert_with(IndexSet::new);
        if !names.contains(name) {
            names.insert(name.to_string());
        }
    }
}

impl From<AddonDescriptor> for Addon {
    fn from(descriptor: AddonDescriptor) -> Self {
        Addon {
            package: descriptor.package,
            host: descriptor.host,
            installation: descriptor.installation,
            release: None,
            prerelease: None,
            addon_names: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_repo_requires_two_segments() {
        let host = GithubHost {
            url: "knoxfighter/arcdps-killproof.me-plugin".into(),
        };
        assert_eq!(
            host.owner_repo(),
            Some(("knoxfighter", "arcdps-killproof.me-plugin"))
        );

        for bad in ["knoxfighter", "a/b/c", "/repo", "owner/"] {
            let host = GithubHost { url: bad.into() };
            assert_eq!(host.owner_repo(), None, "{bad}");
        }
    }

    #[test]
    fn addon_names_keep_insertion_order_without_duplicates() {
        let mut addon: Addon = serde_json::from_value(serde_json::json!({
            "package": {
                "id": "x", "name": "X", "description": "", "tooltip": "",
                "website": "", "developer": ""
            },
            "host": { "github": { "url": "a/b" } },
            "installation": { "mode": "arc" }
        }))
        .unwrap();

        addon.add_addon_name("Beta");
        addon.add_addon_name("Alpha");
        addon.add_addon_name("Beta");

        let names: Vec<&str> = addon
            .addon_names
            .as_ref()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn host_uses_external_tag() {
        let host: Host = toml::from_str(
            r#"
            [standalone]
            url = "https://example.com/addon.dll"
            version_url = "https://example.com/version"
            "#,
        )
        .unwrap();

        match host {
            Host::Standalone(standalone) => {
                assert_eq!(standalone.url, "https://example.com/addon.dll");
                assert!(standalone.prerelease_endpoints().is_none());
            }
            Host::Github(_) => panic!("expected standalone host"),
        }
    }
}

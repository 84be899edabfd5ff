use crate::error::Result;
use crate::release::archive::{self, ArchiveMember};
use crate::release::extract::create_release_from_dll;
use crate::release::gate::ExportProbe;
use crate::types::Release;
use crate::utils::logger::{LogLevel, Logger};
use std::fs;
use std::path::{Path, PathBuf};

/// How a downloaded artifact has to be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Binary,
    Archive,
}

impl ArtifactKind {
    /// Detects the kind from the extension of a URL or file name, ignoring any
    /// query string or fragment.
    pub fn detect(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "dll" => Some(ArtifactKind::Binary),
            "zip" => Some(ArtifactKind::Archive),
            _ => None,
        }
    }
}

/// Turns a downloaded artifact into a release candidate.
///
/// `Ok(None)` means the artifact holds no addon DLL and should be skipped.
pub async fn create_release(
    kind: ArtifactKind,
    probe: &dyn ExportProbe,
    addon_name: &str,
    bytes: &[u8],
    id: &str,
    download_url: &str,
) -> Result<Option<Release>> {
    match kind {
        ArtifactKind::Binary => create_release_from_dll(addon_name, bytes, id, download_url).map(Some),
        ArtifactKind::Archive => {
            create_release_from_archive(probe, addon_name, bytes, id, download_url).await
        }
    }
}

/// Picks the first DLL in the archive that passes the export probe.
pub async fn create_release_from_archive(
    probe: &dyn ExportProbe,
    addon_name: &str,
    bytes: &[u8],
    id: &str,
    download_url: &str,
) -> Result<Option<Release>> {
    let members = archive::binary_members(bytes)?;
    // Removed on drop, including early returns.
    let staging = tempfile::tempdir()?;

    for (index, member) in members.iter().enumerate() {
        let path = stage_member(staging.path(), index, member)?;

        if !probe.has_required_exports(&path).await? {
            Logger::new().log_message(
                LogLevel::Debug,
                &format!(
                    "Skipping {} for addon {}: no addon exports",
                    member.path, addon_name
                ),
            );
            continue;
        }

        return create_release_from_dll(addon_name, &member.bytes, id, download_url).map(Some);
    }

    Ok(None)
}

fn stage_member(dir: &Path, index: usize, member: &ArchiveMember) -> Result<PathBuf> {
    let member_dir = dir.join(index.to_string());
    fs::create_dir_all(&member_dir)?;
    let path = member_dir.join(member.file_name());
    fs::write(&path, &member.bytes)?;
    Ok(path)
}

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Nested block of a PE version resource that must be present before a
/// version can be read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStage {
    Resource,
    VersionInfo,
    FixedFileInfo,
    StringTable,
    VersionNumber,
}

impl fmt::Display for ResourceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceStage::Resource => "version resource",
            ResourceStage::VersionInfo => "VS_VERSIONINFO block",
            ResourceStage::FixedFileInfo => "VS_FIXEDFILEINFO block",
            ResourceStage::StringTable => "StringFileInfo table",
            ResourceStage::VersionNumber => "non-zero version number",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid addon descriptors:\n - {}", .0.join("\n - "))]
    Validation(Vec<String>),

    #[error("No {stage} found for addon {addon}")]
    MissingVersion { addon: String, stage: ResourceStage },

    #[error("No addon name found for addon {addon}")]
    MissingName { addon: String },

    #[error("Invalid GitHub host '{url}' for addon {addon}, expected owner/repo")]
    InvalidHost { addon: String, url: String },

    #[error("No release asset found for addon {addon}")]
    NoReleaseAsset { addon: String },

    #[error("Unable to download {url}: status {status}")]
    Download { url: String, status: u16 },

    #[error("Version response status for addon {addon}: {status}")]
    VersionFetch { addon: String, status: u16 },

    #[error("Unsupported artifact type: {url}")]
    UnsupportedArtifact { url: String },

    #[error("Invalid manifest {}: {reason}", .path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Failed to encode manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to run export probe {}: {source}", .tool.display())]
    Probe {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error aborts the whole run rather than a single addon.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidManifest { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

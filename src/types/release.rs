use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-part binary version: major, minor, patch, build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub [u32; 4]);

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32, build: u32) -> Self {
        Version([major, minor, patch, build])
    }

    /// Splits the `MS`/`LS` dword pair of a `VS_FIXEDFILEINFO` version field.
    pub fn from_dwords(ms: u32, ls: u32) -> Self {
        Version([ms >> 16, ms & 0xffff, ls >> 16, ls & 0xffff])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|part| *part == 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, build] = self.0;
        write!(f, "{}.{}.{}.{}", major, minor, patch, build)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub name: String,
    pub version: Version,
    pub version_str: String,
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<usize>,
}

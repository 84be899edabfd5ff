pub mod addon;
pub mod manifest;
pub mod release;

pub use addon::{Addon, AddonDescriptor, GithubHost, Host, InstallMode, Installation, Package, StandaloneHost};
pub use manifest::{Manifest, ManifestData, MANIFEST_VERSION};
pub use release::{Release, Version};

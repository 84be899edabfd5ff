use crate::error::{Error, ResourceStage, Result};
use crate::release::pe::{self, VersionResource};
use crate::types::Release;

/// Builds a release from the version resource of a single DLL.
///
/// The version comes from the file version, falling back to the product
/// version when the former is all zeros. The display string prefers the
/// `FileVersion` then `ProductVersion` strings; the name prefers
/// `ProductName` then `FileDescription`.
pub fn create_release_from_dll(
    addon_name: &str,
    bytes: &[u8],
    id: &str,
    download_url: &str,
) -> Result<Release> {
    let resource = pe::read_version_resource(bytes).map_err(|stage| missing(addon_name, stage))?;
    release_from_resource(addon_name, &resource, id, download_url)
}

pub fn release_from_resource(
    addon_name: &str,
    resource: &VersionResource,
    id: &str,
    download_url: &str,
) -> Result<Release> {
    let fixed = resource
        .fixed
        .ok_or_else(|| missing(addon_name, ResourceStage::FixedFileInfo))?;

    let mut version = fixed.file_version;
    if version.is_zero() {
        version = fixed.product_version;
    }
    if version.is_zero() {
        return Err(missing(addon_name, ResourceStage::VersionNumber));
    }

    let strings = resource
        .strings
        .as_ref()
        .ok_or_else(|| missing(addon_name, ResourceStage::StringTable))?;
    // A key that is present wins even when its value is empty.
    let lookup = |key: &str| strings.get(key).map(String::as_str);

    let version_str = lookup("FileVersion")
        .or_else(|| lookup("ProductVersion"))
        .map(str::to_string)
        .unwrap_or_else(|| version.to_string());

    let name = lookup("ProductName")
        .or_else(|| lookup("FileDescription"))
        .ok_or_else(|| Error::MissingName {
            addon: addon_name.to_string(),
        })?;

    Ok(Release {
        id: id.to_string(),
        name: name.to_string(),
        version,
        version_str,
        download_url: download_url.to_string(),
        asset_index: None,
    })
}

fn missing(addon_name: &str, stage: ResourceStage) -> Error {
    Error::MissingVersion {
        addon: addon_name.to_string(),
        stage,
    }
}

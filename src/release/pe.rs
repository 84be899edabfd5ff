//! Version resource of a PE image, read through `pelite`.

use crate::error::ResourceStage;
use crate::types::Version;
use pelite::image::VS_VERSION;
use pelite::pe32::Pe as _;
use pelite::pe64::Pe as _;
use pelite::resources::Resources;
use pelite::resources::version_info::Language;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFileInfo {
    pub file_version: Version,
    pub product_version: Version,
}

/// Decoded `VS_VERSIONINFO`. The fixed info and the string table are optional
/// in the format, so their absence is reported to the caller rather than here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionResource {
    pub fixed: Option<FixedFileInfo>,
    pub strings: Option<HashMap<String, String>>,
}

/// Reads the version resource of `bytes`, failing with the first stage that
/// could not be located.
pub fn read_version_resource(bytes: &[u8]) -> Result<VersionResource, ResourceStage> {
    let resources = resources(bytes).ok_or(ResourceStage::Resource)?;
    let version_info = resources
        .version_info()
        .map_err(|_| ResourceStage::VersionInfo)?;

    let translation = version_info.translation();
    let file_info = version_info.file_info();

    Ok(VersionResource {
        fixed: file_info.fixed.map(|fixed| FixedFileInfo {
            file_version: to_version(&fixed.dwFileVersion),
            product_version: to_version(&fixed.dwProductVersion),
        }),
        strings: first_string_table(translation, file_info.strings),
    })
}

fn resources(bytes: &[u8]) -> Option<Resources<'_>> {
    match pelite::pe64::PeFile::from_bytes(bytes) {
        Ok(file) => file.resources().ok(),
        Err(_) => pelite::pe32::PeFile::from_bytes(bytes)
            .ok()?
            .resources()
            .ok(),
    }
}

/// String table of the first declared translation, or the only table when
/// the image declares none.
fn first_string_table(
    translation: &[Language],
    mut tables: HashMap<Language, HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    let lang = translation
        .iter()
        .copied()
        .find(|lang| tables.contains_key(lang));

    let table = match lang {
        Some(lang) => tables.remove(&lang)?,
        None => tables.into_values().next()?,
    };
    Some(
        table
            .into_iter()
            .map(|(key, value)| (key, value.trim_end_matches('\0').to_string()))
            .collect(),
    )
}

fn to_version(version: &VS_VERSION) -> Version {
    Version::new(
        u32::from(version.Major),
        u32::from(version.Minor),
        u32::from(version.Patch),
        u32::from(version.Build),
    )
}

use crate::error::Result;
use std::io::{Cursor, Read};

/// Binary file extension looked for inside archives.
pub const BINARY_EXTENSION: &str = ".dll";

#[derive(Debug, Clone)]
pub struct ArchiveMember {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl ArchiveMember {
    pub fn is_binary(&self) -> bool {
        is_binary_path(&self.path)
    }

    /// Last path component, with either separator.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

fn is_binary_path(path: &str) -> bool {
    path.ends_with(BINARY_EXTENSION)
}

/// Decompresses the DLL members of a zip archive, in archive order. Other
/// members are never read.
pub fn binary_members(bytes: &[u8]) -> Result<Vec<ArchiveMember>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut members = Vec::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() || !is_binary_path(file.name()) {
            continue;
        }
        let path = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        members.push(ArchiveMember { path, bytes: data });
    }

    Ok(members)
}

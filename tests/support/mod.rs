#![allow(dead_code)]

use addon_repo::error::{Error, Result};
use addon_repo::host::{Fetcher, GithubAsset, GithubRelease, ReleaseApi, TextResponse};
use addon_repo::release::ExportProbe;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;

const SECTION_RVA: u32 = 0x1000;
const SECTION_FILE_OFFSET: usize = 0x200;
const VERSION_INFO_OFFSET: usize = 0x58;

/// Version resource contents of a synthetic DLL.
#[derive(Debug, Clone, Default)]
pub struct DllInfo {
    /// `(file_ms, file_ls, product_ms, product_ls)`
    pub fixed: Option<(u32, u32, u32, u32)>,
    pub strings: Option<Vec<(String, String)>>,
}

impl DllInfo {
    /// A DLL reporting `a.b.c.d` as both file and product version.
    pub fn new(name: &str, version: [u16; 4]) -> Self {
        let (ms, ls) = dwords(version);
        DllInfo {
            fixed: Some((ms, ls, ms, ls)),
            strings: Some(vec![
                ("ProductName".to_string(), name.to_string()),
                (
                    "FileVersion".to_string(),
                    format!("{}.{}.{}.{}", version[0], version[1], version[2], version[3]),
                ),
            ]),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        build_pe(&self.version_info())
    }

    fn version_info(&self) -> Vec<u8> {
        let mut children = Vec::new();
        if let Some(strings) = &self.strings {
            let entries: Vec<Vec<u8>> = strings
                .iter()
                .map(|(key, value)| {
                    let text = utf16z(value);
                    block(key, &text, (text.len() / 2) as u16, 1, &[])
                })
                .collect();
            let table = block("040904B0", &[], 0, 1, &entries);
            children.push(block("StringFileInfo", &[], 0, 1, &[table]));

            let mut translation = Vec::new();
            translation.extend_from_slice(&0x0409u16.to_le_bytes());
            translation.extend_from_slice(&0x04B0u16.to_le_bytes());
            let var = block("Translation", &translation, 4, 0, &[]);
            children.push(block("VarFileInfo", &[], 0, 1, &[var]));
        }

        let fixed = match self.fixed {
            Some((file_ms, file_ls, product_ms, product_ls)) => {
                let mut fixed = Vec::new();
                for dword in [
                    0xFEEF_04BDu32,
                    0x0001_0000,
                    file_ms,
                    file_ls,
                    product_ms,
                    product_ls,
                    0x3f,
                    0,
                    0x4,
                    0x2,
                    0,
                    0,
                    0,
                ] {
                    fixed.extend_from_slice(&dword.to_le_bytes());
                }
                fixed
            }
            None => Vec::new(),
        };

        block("VS_VERSION_INFO", &fixed, fixed.len() as u16, 0, &children)
    }
}

pub fn dll(name: &str, version: [u16; 4]) -> Vec<u8> {
    DllInfo::new(name, version).build()
}

fn dwords(version: [u16; 4]) -> (u32, u32) {
    (
        (u32::from(version[0]) << 16) | u32::from(version[1]),
        (u32::from(version[2]) << 16) | u32::from(version[3]),
    )
}

fn utf16z(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

fn pad4(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

fn block(key: &str, value: &[u8], value_length: u16, value_type: u16, children: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = vec![0u8; 6];
    buf.extend_from_slice(&utf16z(key));
    pad4(&mut buf);
    buf.extend_from_slice(value);
    pad4(&mut buf);
    for child in children {
        buf.extend_from_slice(child);
        pad4(&mut buf);
    }
    let length = buf.len() as u16;
    buf[0..2].copy_from_slice(&length.to_le_bytes());
    buf[2..4].copy_from_slice(&value_length.to_le_bytes());
    buf[4..6].copy_from_slice(&value_type.to_le_bytes());
    buf
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// PE32 image with a single `.rsrc` section holding one `RT_VERSION` entry.
fn build_pe(version_info: &[u8]) -> Vec<u8> {
    let mut rsrc = vec![0u8; VERSION_INFO_OFFSET];
    // type directory -> RT_VERSION
    put_u16(&mut rsrc, 0x0e, 1);
    put_u32(&mut rsrc, 0x10, 16);
    put_u32(&mut rsrc, 0x14, 0x8000_0000 | 0x18);
    // name directory -> id 1
    put_u16(&mut rsrc, 0x18 + 0x0e, 1);
    put_u32(&mut rsrc, 0x28, 1);
    put_u32(&mut rsrc, 0x2c, 0x8000_0000 | 0x30);
    // language directory -> en-US data entry
    put_u16(&mut rsrc, 0x30 + 0x0e, 1);
    put_u32(&mut rsrc, 0x40, 0x409);
    put_u32(&mut rsrc, 0x44, 0x48);
    // data entry
    put_u32(&mut rsrc, 0x48, SECTION_RVA + VERSION_INFO_OFFSET as u32);
    put_u32(&mut rsrc, 0x4c, version_info.len() as u32);
    rsrc.extend_from_slice(version_info);
    while rsrc.len() % 0x200 != 0 {
        rsrc.push(0);
    }

    let mut image = vec![0u8; SECTION_FILE_OFFSET];
    image[0] = b'M';
    image[1] = b'Z';
    put_u32(&mut image, 0x3c, 0x40);
    image[0x40..0x44].copy_from_slice(b"PE\0\0");

    let coff = 0x44;
    put_u16(&mut image, coff, 0x14c);
    put_u16(&mut image, coff + 2, 1);
    put_u16(&mut image, coff + 16, 224);
    put_u16(&mut image, coff + 18, 0x2102);

    let optional = coff + 20;
    let size_of_image = SECTION_RVA as usize + rsrc.len().div_ceil(0x1000) * 0x1000;
    put_u16(&mut image, optional, 0x10b);
    put_u32(&mut image, optional + 28, 0x1000_0000);
    put_u32(&mut image, optional + 32, 0x1000);
    put_u32(&mut image, optional + 36, 0x200);
    put_u16(&mut image, optional + 40, 6);
    put_u16(&mut image, optional + 48, 6);
    put_u32(&mut image, optional + 56, size_of_image as u32);
    put_u32(&mut image, optional + 60, SECTION_FILE_OFFSET as u32);
    put_u16(&mut image, optional + 68, 2);
    put_u32(&mut image, optional + 92, 16);
    put_u32(&mut image, optional + 96 + 2 * 8, SECTION_RVA);
    put_u32(&mut image, optional + 96 + 2 * 8 + 4, rsrc.len() as u32);

    let section = optional + 224;
    image[section..section + 5].copy_from_slice(b".rsrc");
    put_u32(&mut image, section + 8, rsrc.len() as u32);
    put_u32(&mut image, section + 12, SECTION_RVA);
    put_u32(&mut image, section + 16, rsrc.len() as u32);
    put_u32(&mut image, section + 20, SECTION_FILE_OFFSET as u32);
    put_u32(&mut image, section + 36, 0x4000_0040);

    image.extend_from_slice(&rsrc);
    image
}

/// Stored (uncompressed) zip with the given members, in order.
pub fn zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, bytes) in members {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn asset(id: u64, name: &str) -> GithubAsset {
    GithubAsset {
        id,
        name: name.to_string(),
        browser_download_url: format!("https://github.com/owner/repo/releases/download/{}/{}", id, name),
    }
}

pub fn github_release(tag: &str, prerelease: bool, assets: Vec<GithubAsset>) -> GithubRelease {
    GithubRelease {
        tag_name: tag.to_string(),
        prerelease,
        assets,
    }
}

/// Serves release listings per `owner/repo`, falling back to `fallback`.
/// The latest release is `latest` when set, otherwise the first listed one
/// that is not a pre-release.
#[derive(Default)]
pub struct FakeReleaseApi {
    pub repos: HashMap<String, Vec<GithubRelease>>,
    pub fallback: Vec<GithubRelease>,
    pub latest: Option<GithubRelease>,
}

impl FakeReleaseApi {
    pub fn new(releases: Vec<GithubRelease>) -> Self {
        FakeReleaseApi {
            repos: HashMap::new(),
            fallback: releases,
            latest: None,
        }
    }

    pub fn with_latest(mut self, latest: GithubRelease) -> Self {
        self.latest = Some(latest);
        self
    }

    pub fn with_repo(mut self, owner_repo: &str, releases: Vec<GithubRelease>) -> Self {
        self.repos.insert(owner_repo.to_string(), releases);
        self
    }

    fn listing(&self, owner: &str, repo: &str) -> &[GithubRelease] {
        self.repos
            .get(&format!("{}/{}", owner, repo))
            .unwrap_or(&self.fallback)
    }
}

#[async_trait]
impl ReleaseApi for FakeReleaseApi {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<GithubRelease>> {
        Ok(self.listing(owner, repo).to_vec())
    }

    async fn latest_release(&self, owner: &str, repo: &str) -> Result<GithubRelease> {
        if let Some(latest) = &self.latest {
            return Ok(latest.clone());
        }
        self.listing(owner, repo)
            .iter()
            .find(|release| !release.prerelease)
            .cloned()
            .ok_or_else(|| Error::Download {
                url: format!("repos/{}/{}/releases/latest", owner, repo),
                status: 404,
            })
    }
}

/// Serves canned bytes and text, and records every download.
#[derive(Default)]
pub struct FakeFetcher {
    pub files: HashMap<String, Vec<u8>>,
    pub texts: HashMap<String, (u16, String)>,
    downloads: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn with_file(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), bytes);
        self
    }

    pub fn with_text(mut self, url: &str, status: u16, body: &str) -> Self {
        self.texts.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.lock().unwrap().push(url.to_string());
        self.files.get(url).cloned().ok_or_else(|| Error::Download {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<TextResponse> {
        let (status, body) = self
            .texts
            .get(url)
            .cloned()
            .unwrap_or((404, String::new()));
        Ok(TextResponse { status, body })
    }
}

/// Passes DLLs whose file name is in `passing`; records every probed name.
#[derive(Default)]
pub struct FakeProbe {
    pub passing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn passing(names: &[&str]) -> Self {
        FakeProbe {
            passing: names.iter().map(|n| n.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportProbe for FakeProbe {
    async fn has_required_exports(&self, path: &Path) -> Result<bool> {
        assert!(path.exists(), "probed file must be staged on disk");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(name.clone());
        Ok(self.passing.contains(&name))
    }
}

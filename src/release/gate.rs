use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Exports of which at least one must be present for a DLL to be loadable as
/// an addon (arcdps and GW2Load entry points).
pub const REQUIRED_EXPORTS: [&str; 2] = ["get_init_addr", "GW2Load_GetAddonAPIVersion"];

/// Tells genuine addon DLLs apart from helper libraries shipped next to them.
#[async_trait]
pub trait ExportProbe: Send + Sync {
    async fn has_required_exports(&self, path: &Path) -> Result<bool>;
}

/// Probe backed by `winedump -j export <file>`.
#[derive(Debug, Clone)]
pub struct WinedumpProbe {
    tool: PathBuf,
}

impl WinedumpProbe {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        WinedumpProbe { tool: tool.into() }
    }

    /// Uses `configured` when given, then `winedump` on `PATH`, then
    /// `./winedump`.
    pub fn locate(configured: Option<&Path>) -> Self {
        let tool = match configured {
            Some(path) => path.to_path_buf(),
            None => which::which("winedump").unwrap_or_else(|_| PathBuf::from("./winedump")),
        };
        WinedumpProbe::new(tool)
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }
}

#[async_trait]
impl ExportProbe for WinedumpProbe {
    async fn has_required_exports(&self, path: &Path) -> Result<bool> {
        let output = Command::new(&self.tool)
            .arg("-j")
            .arg("export")
            .arg(path)
            .output()
            .await
            .map_err(|source| Error::Probe {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Ok(false);
        }
        Ok(dump_has_required_exports(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// Scans an export dump for any of [`REQUIRED_EXPORTS`].
pub fn dump_has_required_exports(dump: &str) -> bool {
    dump.lines()
        .any(|line| REQUIRED_EXPORTS.iter().any(|symbol| line.contains(symbol)))
}

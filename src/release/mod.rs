pub mod archive;
pub mod extract;
pub mod gate;
pub mod pe;
pub mod select;
pub mod version;

pub use extract::create_release_from_dll;
pub use gate::{ExportProbe, WinedumpProbe};
pub use select::{ArtifactKind, create_release, create_release_from_archive};
pub use version::is_greater;

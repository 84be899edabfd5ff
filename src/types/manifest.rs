use crate::types::addon::Addon;
use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestData {
    pub addons: Vec<Addon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub data: ManifestData,
}

impl Manifest {
    pub fn new(addons: Vec<Addon>) -> Self {
        Manifest {
            version: MANIFEST_VERSION,
            data: ManifestData { addons },
        }
    }

    pub fn addons(&self) -> &[Addon] {
        &self.data.addons
    }

    pub fn into_addons(self) -> Vec<Addon> {
        self.data.addons
    }
}

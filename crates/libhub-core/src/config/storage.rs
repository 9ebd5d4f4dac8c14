//! Digital resource storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded resource files are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local blob store.
    #[serde(default = "default_root")]
    pub resources_root: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            resources_root: default_root(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_root() -> String {
    "./data/resources".to_string()
}

fn default_max_upload() -> usize {
    50 * 1024 * 1024
}

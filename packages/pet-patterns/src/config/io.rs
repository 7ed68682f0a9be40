//! YAML schema types

use serde::{Deserialize, Serialize};

use super::patch::DetectionConfigPatch;

/// YAML Schema v1
///
/// `version` is optional at the serde level so a missing field is reported
/// as [`ConfigError::MissingVersion`](super::ConfigError::MissingVersion).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Field-level overrides on top of the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionConfigPatch>,
}

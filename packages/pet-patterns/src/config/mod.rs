//! Detection configuration
//!
//! Two ways to configure a run:
//! - Preset: `DetectionConfig::from_preset(Preset::Fast)`
//! - YAML: `DetectionConfig::from_yaml_file("detect.yaml")` (schema v1,
//!   a preset plus a `detection:` patch)
//!
//! # Examples
//!
//! ```rust,ignore
//! use pet_patterns::config::{DetectionConfig, Preset};
//!
//! let config = DetectionConfig::from_preset(Preset::Balanced)
//!     .workload_threshold(5_000)
//!     .min_parallelism(4);
//! ```

pub mod detection_config;
pub mod error;
pub mod io;
pub mod patch;
pub mod preset;
pub mod validation;

pub use detection_config::{DetectionConfig, SUPPORTED_VERSIONS};
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigFileV1;
pub use patch::DetectionConfigPatch;
pub use preset::Preset;
pub use validation::Validatable;

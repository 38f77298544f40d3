//! Build profile selection
//!
//! A profile is selected per invocation (dev unless `--release`); the
//! manifest carries the settings for both. Directory naming and flag
//! derivation both go through this selector so they cannot drift apart.

use serde::Serialize;

/// Build profile selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Development profile (default)
    #[default]
    Dev,
    /// Release profile (optimized)
    Release,
}

impl Profile {
    /// Select from a `--release` style flag
    pub fn from_release_flag(release: bool) -> Self {
        if release {
            Self::Release
        } else {
            Self::Dev
        }
    }

    /// Conventional build-directory label. The dev profile builds into
    /// `build/debug`, mirroring Cargo's target-directory naming.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Dev => "debug",
            Self::Release => "release",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

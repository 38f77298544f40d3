//! Build orchestration for clank C++ projects
//!
//! Provides the pieces the `clank` CLI assembles into builds:
//! - Manifest model and loader (clank.toml)
//! - Profile resolution (dev/release)
//! - Artifact naming per platform and artifact kind
//! - Toolchain command synthesis (compiler, archiver, resource compiler)
//! - Build orchestration over blocking external processes
//!
//! The external toolchain is consumed, never reimplemented: clank produces
//! GCC-style invocations and trusts their exit status.

pub mod artifact;
pub mod builder;
pub mod command;
pub mod error;
pub mod manifest;
pub mod profile;
pub mod toolchain;

// Re-export main types
pub use artifact::{object_file_name, output_file_name};
pub use builder::{BuildOutcome, Builder, SRC_DIR};
pub use command::{CommandLine, CommandSynthesizer, BUILD_DIR, RESOURCE_OBJECT, RESOURCE_SCRIPT};
pub use error::{BuildError, BuildResult, BuildWarning, ManifestError};
pub use manifest::{
    ArtifactKind, LoadedManifest, LtoMode, Manifest, Platform, ProfileSettings, MANIFEST_FILE,
};
pub use profile::Profile;
pub use toolchain::{ProcessRunner, SystemRunner, Toolchain};

/// Build system error types
use crate::manifest::{ArtifactKind, Platform};
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no clank.toml and no src/ directory at {path} - not a clank project")]
    ManifestRequired { path: PathBuf },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("no .cpp files found in {dir}")]
    NoSourceFiles { dir: PathBuf },

    #[error("compilation failed for {file}")]
    CompileFailed { file: String },

    #[error("compiling and linking {artifact} failed")]
    LinkFailed { artifact: String },

    #[error("archiving {artifact} failed")]
    ArchiveFailed { artifact: String },

    #[error("failed to launch '{program}': {source}")]
    ToolchainSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ManifestResult<T> = Result<T, ManifestError>;

/// Manifest parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("invalid value for '{key}': {value:?}")]
    Malformed { key: String, value: String },
}

impl ManifestError {
    pub fn malformed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Malformed {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Non-fatal diagnostics produced during a build.
///
/// Returned as values rather than printed; the CLI renders these on
/// stderr. Warnings do not affect the build's exit status.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildWarning {
    /// Manifest file absent, defaults substituted
    ManifestMissing,
    /// Declared target platform differs from the host
    PlatformMismatch {
        declared: Platform,
        host: Platform,
        kind: ArtifactKind,
    },
    /// Icon resource compilation failed, build continues without it
    ResourceCompilation(String),
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManifestMissing => {
                write!(f, "could not open clank.toml, using defaults")
            }
            Self::PlatformMismatch {
                declared,
                host,
                kind: ArtifactKind::Lib,
            } => write!(
                f,
                "building static library with platform set to {declared} on a {host} host; \
                 static libraries may be platform-specific depending on code"
            ),
            Self::PlatformMismatch {
                declared,
                host,
                kind,
            } => write!(
                f,
                "cross-compilation is not available for {kind} artifacts: the result will \
                 only run on {host}, not {declared}; to build for {declared}, use a \
                 {declared} system"
            ),
            Self::ResourceCompilation(detail) => {
                write!(f, "icon resource compilation failed: {detail}")
            }
        }
    }
}

//! Artifact naming conventions
//!
//! Maps (artifact kind, platform) to the canonical output file name. Pure
//! and total over the closed enums; the legacy tool's `.exe` fallback for
//! unknown combinations is unreachable here by construction.

use crate::manifest::{ArtifactKind, Platform};

/// Canonical output file name for a project artifact.
///
/// | kind  | win        | linux        | mac             |
/// |-------|------------|--------------|-----------------|
/// | bin   | `name.exe` | `name`       | `name`          |
/// | lib   | `name.lib` | `libname.a`  | `libname.a`     |
/// | dylib | `name.dll` | `libname.so` | `libname.dylib` |
pub fn output_file_name(name: &str, kind: ArtifactKind, platform: Platform) -> String {
    match (kind, platform) {
        (ArtifactKind::Bin, Platform::Win) => format!("{name}.exe"),
        (ArtifactKind::Bin, _) => name.to_string(),
        (ArtifactKind::Lib, Platform::Win) => format!("{name}.lib"),
        (ArtifactKind::Lib, _) => format!("lib{name}.a"),
        (ArtifactKind::Dylib, Platform::Win) => format!("{name}.dll"),
        (ArtifactKind::Dylib, Platform::Linux) => format!("lib{name}.so"),
        (ArtifactKind::Dylib, Platform::Mac) => format!("lib{name}.dylib"),
    }
}

/// Object file name for a single compiled source (`foo.cpp` -> `foo.o`)
pub fn object_file_name(source_file_name: &str) -> String {
    match source_file_name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.o"),
        None => format!("{source_file_name}.o"),
    }
}

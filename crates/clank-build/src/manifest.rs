//! Project manifest (clank.toml)
//!
//! Handles package metadata and per-profile compiler settings for clank
//! projects. The manifest format is a line-oriented subset of TOML parsed
//! by hand: sections, `key = value` pairs, `#` comments, and one level of
//! double quoting. Keeping the parser in-tree pins the format's legacy
//! quirks (see [`Manifest::parse`]) instead of inheriting whatever a full
//! TOML implementation would do with them.

use crate::error::{ManifestError, ManifestResult};
use crate::profile::Profile;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Conventional manifest file name at the project root
pub const MANIFEST_FILE: &str = "clank.toml";

/// Target platform declared by the project, independent of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Win,
    Linux,
    Mac,
}

impl Platform {
    fn parse(value: &str) -> Result<Self, ManifestError> {
        match value {
            "win" => Ok(Self::Win),
            "linux" => Ok(Self::Linux),
            "mac" => Ok(Self::Mac),
            other => Err(ManifestError::malformed("platform", other)),
        }
    }

    /// Detect the platform the tool is running on
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Win
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Linux
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Linux => write!(f, "linux"),
            Self::Mac => write!(f, "mac"),
        }
    }
}

/// Category of build output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Executable binary
    Bin,
    /// Static library, archived from per-source object files
    Lib,
    /// Shared library (.dll / .so / .dylib depending on platform)
    Dylib,
}

impl ArtifactKind {
    fn parse(value: &str) -> Result<Self, ManifestError> {
        match value {
            "bin" => Ok(Self::Bin),
            "lib" => Ok(Self::Lib),
            // "dll" and "so" are legacy aliases the original tool accepted
            "dylib" | "dll" | "so" => Ok(Self::Dylib),
            other => Err(ManifestError::malformed("type", other)),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bin => write!(f, "bin"),
            Self::Lib => write!(f, "lib"),
            Self::Dylib => write!(f, "dylib"),
        }
    }
}

/// Link-time optimization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LtoMode {
    Off,
    Fat,
}

impl LtoMode {
    fn parse(value: &str) -> Result<Self, ManifestError> {
        match value {
            "off" => Ok(Self::Off),
            "fat" => Ok(Self::Fat),
            other => Err(ManifestError::malformed("lto", other)),
        }
    }
}

/// Compiler settings for one build profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSettings {
    /// Optimization level, 0 through 3
    pub opt_level: u8,
    /// Emit debug information
    pub debug: bool,
    /// Advisory codegen parallelism hint, passed through unenforced
    pub codegen_units: u32,
    /// Link-time optimization mode
    pub lto: LtoMode,
}

/// Parsed project manifest. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub platform: Platform,
    pub kind: ArtifactKind,
    /// Icon resource path, meaningful only for win binaries
    pub icon: PathBuf,
    pub dev: ProfileSettings,
    pub release: ProfileSettings,
}

/// Result of loading a manifest from disk
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    /// True when the file could not be opened and defaults were substituted
    pub used_defaults: bool,
}

impl Manifest {
    /// Default manifest for a project of the given name.
    ///
    /// Default policy lives here, separate from parsing: the loader composes
    /// this only when the manifest file is absent.
    pub fn default_for(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".to_string(),
            platform: Platform::Win,
            kind: ArtifactKind::Bin,
            icon: PathBuf::from("icon.ico"),
            dev: ProfileSettings {
                opt_level: 0,
                debug: true,
                codegen_units: 4,
                lto: LtoMode::Off,
            },
            release: ProfileSettings {
                opt_level: 3,
                debug: false,
                codegen_units: 1,
                lto: LtoMode::Fat,
            },
        }
    }

    /// Settings for the selected profile
    pub fn profile(&self, profile: Profile) -> &ProfileSettings {
        match profile {
            Profile::Dev => &self.dev,
            Profile::Release => &self.release,
        }
    }

    /// Load the manifest at `path`, substituting defaults if the file
    /// cannot be opened. `fallback_name` seeds the default manifest's
    /// package name (conventionally the project directory name).
    pub fn load(path: &Path, fallback_name: &str) -> ManifestResult<LoadedManifest> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(LoadedManifest {
                manifest: Self::parse(&text, fallback_name)?,
                used_defaults: false,
            }),
            Err(_) => Ok(LoadedManifest {
                manifest: Self::default_for(fallback_name),
                used_defaults: true,
            }),
        }
    }

    /// Parse manifest text. Starts from [`Manifest::default_for`] and
    /// overlays whatever the file specifies.
    ///
    /// Comment stripping is purely lexical: everything from the first `#`
    /// on a line is discarded, even inside a quoted value. That is a known
    /// quirk of the original format, preserved deliberately.
    pub fn parse(text: &str, fallback_name: &str) -> ManifestResult<Self> {
        let mut manifest = Self::default_for(fallback_name);
        let mut section = Section::Preamble;

        for raw_line in text.lines() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(name) = section_header(line) {
                section = Section::recognize(name);
                continue;
            }

            let Some((key, value)) = split_assignment(line) else {
                continue;
            };

            match section {
                Section::Package => apply_package_key(&mut manifest, key, value)?,
                Section::ProfileDev => apply_profile_key(&mut manifest.dev, key, value)?,
                Section::ProfileRelease => apply_profile_key(&mut manifest.release, key, value)?,
                // Keys outside a recognized section are accepted and ignored
                Section::Preamble | Section::Other => {}
            }
        }

        Ok(manifest)
    }
}

/// Current section context while parsing.
///
/// A closed enumeration rather than a tracked string: recognition happens
/// once per header, and the match in [`Manifest::parse`] is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before any section header
    Preamble,
    Package,
    ProfileDev,
    ProfileRelease,
    /// Recognized syntax, unrecognized name; keys are ignored
    Other,
}

impl Section {
    fn recognize(name: &str) -> Self {
        match name {
            "package" => Self::Package,
            "profile.dev" => Self::ProfileDev,
            "profile.release" => Self::ProfileRelease,
            _ => Self::Other,
        }
    }
}

fn apply_package_key(
    manifest: &mut Manifest,
    key: &str,
    value: &str,
) -> Result<(), ManifestError> {
    match key {
        "name" => manifest.name = value.to_string(),
        "version" => manifest.version = value.to_string(),
        "platform" => manifest.platform = Platform::parse(value)?,
        "type" => manifest.kind = ArtifactKind::parse(value)?,
        "icon" => manifest.icon = PathBuf::from(value),
        // Unknown keys within a recognized section are ignored
        _ => {}
    }
    Ok(())
}

fn apply_profile_key(
    settings: &mut ProfileSettings,
    key: &str,
    value: &str,
) -> Result<(), ManifestError> {
    match key {
        "opt-level" => {
            settings.opt_level = value
                .parse::<u8>()
                .ok()
                .filter(|level| *level <= 3)
                .ok_or_else(|| ManifestError::malformed("opt-level", value))?;
        }
        "debug" => settings.debug = value == "true",
        "codegen-units" => {
            settings.codegen_units = value
                .parse::<u32>()
                .ok()
                .filter(|units| *units >= 1)
                .ok_or_else(|| ManifestError::malformed("codegen-units", value))?;
        }
        "lto" => settings.lto = LtoMode::parse(value)?,
        _ => {}
    }
    Ok(())
}

/// Discard everything from the first `#` onward
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Recognize a `[section]` header line and return the section name
fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Split a `key = value` line, trimming both sides and unquoting the value
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), unquote(value.trim())))
}

/// Strip one enclosing pair of double quotes. No escape processing.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_manifest_profiles() {
        let manifest = Manifest::default_for("app");
        assert_eq!(manifest.name, "app");
        assert_eq!(manifest.version, "0.1.0");
        assert_eq!(manifest.platform, Platform::Win);
        assert_eq!(manifest.kind, ArtifactKind::Bin);

        assert_eq!(manifest.dev.opt_level, 0);
        assert!(manifest.dev.debug);
        assert_eq!(manifest.dev.codegen_units, 4);
        assert_eq!(manifest.dev.lto, LtoMode::Off);

        assert_eq!(manifest.release.opt_level, 3);
        assert!(!manifest.release.debug);
        assert_eq!(manifest.release.codegen_units, 1);
        assert_eq!(manifest.release.lto, LtoMode::Fat);
    }

    #[test]
    fn test_parse_full_manifest() {
        let text = r#"
[package]
name = "myproj"
version = "1.2.0"
platform = "linux"
type = "dylib"
icon = "assets/app.ico"

[profile.dev]
opt-level = 1
debug = true
codegen-units = 8
lto = "off"

[profile.release]
opt-level = 2
debug = false
lto = "fat"
codegen-units = 1
"#;

        let manifest = Manifest::parse(text, "fallback").unwrap();
        assert_eq!(manifest.name, "myproj");
        assert_eq!(manifest.version, "1.2.0");
        assert_eq!(manifest.platform, Platform::Linux);
        assert_eq!(manifest.kind, ArtifactKind::Dylib);
        assert_eq!(manifest.icon, PathBuf::from("assets/app.ico"));
        assert_eq!(manifest.dev.opt_level, 1);
        assert_eq!(manifest.dev.codegen_units, 8);
        assert_eq!(manifest.release.opt_level, 2);
        assert_eq!(manifest.release.lto, LtoMode::Fat);
    }

    #[test]
    fn test_parse_partial_manifest_keeps_defaults() {
        let text = "[package]\nname = \"tiny\"\n";
        let manifest = Manifest::parse(text, "fallback").unwrap();
        assert_eq!(manifest.name, "tiny");
        assert_eq!(manifest.dev.codegen_units, 4);
        assert_eq!(manifest.release.opt_level, 3);
    }

    #[test]
    fn test_parse_dylib_aliases() {
        for alias in ["dylib", "dll", "so"] {
            let text = format!("[package]\ntype = \"{alias}\"\n");
            let manifest = Manifest::parse(&text, "p").unwrap();
            assert_eq!(manifest.kind, ArtifactKind::Dylib);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_platform() {
        let text = "[package]\nplatform = \"beos\"\n";
        let err = Manifest::parse(text, "p").unwrap_err();
        assert_eq!(err, ManifestError::malformed("platform", "beos"));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let text = "[package]\ntype = \"plugin\"\n";
        assert!(Manifest::parse(text, "p").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_opt_level() {
        let text = "[profile.dev]\nopt-level = \"x\"\n";
        let err = Manifest::parse(text, "p").unwrap_err();
        assert_eq!(err, ManifestError::malformed("opt-level", "x"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_opt_level() {
        let text = "[profile.release]\nopt-level = 4\n";
        assert!(Manifest::parse(text, "p").is_err());
    }

    #[test]
    fn test_parse_rejects_zero_codegen_units() {
        let text = "[profile.dev]\ncodegen-units = 0\n";
        assert!(Manifest::parse(text, "p").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_lto_mode() {
        let text = "[profile.release]\nlto = \"thin\"\n";
        let err = Manifest::parse(text, "p").unwrap_err();
        assert_eq!(err, ManifestError::malformed("lto", "thin"));
    }

    #[test]
    fn test_debug_is_true_only_for_literal_true() {
        let text = "[profile.dev]\ndebug = yes\n";
        let manifest = Manifest::parse(text, "p").unwrap();
        assert!(!manifest.dev.debug);

        let text = "[profile.release]\ndebug = true\n";
        let manifest = Manifest::parse(text, "p").unwrap();
        assert!(manifest.release.debug);
    }

    #[test]
    fn test_unknown_sections_and_keys_ignored() {
        let text = r#"
[package]
name = "app"
mystery = "ignored"

[features]
fast = true

[profile.dev]
opt-level = 2
"#;
        let manifest = Manifest::parse(text, "p").unwrap();
        assert_eq!(manifest.name, "app");
        assert_eq!(manifest.dev.opt_level, 2);
    }

    #[test]
    fn test_keys_before_any_section_ignored() {
        let text = "name = \"loose\"\n[package]\nname = \"app\"\n";
        let manifest = Manifest::parse(text, "p").unwrap();
        assert_eq!(manifest.name, "app");
    }

    #[test]
    fn test_comments_and_whitespace() {
        let text = "  [package]  # trailing comment\n# full-line comment\n  name = \"app\"  \n";
        let manifest = Manifest::parse(text, "p").unwrap();
        assert_eq!(manifest.name, "app");
    }

    // Comment stripping is lexical: a '#' inside a quoted value still
    // starts a comment. Pins the legacy behavior.
    #[test]
    fn test_hash_inside_quoted_value_starts_comment() {
        let text = "[package]\nname = \"app#1\"\n";
        let manifest = Manifest::parse(text, "p").unwrap();
        // The value that survives is `"app` with an unmatched quote, so the
        // quotes are not stripped either.
        assert_eq!(manifest.name, "\"app");
    }

    #[test]
    fn test_unquote_only_strips_one_enclosing_pair() {
        assert_eq!(unquote("\"app\""), "app");
        assert_eq!(unquote("app"), "app");
        assert_eq!(unquote("\"\"app\"\""), "\"app\"");
        assert_eq!(unquote("\"open"), "\"open");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Manifest::load(&dir.path().join(MANIFEST_FILE), "proj").unwrap();
        assert!(loaded.used_defaults);
        assert_eq!(loaded.manifest, Manifest::default_for("proj"));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "[package]\nname = \"real\"\n").unwrap();

        let loaded = Manifest::load(&path, "fallback").unwrap();
        assert!(!loaded.used_defaults);
        assert_eq!(loaded.manifest.name, "real");
    }

    #[test]
    fn test_load_malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "[profile.dev]\nopt-level = \"x\"\n").unwrap();
        assert!(Manifest::load(&path, "p").is_err());
    }
}

//! Toolchain command synthesis
//!
//! Turns a resolved profile, artifact kind, platform, and source list into
//! the exact command line(s) the external toolchain needs. Synthesis is
//! deterministic and never touches the filesystem; the orchestrator decides
//! what actually exists and what to run.
//!
//! Arguments are emitted in a fixed order (optimization, debug, lto, mode
//! flags, inputs, resource object, output, platform link flags). The
//! toolchain itself does not care, but stable ordering keeps command lines
//! reproducible and testable.

use crate::artifact::output_file_name;
use crate::manifest::{ArtifactKind, Manifest, Platform};
use crate::profile::Profile;
use crate::toolchain::Toolchain;
use std::path::{Path, PathBuf};

/// Transient resource-compilation script written next to the manifest
pub const RESOURCE_SCRIPT: &str = "resource.rc";
/// Compiled resource object linked into Windows binaries
pub const RESOURCE_OBJECT: &str = "resource.o";

/// Root of the build output tree, relative to the project root
pub const BUILD_DIR: &str = "build";

/// A synthesized external command: program plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Synthesizes toolchain invocations for one (manifest, profile) pair
#[derive(Debug)]
pub struct CommandSynthesizer<'a> {
    toolchain: &'a Toolchain,
    manifest: &'a Manifest,
    profile: Profile,
}

impl<'a> CommandSynthesizer<'a> {
    pub fn new(toolchain: &'a Toolchain, manifest: &'a Manifest, profile: Profile) -> Self {
        Self {
            toolchain,
            manifest,
            profile,
        }
    }

    /// Output directory for this profile, relative to the project root
    pub fn build_dir(&self) -> PathBuf {
        Path::new(BUILD_DIR).join(self.profile.dir_name())
    }

    /// Final artifact path, relative to the project root
    pub fn artifact_path(&self) -> PathBuf {
        self.build_dir().join(output_file_name(
            &self.manifest.name,
            self.manifest.kind,
            self.manifest.platform,
        ))
    }

    /// Single-shot compile-and-link command for bin and dylib artifacts.
    ///
    /// `with_resource` appends the compiled icon object; only meaningful
    /// for Windows binaries and ignored otherwise.
    pub fn link_command(&self, sources: &[String], with_resource: bool) -> CommandLine {
        let manifest = self.manifest;
        let mut args = self.profile_flags();

        match manifest.kind {
            ArtifactKind::Bin => {}
            ArtifactKind::Lib => args.push("-c".to_string()),
            ArtifactKind::Dylib => {
                args.push("-shared".to_string());
                // Windows shared libraries need neither PIC nor -shared's
                // usual companion flags
                if manifest.platform != Platform::Win {
                    args.push("-fPIC".to_string());
                }
            }
        }

        for source in sources {
            args.push(format!("src/{source}"));
        }

        if with_resource && manifest.platform == Platform::Win && manifest.kind == ArtifactKind::Bin
        {
            args.push(RESOURCE_OBJECT.to_string());
        }

        args.push("-o".to_string());
        args.push(path_arg(&self.artifact_path()));

        if manifest.platform == Platform::Win && manifest.kind == ArtifactKind::Bin {
            args.extend(self.toolchain.win_bin_link_flags.iter().cloned());
        }

        CommandLine::new(&self.toolchain.compiler, args)
    }

    /// Compile-only command producing a single object file (static-library
    /// mode; one invocation per source, archived afterward)
    pub fn object_command(&self, source: &str, object_name: &str) -> CommandLine {
        let mut args = self.profile_flags();
        args.push("-c".to_string());
        args.push(format!("src/{source}"));
        args.push("-o".to_string());
        args.push(path_arg(&self.build_dir().join(object_name)));
        CommandLine::new(&self.toolchain.compiler, args)
    }

    /// Archive the given objects into the static-library artifact
    pub fn archive_command(&self, objects: &[PathBuf]) -> CommandLine {
        let mut args = vec!["rcs".to_string(), path_arg(&self.artifact_path())];
        args.extend(objects.iter().map(|obj| path_arg(obj)));
        CommandLine::new(&self.toolchain.archiver, args)
    }

    /// Compile the icon resource script into [`RESOURCE_OBJECT`]
    pub fn resource_command(&self) -> CommandLine {
        CommandLine::new(
            &self.toolchain.resource_compiler,
            vec![
                RESOURCE_SCRIPT.to_string(),
                "-O".to_string(),
                "coff".to_string(),
                "-o".to_string(),
                RESOURCE_OBJECT.to_string(),
            ],
        )
    }

    /// Flags derived from the resolved profile, in fixed order
    fn profile_flags(&self) -> Vec<String> {
        let settings = self.manifest.profile(self.profile);
        let mut args = vec![format!("-O{}", settings.opt_level)];
        if settings.debug {
            args.push("-g".to_string());
        }
        if settings.lto == crate::manifest::LtoMode::Fat {
            args.push("-flto".to_string());
        }
        args
    }
}

/// Render a path argument with forward slashes for command-line stability
fn path_arg(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

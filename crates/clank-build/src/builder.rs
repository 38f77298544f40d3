//! Build orchestration
//!
//! Drives a build from manifest load through source discovery, optional
//! resource compilation, compilation, and (for static libraries) archiving.
//! Fully synchronous: every toolchain invocation blocks to completion
//! before the next is issued, which keeps failure attribution
//! deterministic. External processes go through [`ProcessRunner`] so tests
//! can script outcomes.

use crate::artifact::object_file_name;
use crate::command::{CommandSynthesizer, RESOURCE_OBJECT, RESOURCE_SCRIPT};
use crate::error::{BuildError, BuildResult, BuildWarning};
use crate::manifest::{ArtifactKind, LoadedManifest, Manifest, Platform, MANIFEST_FILE};
use crate::profile::Profile;
use crate::toolchain::{ProcessRunner, SystemRunner, Toolchain};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Project source directory, relative to the root
pub const SRC_DIR: &str = "src";

/// Result of a successful build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Absolute path of the produced artifact
    pub artifact: PathBuf,
    /// Non-fatal diagnostics collected along the way
    pub warnings: Vec<BuildWarning>,
}

/// Orchestrates builds for the project at a given root directory
pub struct Builder<R = SystemRunner> {
    root: PathBuf,
    manifest: Manifest,
    used_defaults: bool,
    toolchain: Toolchain,
    runner: R,
    verbose: bool,
}

impl Builder<SystemRunner> {
    /// Create a builder for the project at `root`.
    ///
    /// A missing manifest alone is tolerated (defaults are substituted and
    /// a warning surfaces from [`Builder::build`]), but a directory with
    /// neither a manifest nor a `src/` tree is not a project at all.
    pub fn new(root: impl AsRef<Path>) -> BuildResult<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE);

        if !manifest_path.exists() && !root.join(SRC_DIR).is_dir() {
            return Err(BuildError::ManifestRequired { path: root });
        }

        let fallback_name = root
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unnamed_project");
        let LoadedManifest {
            manifest,
            used_defaults,
        } = Manifest::load(&manifest_path, fallback_name)?;

        Ok(Self {
            root,
            manifest,
            used_defaults,
            toolchain: Toolchain::default(),
            runner: SystemRunner,
            verbose: false,
        })
    }
}

impl<R: ProcessRunner> Builder<R> {
    /// Substitute the process runner (scripted runners in tests)
    pub fn with_runner<R2: ProcessRunner>(self, runner: R2) -> Builder<R2> {
        Builder {
            root: self.root,
            manifest: self.manifest,
            used_defaults: self.used_defaults,
            toolchain: self.toolchain,
            runner,
            verbose: self.verbose,
        }
    }

    /// Override the external toolchain programs
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Print each synthesized command before running it
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path the artifact for `profile` would be written to
    pub fn artifact_path(&self, profile: Profile) -> PathBuf {
        let synth = CommandSynthesizer::new(&self.toolchain, &self.manifest, profile);
        self.root.join(synth.artifact_path())
    }

    /// Execute a full build for the selected profile.
    ///
    /// Transient resource-compilation files are cleaned up regardless of
    /// the outcome.
    pub fn build(&mut self, profile: Profile) -> BuildResult<BuildOutcome> {
        let root = &self.root;
        let manifest = &self.manifest;
        let runner = &mut self.runner;
        let verbose = self.verbose;
        let synth = CommandSynthesizer::new(&self.toolchain, manifest, profile);

        let mut warnings = Vec::new();
        if self.used_defaults {
            warnings.push(BuildWarning::ManifestMissing);
        }

        let sources = discover_sources(root)?;

        let host = Platform::host();
        if manifest.platform != host {
            warnings.push(BuildWarning::PlatformMismatch {
                declared: manifest.platform,
                host,
                kind: manifest.kind,
            });
        }

        let build_dir = root.join(synth.build_dir());
        fs::create_dir_all(&build_dir).map_err(|e| BuildError::io(&build_dir, e))?;

        let with_resource = compile_resource(root, runner, manifest, &synth, verbose, &mut warnings);

        let result = compile_artifact(root, runner, manifest, &synth, &sources, with_resource, verbose);
        cleanup_intermediates(root);
        let artifact = result?;

        Ok(BuildOutcome {
            artifact: root.join(artifact),
            warnings,
        })
    }
}

/// List compilable sources directly under `src/` (non-recursive), sorted by
/// name so failure attribution is deterministic
fn discover_sources(root: &Path) -> BuildResult<Vec<String>> {
    let src_dir = root.join(SRC_DIR);

    let mut sources: Vec<String> = WalkDir::new(&src_dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| Path::new(name).extension().is_some_and(|ext| ext == "cpp"))
        .collect();
    sources.sort();

    if sources.is_empty() {
        return Err(BuildError::NoSourceFiles { dir: src_dir });
    }
    Ok(sources)
}

/// Compile the icon resource for Windows binaries, if the icon exists.
///
/// Every failure here is a warning: the build continues without the
/// embedded icon. Returns whether a compiled resource object is available.
fn compile_resource<R: ProcessRunner>(
    root: &Path,
    runner: &mut R,
    manifest: &Manifest,
    synth: &CommandSynthesizer<'_>,
    verbose: bool,
    warnings: &mut Vec<BuildWarning>,
) -> bool {
    if manifest.platform != Platform::Win || manifest.kind != ArtifactKind::Bin {
        return false;
    }
    if !root.join(&manifest.icon).is_file() {
        return false;
    }

    let script = format!(
        "#include <windows.h>\nIDI_ICON1 ICON \"{}\"\n",
        manifest.icon.display()
    );
    if let Err(e) = fs::write(root.join(RESOURCE_SCRIPT), script) {
        warnings.push(BuildWarning::ResourceCompilation(e.to_string()));
        return false;
    }

    let command = synth.resource_command();
    if verbose {
        println!("   Running: {command}");
    }
    match runner.run(root, &command) {
        Ok(true) => true,
        Ok(false) => {
            warnings.push(BuildWarning::ResourceCompilation(
                "resource compiler exited with failure".to_string(),
            ));
            false
        }
        Err(e) => {
            warnings.push(BuildWarning::ResourceCompilation(format!(
                "failed to launch '{}': {e}",
                command.program
            )));
            false
        }
    }
}

/// Run the compile (and, for static libraries, archive) stage. Returns the
/// root-relative artifact path.
fn compile_artifact<R: ProcessRunner>(
    root: &Path,
    runner: &mut R,
    manifest: &Manifest,
    synth: &CommandSynthesizer<'_>,
    sources: &[String],
    with_resource: bool,
    verbose: bool,
) -> BuildResult<PathBuf> {
    let artifact = synth.artifact_path();
    let artifact_name = || {
        artifact
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    match manifest.kind {
        // Static library: each source compiles to its own object,
        // sequentially; the first failure aborts before any archive exists.
        ArtifactKind::Lib => {
            let mut objects = Vec::with_capacity(sources.len());
            for source in sources {
                let object = object_file_name(source);
                let command = synth.object_command(source, &object);
                if verbose {
                    println!("   Compiling {source}");
                    println!("   Running: {command}");
                }
                if !run_toolchain(runner, root, &command)? {
                    return Err(BuildError::CompileFailed {
                        file: source.clone(),
                    });
                }
                objects.push(synth.build_dir().join(object));
            }

            let command = synth.archive_command(&objects);
            if verbose {
                println!("   Running: {command}");
            }
            if !run_toolchain(runner, root, &command)? {
                return Err(BuildError::ArchiveFailed {
                    artifact: artifact_name(),
                });
            }
            Ok(artifact)
        }
        // Binary or shared library: one compile-and-link invocation
        ArtifactKind::Bin | ArtifactKind::Dylib => {
            let command = synth.link_command(sources, with_resource);
            if verbose {
                println!("   Running: {command}");
            }
            if !run_toolchain(runner, root, &command)? {
                return Err(BuildError::LinkFailed {
                    artifact: artifact_name(),
                });
            }
            Ok(artifact)
        }
    }
}

fn run_toolchain<R: ProcessRunner>(
    runner: &mut R,
    root: &Path,
    command: &crate::command::CommandLine,
) -> BuildResult<bool> {
    runner.run(root, command).map_err(|e| BuildError::ToolchainSpawn {
        program: command.program.clone(),
        source: e,
    })
}

/// Remove transient resource-compilation files. Idempotent; runs whether
/// the build succeeded or not.
fn cleanup_intermediates(root: &Path) {
    let _ = fs::remove_file(root.join(RESOURCE_SCRIPT));
    let _ = fs::remove_file(root.join(RESOURCE_OBJECT));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sources_sorted_and_non_recursive() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("zeta.cpp"), "").unwrap();
        fs::write(src.join("alpha.cpp"), "").unwrap();
        fs::write(src.join("notes.txt"), "").unwrap();
        fs::write(src.join("nested/inner.cpp"), "").unwrap();

        let sources = discover_sources(temp.path()).unwrap();
        assert_eq!(sources, ["alpha.cpp", "zeta.cpp"]);
    }

    #[test]
    fn test_discover_sources_empty_is_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        assert!(matches!(
            discover_sources(temp.path()),
            Err(BuildError::NoSourceFiles { .. })
        ));
    }

    #[test]
    fn test_builder_requires_manifest_or_src() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Builder::new(temp.path()),
            Err(BuildError::ManifestRequired { .. })
        ));
    }

    #[test]
    fn test_builder_tolerates_missing_manifest_with_src() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        let builder = Builder::new(temp.path()).unwrap();
        assert_eq!(builder.manifest().version, "0.1.0");
    }

    #[test]
    fn test_cleanup_intermediates_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join(RESOURCE_SCRIPT), "x").unwrap();
        cleanup_intermediates(temp.path());
        cleanup_intermediates(temp.path());
        assert!(!temp.path().join(RESOURCE_SCRIPT).exists());
    }
}

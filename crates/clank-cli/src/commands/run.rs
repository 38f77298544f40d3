//! Run command - build if needed, then execute the project binary

use anyhow::{bail, Context, Result};
use clank_build::{ArtifactKind, Builder, Platform, Profile};
use std::path::PathBuf;
use std::process::Command;

/// Run command arguments
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Build with the release profile
    pub release: bool,
    /// Print each toolchain command before running it
    pub verbose: bool,
    /// Project directory
    pub project_dir: PathBuf,
}

/// Run the project binary, building it first if the artifact is absent.
///
/// Rejected before any build attempt for non-binary artifact kinds and
/// when the declared platform differs from the host.
pub fn run(args: &RunArgs) -> Result<()> {
    let mut builder = Builder::new(&args.project_dir)
        .context("Failed to load project")?
        .with_verbose(args.verbose);

    let manifest = builder.manifest();
    if manifest.kind != ArtifactKind::Bin {
        bail!(
            "Cannot run non-binary project (type = {}); only type = \"bin\" can be executed",
            manifest.kind
        );
    }

    let host = Platform::host();
    if manifest.platform != host {
        bail!(
            "Cannot run: declared platform is {} but the host is {}; \
             change platform to \"{host}\" in clank.toml to run on this system",
            manifest.platform,
            host,
        );
    }

    let profile = Profile::from_release_flag(args.release);
    let artifact = builder.artifact_path(profile);

    if !artifact.exists() {
        println!("Executable not found, building first...");
        let outcome = builder.build(profile).context("Build failed")?;
        for warning in &outcome.warnings {
            eprintln!("warning: {warning}");
        }
    }

    println!("Running {}...\n", artifact.display());
    let status = Command::new(&artifact)
        .current_dir(&args.project_dir)
        .status()
        .with_context(|| format!("Failed to execute {}", artifact.display()))?;

    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}

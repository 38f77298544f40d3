//! Build command - drive the orchestrator and report the outcome

use anyhow::{Context, Result};
use clank_build::{BuildOutcome, Builder, Profile};
use std::path::PathBuf;

/// Build command arguments
#[derive(Debug, Clone)]
pub struct BuildArgs {
    /// Build with the release profile
    pub release: bool,
    /// Print each toolchain command before running it
    pub verbose: bool,
    /// Machine-readable summary instead of human output
    pub json: bool,
    /// Project directory
    pub project_dir: PathBuf,
}

/// Run the build command
pub fn run(args: &BuildArgs) -> Result<BuildOutcome> {
    let profile = Profile::from_release_flag(args.release);

    let mut builder = Builder::new(&args.project_dir)
        .context("Failed to load project")?
        .with_verbose(args.verbose);

    let manifest = builder.manifest().clone();
    if !args.json {
        println!(
            "Building {} ({} profile, {} for {})...",
            manifest.name, profile, manifest.kind, manifest.platform
        );
    }

    let outcome = builder.build(profile).context("Build failed")?;

    // Warnings go to the diagnostic stream and never affect exit status
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "profile": profile.dir_name(),
                "package": manifest.name,
                "kind": manifest.kind,
                "platform": manifest.platform,
                "artifact": outcome.artifact,
                "warnings": outcome.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            })
        );
    } else {
        println!("Build successful!");
        println!("Output: {}", outcome.artifact.display());
    }

    Ok(outcome)
}

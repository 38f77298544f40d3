use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Cargo-style build and project manager for C++.
///
/// clank reads a clank.toml manifest describing package metadata and
/// per-profile compiler settings, and drives an external GCC-style
/// toolchain to produce executables, static libraries, or shared libraries.
///
/// EXAMPLES:
///     clank new hello          Create a new project
///     clank build              Build using the dev profile
///     clank build --release    Build optimized
///     clank run                Build if needed, then execute
///     clank clean              Remove the build directory
#[derive(Parser)]
#[command(name = "clank")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project with the default structure
    ///
    /// Scaffolds a directory with a clank.toml manifest, a hello-world
    /// src/main.cpp, a default icon, and a .gitignore.
    New {
        /// Project name (also the directory to create)
        name: String,
    },

    /// Build the project in the current directory
    ///
    /// EXAMPLES:
    ///     clank build              Dev profile (build/debug)
    ///     clank build --release    Release profile (build/release)
    #[command(visible_alias = "b")]
    Build {
        /// Build with the release profile
        #[arg(long)]
        release: bool,
        /// Print each toolchain command before running it
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Machine-readable build summary
        #[arg(long)]
        json: bool,
    },

    /// Build if needed, then run the produced binary
    ///
    /// Only projects with type = "bin" whose declared platform matches the
    /// host can be run.
    #[command(visible_alias = "r")]
    Run {
        /// Build with the release profile
        #[arg(long)]
        release: bool,
        /// Print each toolchain command before running it
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Remove the build output directory
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = std::env::current_dir()?;

    match cli.command {
        Commands::New { name } => {
            commands::new::run(&commands::new::NewArgs {
                name,
                parent_dir: project_dir,
            })?;
        }
        Commands::Build {
            release,
            verbose,
            json,
        } => {
            commands::build::run(&commands::build::BuildArgs {
                release,
                verbose,
                json,
                project_dir,
            })?;
        }
        Commands::Run { release, verbose } => {
            commands::run::run(&commands::run::RunArgs {
                release,
                verbose,
                project_dir,
            })?;
        }
        Commands::Clean => {
            commands::clean::run(&project_dir)?;
        }
    }

    Ok(())
}

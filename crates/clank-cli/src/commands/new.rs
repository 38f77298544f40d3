//! Project scaffolding command (clank new)

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the new command
#[derive(Debug, Clone)]
pub struct NewArgs {
    /// Project name, also the directory to create
    pub name: String,
    /// Directory to create the project under
    pub parent_dir: PathBuf,
}

/// Minimal 1x1 32-bit icon shipped with new projects so a freshly
/// scaffolded Windows binary has something to embed.
const DEFAULT_ICON: [u8; 70] = [
    // ICONDIR: reserved, type 1 (icon), one image
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
    // ICONDIRENTRY: 1x1, 32bpp, 48 bytes of data at offset 22
    0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x20, 0x00, 0x30, 0x00, 0x00, 0x00, 0x16, 0x00, 0x00, 0x00,
    // BITMAPINFOHEADER: 1x1 (height doubled for the AND mask), 32bpp
    0x28, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x20, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // One BGRA pixel
    0x44, 0x88, 0xcc, 0xff,
    // AND mask row, padded to 32 bits
    0x00, 0x00, 0x00, 0x00,
];

/// Create a new project directory with the default structure
pub fn run(args: &NewArgs) -> Result<()> {
    validate_project_name(&args.name)?;

    let project_dir = args.parent_dir.join(&args.name);
    if project_dir.exists() {
        bail!("Directory '{}' already exists", args.name);
    }

    fs::create_dir_all(project_dir.join("src"))
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    write_file(
        &project_dir.join(clank_build::MANIFEST_FILE),
        &generate_manifest(&args.name),
    )?;
    write_file(&project_dir.join("src/main.cpp"), &generate_main(&args.name))?;
    write_file(&project_dir.join(".gitignore"), generate_gitignore())?;
    fs::write(project_dir.join("icon.ico"), DEFAULT_ICON)
        .context("Failed to write icon.ico")?;

    println!("Created project '{}'", args.name);
    println!("\nNext steps:");
    println!("  cd {}", args.name);
    println!("  clank build");

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn generate_manifest(name: &str) -> String {
    format!(
        r#"[package]
name = "{name}"
version = "0.1.0"
platform = "win"
type = "bin"
icon = "icon.ico"

[features]

[profile.dev]
opt-level = 0
debug = true
codegen-units = 4

[profile.release]
opt-level = 3
debug = false
lto = "fat"
codegen-units = 1
"#
    )
}

fn generate_main(name: &str) -> String {
    format!(
        r#"#include <iostream>

int main() {{
    std::cout << "Hello from {name}!" << std::endl;
    return 0;
}}
"#
    )
}

fn generate_gitignore() -> &'static str {
    "# clank build artifacts\n/build/\n"
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Project name cannot be empty");
    }

    if !name.chars().next().unwrap().is_ascii_alphanumeric() {
        bail!("Project name must start with a letter or number");
    }

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            bail!("Project name can only contain letters, numbers, hyphens, and underscores");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(temp: &TempDir, name: &str) -> NewArgs {
        NewArgs {
            name: name.to_string(),
            parent_dir: temp.path().to_path_buf(),
        }
    }

    #[test]
    fn test_new_creates_project_layout() {
        let temp = TempDir::new().unwrap();
        run(&args(&temp, "hello")).unwrap();

        let project = temp.path().join("hello");
        assert!(project.join("clank.toml").exists());
        assert!(project.join("src/main.cpp").exists());
        assert!(project.join("icon.ico").exists());
        assert!(project.join(".gitignore").exists());
    }

    #[test]
    fn test_scaffolded_manifest_parses_to_defaults() {
        let temp = TempDir::new().unwrap();
        run(&args(&temp, "hello")).unwrap();

        let text = fs::read_to_string(temp.path().join("hello/clank.toml")).unwrap();
        let manifest = clank_build::Manifest::parse(&text, "other").unwrap();
        assert_eq!(manifest, clank_build::Manifest::default_for("hello"));
    }

    #[test]
    fn test_new_rejects_existing_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("taken")).unwrap();
        assert!(run(&args(&temp, "taken")).is_err());
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-app").is_ok());
        assert!(validate_project_name("app_2").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-bad").is_err());
        assert!(validate_project_name("has space").is_err());
    }

    #[test]
    fn test_default_icon_is_a_valid_ico_header() {
        assert_eq!(&DEFAULT_ICON[..6], &[0, 0, 1, 0, 1, 0]);
        // image data offset points just past the directory entry
        assert_eq!(DEFAULT_ICON[18], 22);
        assert_eq!(DEFAULT_ICON.len(), 22 + 48);
    }
}

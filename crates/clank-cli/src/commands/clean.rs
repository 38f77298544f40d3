//! Clean command - remove the build output tree

use anyhow::{Context, Result};
use clank_build::BUILD_DIR;
use std::fs;
use std::path::Path;

/// Remove `build/` recursively. A missing build directory is a no-op, not
/// an error.
pub fn run(project_dir: &Path) -> Result<()> {
    let build_dir = project_dir.join(BUILD_DIR);

    if !build_dir.exists() {
        println!("Nothing to clean (build directory doesn't exist)");
        return Ok(());
    }

    println!("Cleaning build directory...");
    fs::remove_dir_all(&build_dir)
        .with_context(|| format!("Failed to remove {}", build_dir.display()))?;
    println!("Clean successful!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_missing_build_dir_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(run(temp.path()).is_ok());
    }

    #[test]
    fn test_clean_removes_build_tree() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("build/debug");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("app.exe"), "x").unwrap();

        run(temp.path()).unwrap();
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("build")).unwrap();
        run(temp.path()).unwrap();
        assert!(run(temp.path()).is_ok());
    }
}

//! External toolchain configuration and process execution
//!
//! The compiler, archiver, and resource compiler are pre-installed external
//! programs; clank only synthesizes their invocations and trusts their exit
//! status. Program names and the platform link idiom are carried as data so
//! alternative GCC-compatible toolchains can be substituted.

use crate::command::CommandLine;
use std::path::Path;
use std::process::Command;

/// External toolchain programs and linker idioms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler/linker accepting GCC-style flags
    pub compiler: String,
    /// Archiver accepting `ar`-style static-library creation
    pub archiver: String,
    /// Resource compiler for Windows icon embedding
    pub resource_compiler: String,
    /// Linker flags appended to Windows binaries (static linking plus the
    /// shell API library, an idiom of the reference toolchain)
    pub win_bin_link_flags: Vec<String>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            archiver: "ar".to_string(),
            resource_compiler: "windres".to_string(),
            win_bin_link_flags: vec!["-static".to_string(), "-lshlwapi".to_string()],
        }
    }
}

/// Blocking execution of synthesized toolchain commands.
///
/// The orchestrator is single-threaded and waits for each invocation to
/// exit before issuing the next. The seam exists so tests can script
/// toolchain outcomes without a compiler installed, and so a parallel
/// executor could be substituted later without changing the orchestrator's
/// state machine.
pub trait ProcessRunner {
    /// Run a command with the project root as working directory, returning
    /// whether it exited successfully. An `Err` means the program could not
    /// be launched at all.
    fn run(&mut self, root: &Path, command: &CommandLine) -> std::io::Result<bool>;
}

/// Runs commands as real subprocesses, inheriting stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, root: &Path, command: &CommandLine) -> std::io::Result<bool> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(root)
            .status()?;
        Ok(status.success())
    }
}

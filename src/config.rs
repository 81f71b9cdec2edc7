//! Runtime configuration: command-line flags, then environment variables, then defaults.

use crate::error::{ChoreError, Result};
use crate::recipe::DEFAULT_TOOLCHAIN;
use crate::shell::Shell;
use std::fs;
use std::path::{Path, PathBuf};

/// Env file read by `set-env` when nothing else is configured.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Overrides the env file path.
pub const ENV_FILE_VAR: &str = "CHORE_ENV_FILE";

/// Overrides the toolchain channel used by `fmt`.
pub const TOOLCHAIN_VAR: &str = "CHORE_TOOLCHAIN";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub working_dir: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub toolchain: Option<String>,
    pub shell: Option<Shell>,
    pub dry_run: bool,
    pub quiet: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub working_dir: PathBuf,
    /// Directory `fmt` and `fix` run in.
    pub workspace_root: PathBuf,
    pub env_file: PathBuf,
    pub toolchain: String,
    pub shell: Shell,
    pub dry_run: bool,
    pub quiet: bool,
}

impl Config {
    /// Resolve against the real process environment and current directory.
    ///
    /// # Errors
    ///
    /// Fails if no working directory was given and the current one cannot be read.
    pub fn from_env(overrides: Overrides) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(ChoreError::WorkingDir)?;
        Ok(Self::resolve(overrides, &cwd, |name| std::env::var(name).ok()))
    }

    /// Resolve with an explicit current directory and environment lookup.
    pub fn resolve(overrides: Overrides, cwd: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let working_dir = match overrides.working_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };

        let env_file = overrides
            .env_file
            .or_else(|| env(ENV_FILE_VAR).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        let env_file = if env_file.is_absolute() {
            env_file
        } else {
            working_dir.join(env_file)
        };

        let toolchain = overrides
            .toolchain
            .or_else(|| env(TOOLCHAIN_VAR).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_TOOLCHAIN.to_string());

        // Plain `sh` and unknown shells get the POSIX dialect.
        let shell = overrides
            .shell
            .or_else(|| env("SHELL").as_deref().and_then(Shell::from_path))
            .unwrap_or(Shell::Bash);

        let home = home_dir(&env);
        let workspace_root = find_workspace_root(&working_dir, home.as_deref());

        Self {
            working_dir,
            workspace_root,
            env_file,
            toolchain,
            shell,
            dry_run: overrides.dry_run,
            quiet: overrides.quiet,
        }
    }
}

/// Get the user's home directory in a cross-platform way.
fn home_dir(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(home) = env("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Some(userprofile) = env("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

/// Search upwards from `start` for the Cargo workspace root.
///
/// The first `Cargo.toml` declaring `[workspace]` wins; without one the nearest
/// `Cargo.toml` is used, and without any manifest `start` itself. The search does
/// not go above `home`.
#[must_use]
pub fn find_workspace_root(start: &Path, home: Option<&Path>) -> PathBuf {
    let mut nearest_manifest: Option<PathBuf> = None;

    for dir in start.ancestors() {
        let manifest = dir.join("Cargo.toml");
        if manifest.is_file() {
            if declares_workspace(&manifest) {
                return dir.to_path_buf();
            }
            if nearest_manifest.is_none() {
                nearest_manifest = Some(dir.to_path_buf());
            }
        }

        if home.is_some_and(|h| h == dir) {
            break;
        }
    }

    nearest_manifest.unwrap_or_else(|| start.to_path_buf())
}

/// A manifest is a workspace root when it has a top-level `workspace` table,
/// in any of the forms TOML allows. Unreadable or invalid manifests are not.
fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest)
        .ok()
        .and_then(|content| toml::from_str::<toml::Table>(&content).ok())
        .is_some_and(|table| table.contains_key("workspace"))
}

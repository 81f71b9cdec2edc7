//! # chore
//!
//! Developer chores for a Cargo workspace.
//!
//! ## Usage
//!
//! - List recipes: `chore`, `chore l`, `chore list-unsorted`
//! - Format with the nightly toolchain: `chore fmt`
//! - Apply clippy fixes: `chore fix`
//! - Load `.env` into the current shell: `eval "$(chore set-env)"`
//! - Run a program with `.env` applied: `chore set-env -- cargo run`

use std::process::ExitCode;

/// Entry point for the CLI tool.
fn main() -> ExitCode {
    chore::cli::run_cli()
}

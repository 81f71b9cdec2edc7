//! # chore
//!
//! A tiny task runner for Cargo workspaces. It knows four recipes: `list-unsorted`
//! (alias `l`), `fmt`, `fix` and `set-env`.

pub mod cli;
pub mod completion;
pub mod config;
pub mod dotenv;
pub mod error;
pub mod executor;
pub mod logging;
pub mod recipe;
pub mod shell;

pub use error::{ChoreError, Result};

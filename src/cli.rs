//! CLI module containing the main entry point logic.

use crate::config::{Config, Overrides};
use crate::shell::Shell;
use crate::{completion, executor, logging};
use clap::Parser as ClapParser;
use std::path::PathBuf;
use std::process::ExitCode;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Recipe run when none is named.
const DEFAULT_RECIPE: &str = "list-unsorted";

/// CLI arguments for the chore tool.
#[derive(ClapParser)]
#[command(name = "chore")]
#[command(version = PKG_VERSION)]
#[command(about = "Developer chores for a Cargo workspace: list, fmt, fix, set-env", long_about = None)]
struct Cli {
    /// Recipe to run (defaults to `list-unsorted`)
    #[arg(value_name = "RECIPE")]
    recipe: Option<String>,

    /// Program (and its arguments) to run with the env file applied; `set-env` only
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    /// List all recipes, sorted by name
    #[arg(short, long)]
    list: bool,

    /// Print the recipe table as JSON
    #[arg(long)]
    inspect: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    generate_completion: Option<Shell>,

    /// Print the command a recipe would run instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Do not echo commands before running them
    #[arg(short, long)]
    quiet: bool,

    /// Directory to run in (default: current directory)
    #[arg(long = "working-dir", value_name = "PATH")]
    working_dir: Option<PathBuf>,

    /// Env file read by `set-env` [env: CHORE_ENV_FILE] [default: .env]
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Toolchain channel used by `fmt` [env: CHORE_TOOLCHAIN] [default: nightly]
    #[arg(long, value_name = "CHANNEL")]
    toolchain: Option<String>,

    /// Shell syntax `set-env` emits (default: detected from $SHELL)
    #[arg(long, value_name = "SHELL")]
    shell: Option<Shell>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            working_dir: self.working_dir.clone(),
            env_file: self.env_file.clone(),
            toolchain: self.toolchain.clone(),
            shell: self.shell,
            dry_run: self.dry_run,
            quiet: self.quiet,
        }
    }
}

/// Main CLI logic. Returns the exit code of the recipe that ran.
pub fn run_cli() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    // Handle --generate-completion flag
    if let Some(shell) = cli.generate_completion {
        return match completion::generate_completion_script(shell) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&e),
        };
    }

    // Handle --list flag
    if cli.list {
        return match executor::list_recipes(true) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&e),
        };
    }

    let config = match Config::from_env(cli.overrides()) {
        Ok(config) => config,
        Err(e) => return report(&e),
    };

    // Handle --inspect flag
    if cli.inspect {
        return match executor::inspect(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&e),
        };
    }

    let recipe = cli.recipe.as_deref().unwrap_or(DEFAULT_RECIPE);
    match executor::run_recipe(recipe, &cli.args, &config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => report(&e),
    }
}

fn report(err: &crate::error::ChoreError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}

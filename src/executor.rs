//! Recipe execution: listing, external tool invocation and env export.

use crate::config::Config;
use crate::error::{ChoreError, Result};
use crate::dotenv;
use crate::recipe::{self, Action, Recipe, RecipeInfo, ToolInvocation};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Run the recipe called `name` (or one of its aliases) and return the exit code to report.
///
/// # Errors
///
/// Fails for unknown recipes, unexpected arguments, missing tools and unreadable env files.
/// A tool that runs and fails is not an error: its exit code is returned.
pub fn run_recipe(name: &str, args: &[String], config: &Config) -> Result<u8> {
    let recipe = recipe::find(name).ok_or_else(|| ChoreError::UnknownRecipe {
        name: name.to_string(),
    })?;

    if !args.is_empty() && !recipe.accepts_arguments() {
        return Err(ChoreError::UnexpectedArguments {
            recipe: recipe.name,
            args: args.to_vec(),
        });
    }

    debug!(recipe = recipe.name, "running recipe");
    let mut stdout = std::io::stdout().lock();

    match recipe.action {
        Action::ListUnsorted => {
            write_listing(&mut stdout, recipe::all(), false)?;
            Ok(0)
        }
        Action::Tool(tool) => run_tool(
            &tool.invocation(&config.toolchain),
            &config.workspace_root,
            config,
            &mut stdout,
        ),
        Action::SetEnv => set_env(args, config, &mut stdout),
    }
}

/// Print the recipe table, in declaration order unless `sorted`.
///
/// # Errors
///
/// Fails if stdout cannot be written.
pub fn list_recipes(sorted: bool) -> Result<()> {
    write_listing(&mut std::io::stdout().lock(), recipe::all(), sorted)
}

/// Print the recipe table as pretty JSON.
///
/// # Errors
///
/// Fails if serialization fails or stdout cannot be written.
pub fn inspect(config: &Config) -> Result<()> {
    let infos: Vec<RecipeInfo> = recipe::all()
        .iter()
        .map(|r| r.info(&config.toolchain))
        .collect();
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&infos)?)?;
    stdout.flush()?;
    Ok(())
}

fn write_listing(out: &mut impl Write, recipes: &[Recipe], sorted: bool) -> Result<()> {
    let mut recipes: Vec<&Recipe> = recipes.iter().collect();
    if sorted {
        recipes.sort_by_key(|r| r.name);
    }

    let width = recipes.iter().map(|r| r.name.len()).max().unwrap_or(0);

    writeln!(out, "Available recipes:")?;
    for r in recipes {
        let mut line = format!("    {:<width$} # {}", r.name, r.description);
        if !r.aliases.is_empty() {
            let label = if r.aliases.len() == 1 { "alias" } else { "aliases" };
            line.push_str(&format!(" [{label}: {}]", r.aliases.join(", ")));
        }
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Run one external tool with inherited stdio and return its exit code.
fn run_tool(
    invocation: &ToolInvocation,
    dir: &Path,
    config: &Config,
    out: &mut impl Write,
) -> Result<u8> {
    let command_line = invocation.display();

    if config.dry_run {
        writeln!(out, "{command_line}")?;
        out.flush()?;
        return Ok(0);
    }

    let program = which::which(&invocation.program).map_err(|source| ChoreError::ToolNotFound {
        program: invocation.program.clone(),
        source,
    })?;

    if !config.quiet {
        eprintln!("{command_line}");
    }
    debug!(program = %program.display(), dir = %dir.display(), "spawning");

    let status = Command::new(&program)
        .args(&invocation.args)
        .current_dir(dir)
        .status()
        .map_err(|source| ChoreError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    let code = exit_code(status.code());
    if code != 0 {
        debug!(command = %command_line, code, "tool exited with failure");
    }
    Ok(code)
}

/// Parse the env file and either print an export script or run `args` with the variables set.
fn set_env(args: &[String], config: &Config, out: &mut impl Write) -> Result<u8> {
    let file = dotenv::load(&config.env_file)?;
    for (line, raw) in file.malformed() {
        warn!(
            file = %config.env_file.display(),
            line,
            "skipping malformed line: {raw}"
        );
    }
    let vars = file.variables();
    debug!(count = vars.len(), file = %config.env_file.display(), "loaded env file");

    let Some((program, rest)) = args.split_first() else {
        write!(out, "{}", config.shell.export_script(&vars))?;
        out.flush()?;
        return Ok(0);
    };

    let invocation = ToolInvocation {
        program: program.clone(),
        args: rest.to_vec(),
    };

    if config.dry_run {
        write!(out, "{}", config.shell.export_script(&vars))?;
        writeln!(out, "{}", invocation.display())?;
        out.flush()?;
        return Ok(0);
    }

    let resolved = which::which(program).map_err(|source| ChoreError::ToolNotFound {
        program: program.clone(),
        source,
    })?;

    let status = Command::new(resolved)
        .args(rest)
        .envs(vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&config.working_dir)
        .status()
        .map_err(|source| ChoreError::Spawn {
            command: invocation.display(),
            source,
        })?;

    Ok(exit_code(status.code()))
}

/// Exit code to report for a finished child; termination by signal maps to 1.
fn exit_code(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use crate::shell::Shell;
    use std::fs;

    fn config_in(dir: &Path, overrides: Overrides) -> Config {
        Config::resolve(overrides, dir, |_| None)
    }

    fn listing(sorted: bool) -> String {
        let mut buf = Vec::new();
        write_listing(&mut buf, recipe::all(), sorted).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Writer standing in for a full disk or a closed pipe.
    struct FullWriter;

    impl Write for FullWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from_raw_os_error(28))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_listing_is_declaration_order() {
        let text = listing(false);
        let names: Vec<&str> = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(names, ["list-unsorted", "fmt", "fix", "set-env"]);
        assert!(text.starts_with("Available recipes:\n"));
        assert!(text.contains("[alias: l]"));
    }

    #[test]
    fn test_listing_sorted() {
        let text = listing(true);
        let names: Vec<&str> = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(names, ["fix", "fmt", "list-unsorted", "set-env"]);
    }

    #[test]
    fn test_listing_aligns_descriptions() {
        let text = listing(false);
        let columns: Vec<usize> = text.lines().skip(1).filter_map(|l| l.find('#')).collect();
        assert_eq!(columns.len(), 4);
        assert!(columns.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_dry_run_prints_command() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            Overrides {
                dry_run: true,
                ..Overrides::default()
            },
        );
        let invocation = recipe::find("fmt")
            .and_then(|r| r.invocation(&config.toolchain))
            .unwrap();
        let mut out = Vec::new();
        let code = run_tool(&invocation, dir.path(), &config, &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "cargo +nightly fmt --all\n");
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Overrides::default());
        let invocation = ToolInvocation {
            program: "chore-test-no-such-tool".to_string(),
            args: vec![],
        };
        let err = run_tool(&invocation, dir.path(), &config, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ChoreError::ToolNotFound { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn test_unknown_recipe() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Overrides::default());
        let err = run_recipe("deploy", &[], &config).unwrap_err();
        assert!(matches!(err, ChoreError::UnknownRecipe { .. }));
    }

    #[test]
    fn test_arguments_rejected_for_fmt() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Overrides::default());
        let err = run_recipe("fmt", &["--check".to_string()], &config).unwrap_err();
        assert!(matches!(
            err,
            ChoreError::UnexpectedArguments { recipe: "fmt", .. }
        ));
    }

    #[test]
    fn test_set_env_prints_exports_only_for_assignments() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "# comment\nFOO=bar\n\n").unwrap();
        let config = config_in(
            dir.path(),
            Overrides {
                shell: Some(Shell::Bash),
                ..Overrides::default()
            },
        );
        let mut out = Vec::new();
        assert_eq!(set_env(&[], &config, &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "export FOO='bar'\n");
    }

    #[test]
    fn test_set_env_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "A=1\nB=two words\n").unwrap();
        let config = config_in(dir.path(), Overrides::default());

        let mut first = Vec::new();
        let mut second = Vec::new();
        set_env(&[], &config, &mut first).unwrap();
        set_env(&[], &config, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_env_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), Overrides::default());
        let err = set_env(&[], &config, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ChoreError::EnvFileMissing { .. }));
    }

    #[test]
    fn test_set_env_dry_run_with_program() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "FOO=bar\n").unwrap();
        let config = config_in(
            dir.path(),
            Overrides {
                dry_run: true,
                shell: Some(Shell::Fish),
                ..Overrides::default()
            },
        );
        let mut out = Vec::new();
        let args = vec!["printenv".to_string(), "FOO".to_string()];
        assert_eq!(set_env(&args, &config, &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "set -gx FOO 'bar'\nprintenv FOO\n"
        );
    }

    #[test]
    fn test_listing_write_failure_is_an_error() {
        let err = write_listing(&mut FullWriter, recipe::all(), false).unwrap_err();
        assert!(matches!(err, ChoreError::Output(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_set_env_write_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".env"), "FOO=bar\n").unwrap();
        let config = config_in(dir.path(), Overrides::default());
        let err = set_env(&[], &config, &mut FullWriter).unwrap_err();
        assert!(matches!(err, ChoreError::Output(_)));
    }

    #[test]
    fn test_dry_run_write_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            Overrides {
                dry_run: true,
                ..Overrides::default()
            },
        );
        let invocation = recipe::find("fix")
            .and_then(|r| r.invocation(&config.toolchain))
            .unwrap();
        let err = run_tool(&invocation, dir.path(), &config, &mut FullWriter).unwrap_err();
        assert!(matches!(err, ChoreError::Output(_)));
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(Some(0)), 0);
        assert_eq!(exit_code(Some(101)), 101);
        assert_eq!(exit_code(None), 1);
        assert_eq!(exit_code(Some(-1)), 1);
    }
}

//! Shell completion script generation.
//!
//! Scripts complete recipe names and aliases, taken from the recipe table at
//! generation time.

use crate::error::Result;
use crate::recipe;
use crate::shell::Shell;
use std::io::Write;

const FLAGS: &[&str] = &[
    "--list",
    "--inspect",
    "--dry-run",
    "--quiet",
    "--working-dir",
    "--env-file",
    "--toolchain",
    "--shell",
    "--generate-completion",
    "--help",
    "--version",
];

/// Generate the completion script for `shell`.
#[must_use]
pub fn completion_script(shell: Shell) -> String {
    let names = recipe::invocable_names();
    match shell {
        Shell::Bash => bash_script(&names),
        Shell::Zsh => zsh_script(),
        Shell::Fish => fish_script(),
        Shell::PowerShell => powershell_script(&names),
    }
}

/// Print the completion script for `shell` to stdout.
///
/// # Errors
///
/// Fails if stdout cannot be written.
pub fn generate_completion_script(shell: Shell) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", completion_script(shell))?;
    stdout.flush()?;
    Ok(())
}

fn bash_script(names: &[&str]) -> String {
    format!(
        r#"#!/usr/bin/env bash
# bash completion for chore

_chore_complete() {{
    local cur="${{COMP_WORDS[COMP_CWORD]}}"
    if [[ "$cur" == -* ]]; then
        COMPREPLY=($(compgen -W "{flags}" -- "$cur"))
    else
        COMPREPLY=($(compgen -W "{names}" -- "$cur"))
    fi
}}

complete -F _chore_complete chore
"#,
        flags = FLAGS.join(" "),
        names = names.join(" "),
    )
}

fn zsh_script() -> String {
    let recipes: Vec<String> = recipe::all()
        .iter()
        .flat_map(|r| {
            std::iter::once(r.name)
                .chain(r.aliases.iter().copied())
                .map(move |name| format!("        '{name}:{}'", r.description))
        })
        .collect();

    format!(
        r"#compdef chore
# zsh completion for chore

_chore() {{
    local -a recipes
    recipes=(
{recipes}
    )
    _describe 'recipe' recipes
}}

_chore
",
        recipes = recipes.join("\n"),
    )
}

fn fish_script() -> String {
    let mut script = String::from("# fish completion for chore\ncomplete -c chore -f\n");
    for r in recipe::all() {
        for name in std::iter::once(r.name).chain(r.aliases.iter().copied()) {
            script.push_str(&format!(
                "complete -c chore -n '__fish_use_subcommand' -a '{name}' -d '{}'\n",
                r.description
            ));
        }
    }
    script
}

fn powershell_script(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!(
        r#"# PowerShell completion for chore
Register-ArgumentCompleter -Native -CommandName chore -ScriptBlock {{
    param($wordToComplete, $commandAst, $cursorPosition)
    @({names}) | Where-Object {{ $_ -like "$wordToComplete*" }} | ForEach-Object {{
        [System.Management.Automation.CompletionResult]::new($_, $_, 'ParameterValue', $_)
    }}
}}
"#,
        names = quoted.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

    #[test]
    fn test_every_script_names_every_recipe() {
        for shell in ALL {
            let script = completion_script(shell);
            for name in recipe::invocable_names() {
                assert!(
                    script.contains(name),
                    "{} completion is missing {name}",
                    shell.name()
                );
            }
        }
    }

    #[test]
    fn test_bash_script_registers_function() {
        let script = completion_script(Shell::Bash);
        assert!(script.starts_with("#!/usr/bin/env bash"));
        assert!(script.contains("complete -F _chore_complete chore"));
        assert!(script.contains("--dry-run"));
    }

    #[test]
    fn test_zsh_script_has_compdef() {
        let script = completion_script(Shell::Zsh);
        assert!(script.starts_with("#compdef chore"));
        assert!(script.contains("'l:List recipes in declaration order'"));
    }

    #[test]
    fn test_scripts_are_different() {
        let bash = completion_script(Shell::Bash);
        let fish = completion_script(Shell::Fish);
        let pwsh = completion_script(Shell::PowerShell);
        assert_ne!(bash, fish);
        assert_ne!(bash, pwsh);
        assert_ne!(fish, pwsh);
    }
}

//! Target shells and the export syntax `set-env` emits for each of them.

use clap::ValueEnum;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell", alias = "pwsh")]
    PowerShell,
}

impl Shell {
    /// Returns the lowercase name of the shell.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        }
    }

    /// Detect the shell from a `SHELL`-style value such as `/usr/bin/zsh`.
    #[must_use]
    pub fn from_path(shell_var: &str) -> Option<Shell> {
        let name = std::path::Path::new(shell_var)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(shell_var);
        if name.contains("bash") {
            Some(Shell::Bash)
        } else if name.contains("zsh") {
            Some(Shell::Zsh)
        } else if name.contains("fish") {
            Some(Shell::Fish)
        } else if name.contains("pwsh") || name.contains("powershell") {
            Some(Shell::PowerShell)
        } else {
            None
        }
    }

    /// One statement exporting `key` with `value` into the current session.
    #[must_use]
    pub fn export_line(self, key: &str, value: &str) -> String {
        match self {
            Shell::Bash | Shell::Zsh => format!("export {key}={}", posix_quote(value)),
            Shell::Fish => format!("set -gx {key} {}", fish_quote(value)),
            Shell::PowerShell => format!("$env:{key} = {}", pwsh_quote(value)),
        }
    }

    /// Full script for a list of variables, one statement per line.
    #[must_use]
    pub fn export_script(self, vars: &[(String, String)]) -> String {
        vars.iter()
            .map(|(k, v)| self.export_line(k, v) + "\n")
            .collect()
    }
}

/// Single-quote a value for POSIX shells; embedded quotes become `'\''`.
fn posix_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Single-quote a value for fish, where `\` and `'` are the only escapes.
fn fish_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', r"\\").replace('\'', r"\'"))
}

/// Single-quote a value for PowerShell; embedded quotes are doubled.
fn pwsh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

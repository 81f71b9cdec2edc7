//! The recipe table.
//!
//! Recipes are declared in a fixed order; listing without sorting reproduces that
//! order exactly.

use serde::Serialize;

/// Toolchain channel used by `fmt` when nothing else is configured.
pub const DEFAULT_TOOLCHAIN: &str = "nightly";

/// What a recipe does when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print the recipe table in declaration order.
    ListUnsorted,
    /// Delegate to an external tool.
    Tool(Tool),
    /// Export the variables of the env file.
    SetEnv,
}

/// External tools a recipe can delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// `cargo +<toolchain> fmt --all`
    Format,
    /// `cargo clippy --fix --allow-staged --workspace`
    Fix,
}

impl Tool {
    /// The command line this tool runs.
    #[must_use]
    pub fn invocation(self, toolchain: &str) -> ToolInvocation {
        match self {
            Tool::Format => ToolInvocation::cargo([
                format!("+{toolchain}"),
                "fmt".to_string(),
                "--all".to_string(),
            ]),
            Tool::Fix => {
                ToolInvocation::cargo(["clippy", "--fix", "--allow-staged", "--workspace"])
            }
        }
    }
}

/// A named command in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub action: Action,
}

const RECIPES: &[Recipe] = &[
    Recipe {
        name: "list-unsorted",
        aliases: &["l"],
        description: "List recipes in declaration order",
        action: Action::ListUnsorted,
    },
    Recipe {
        name: "fmt",
        aliases: &[],
        description: "Format the whole workspace with the nightly rustfmt",
        action: Action::Tool(Tool::Format),
    },
    Recipe {
        name: "fix",
        aliases: &[],
        description: "Apply clippy's automatic fixes across the workspace",
        action: Action::Tool(Tool::Fix),
    },
    Recipe {
        name: "set-env",
        aliases: &[],
        description: "Export the variables defined in the env file",
        action: Action::SetEnv,
    },
];

/// All recipes, in declaration order.
#[must_use]
pub fn all() -> &'static [Recipe] {
    RECIPES
}

/// Look a recipe up by its name or one of its aliases.
#[must_use]
pub fn find(name: &str) -> Option<&'static Recipe> {
    RECIPES
        .iter()
        .find(|r| r.name == name || r.aliases.contains(&name))
}

/// Every name a user may type: canonical names followed by aliases.
#[must_use]
pub fn invocable_names() -> Vec<&'static str> {
    RECIPES
        .iter()
        .map(|r| r.name)
        .chain(RECIPES.iter().flat_map(|r| r.aliases.iter().copied()))
        .collect()
}

/// An external program plus its fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolInvocation {
    fn cargo<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: "cargo".to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The invocation as a single command line, for echoing and dry runs.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Recipe {
    /// The external invocation behind this recipe, if it delegates to one.
    #[must_use]
    pub fn invocation(&self, toolchain: &str) -> Option<ToolInvocation> {
        match self.action {
            Action::Tool(tool) => Some(tool.invocation(toolchain)),
            Action::ListUnsorted | Action::SetEnv => None,
        }
    }

    /// Whether the recipe accepts trailing arguments (only `set-env`, for the program to exec).
    #[must_use]
    pub fn accepts_arguments(&self) -> bool {
        self.action == Action::SetEnv
    }

    /// Serializable summary used by `--inspect`.
    #[must_use]
    pub fn info(&self, toolchain: &str) -> RecipeInfo {
        RecipeInfo {
            name: self.name,
            aliases: self.aliases.to_vec(),
            description: self.description,
            command: self.invocation(toolchain).map(|inv| inv.display()),
        }
    }
}

/// JSON view of a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeInfo {
    pub name: &'static str,
    pub aliases: Vec<&'static str>,
    pub description: &'static str,
    /// Rendered command line, or `None` for built-ins.
    pub command: Option<String>,
}

//! Command table: the fixed mapping from command name to content.
//!
//! The table is either the built-in one (Markdown embedded at compile time)
//! or loaded from a TOML file:
//!
//! ```toml
//! welcome = "# Hello\nType [/help](/help) to begin."
//! reset = "/clear"
//!
//! [[commands]]
//! name = "/about"
//! description = "Who am I"
//! content = "Some **markdown**"
//!
//! [[commands]]
//! name = "/projects"
//! description = "Side projects"
//! content_file = "projects.md"   # relative to the table file
//! ```
//!
//! Iteration order is declaration order; autocomplete relies on it.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Leading character marking input as a command
pub const COMMAND_PREFIX: char = '/';

/// Default name of the command that clears history
pub const RESET_COMMAND: &str = "/clear";

/// Command that lists the others; named in the "not found" hint
pub const HELP_COMMAND: &str = "/help";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse command table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Command name must start with '/': {0:?}")]
    InvalidName(String),

    #[error("Duplicate command: {0}")]
    Duplicate(String),

    #[error("Command {0} has no content")]
    MissingContent(String),
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// One row of the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    /// Normalized name, always starting with [`COMMAND_PREFIX`]
    pub name: String,
    /// Short human-readable description
    pub description: String,
    /// Document revealed when the command runs; `None` for the reset command
    pub content: Option<String>,
}

/// Read-only command table
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    welcome: String,
    reset: String,
}

impl CommandTable {
    /// Empty table with the given welcome document and the default reset name
    pub fn new(welcome: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            welcome: welcome.into(),
            reset: RESET_COMMAND.to_string(),
        }
    }

    /// Append a content command
    pub fn with_command(
        mut self,
        name: &str,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.entries.push(CommandEntry {
            name: normalize(name),
            description: description.into(),
            content: Some(content.into()),
        });
        self
    }

    /// Append the reset command at this position
    pub fn with_reset(mut self, description: impl Into<String>) -> Self {
        self.entries.push(CommandEntry {
            name: self.reset.clone(),
            description: description.into(),
            content: None,
        });
        self
    }

    /// Table shipped with the binary
    pub fn builtin() -> Self {
        Self::new(include_str!("../content/welcome.md"))
            .with_command("/about", "Who am I", include_str!("../content/about.md"))
            .with_command("/skills", "Technical skills", include_str!("../content/skills.md"))
            .with_command("/experience", "Work history", include_str!("../content/experience.md"))
            .with_command("/projects", "Side projects", include_str!("../content/projects.md"))
            .with_command("/education", "Education background", include_str!("../content/education.md"))
            .with_reset("Clear screen")
            .with_command("/help", "Show available commands", include_str!("../content/help.md"))
    }

    /// Load a table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml_str(&text, &base)
    }

    /// Parse a table; `content_file` paths resolve against `base`
    pub fn from_toml_str(text: &str, base: &Path) -> Result<Self> {
        let file: TableFile = toml::from_str(text)?;
        let reset = normalize(file.reset.as_deref().unwrap_or(RESET_COMMAND));
        if !reset.starts_with(COMMAND_PREFIX) {
            return Err(ContentError::InvalidName(reset));
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(file.commands.len() + 1);
        for raw in file.commands {
            let name = normalize(&raw.name);
            if !name.starts_with(COMMAND_PREFIX) {
                return Err(ContentError::InvalidName(raw.name));
            }
            if !seen.insert(name.clone()) {
                return Err(ContentError::Duplicate(name));
            }

            let content = if name == reset {
                None
            } else {
                match (raw.content, raw.content_file) {
                    (Some(content), _) => Some(content),
                    (None, Some(content_file)) => {
                        let path = base.join(content_file);
                        let content = fs::read_to_string(&path)
                            .map_err(|source| ContentError::Io { path, source })?;
                        Some(content)
                    }
                    (None, None) => return Err(ContentError::MissingContent(name)),
                }
            };

            entries.push(CommandEntry {
                name,
                description: raw.description,
                content,
            });
        }

        if !seen.contains(&reset) {
            entries.push(CommandEntry {
                name: reset.clone(),
                description: "Clear screen".to_string(),
                content: None,
            });
        }

        Ok(Self {
            entries,
            welcome: file.welcome,
            reset,
        })
    }

    /// Look up a normalized command name
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Command names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.get(name).map(|e| e.description.as_str())
    }

    pub fn welcome(&self) -> &str {
        &self.welcome
    }

    #[allow(dead_code)]
    pub fn reset_command(&self) -> &str {
        &self.reset
    }

    pub fn is_reset(&self, name: &str) -> bool {
        name == self.reset
    }
}

/// Trimmed, lowercased form used for lookups
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default)]
    welcome: String,
    reset: Option<String>,
    #[serde(default)]
    commands: Vec<RawCommand>,
}

#[derive(Deserialize)]
struct RawCommand {
    name: String,
    #[serde(default)]
    description: String,
    content: Option<String>,
    content_file: Option<PathBuf>,
}

//! Command-line surface of the smoke binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskboard - projects, tasks and notes
#[derive(Debug, Parser)]
#[command(name = "taskboard")]
#[command(about = "Inspect and seed a local Taskboard database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// JSON config file; `TASKBOARD_*` variables still override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the project list (default)
    List,
    /// Create a project and print the updated list
    AddProject {
        /// Project title; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn no_subcommand_lists_projects() {
        let cli = Cli::try_parse_from(["taskboard"]).unwrap();
        assert_eq!(cli.command(), Command::List);
        assert!(cli.config.is_none());
    }

    #[test]
    fn add_project_collects_title_words() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "add-project",
            "Spring",
            "cleaning",
            "--config",
            "/tmp/tb.json",
        ])
        .unwrap();
        assert_eq!(
            cli.command(),
            Command::AddProject {
                title: vec!["Spring".to_string(), "cleaning".to_string()]
            }
        );
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tb.json")));
    }

    #[test]
    fn missing_title_and_unknown_commands_are_rejected() {
        assert!(Cli::try_parse_from(["taskboard", "add-project"]).is_err());
        assert!(Cli::try_parse_from(["taskboard", "rename-project"]).is_err());
    }
}

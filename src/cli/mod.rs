//! Command line definitions and dispatch

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::suggest::{self, SuggestAction};
use crate::ui;

pub mod orchestration;

use orchestration::BumpWorkflowArgs;

/// Names of the subcommands, the vocabulary for mistyped commands
pub const COMMANDS: [&str; 5] = ["bump-version", "lint", "info", "list", "sync-check"];

#[derive(Parser, Debug)]
#[command(
    name = "templet",
    version,
    about = "Maintain projects generated from templates",
    long_about = "Bump project versions, lint generated projects and check \
                  whether a project should be synced with its template."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bump the project version in every tracked file
    BumpVersion {
        /// The new version, e.g. 1.2.0 or 1.3.0-SNAPSHOT
        #[arg(required_unless_present = "project_version")]
        new_version: Option<String>,

        /// Project directory
        #[arg(default_value = ".")]
        project_dir: PathBuf,

        /// Allow bumping to a lower version
        #[arg(short, long)]
        downgrade: bool,

        /// Skip confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,

        /// Preview what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Print the version of the project in the current directory and exit
        #[arg(long, conflicts_with = "new_version")]
        project_version: bool,
    },

    /// Lint a generated project
    Lint {
        /// Project directory
        #[arg(default_value = ".")]
        project_dir: PathBuf,
    },

    /// Show details of a template or template group
    Info {
        /// Full or partial handle, e.g. cli-python or web
        handle: Option<String>,
    },

    /// List all available templates
    List,

    /// Check whether the project should be synced with its template
    SyncCheck {
        /// Project directory
        #[arg(default_value = ".")]
        project_dir: PathBuf,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::BumpVersion {
            new_version,
            project_dir,
            downgrade,
            yes,
            dry_run,
            project_version,
        } => {
            if project_version {
                return orchestration::run_project_version(&project_dir).map(|_| ());
            }
            let Some(new_version) = new_version else {
                return Err(anyhow!("bump-version needs a new version"));
            };
            let args = BumpWorkflowArgs {
                project_dir,
                new_version,
                allow_downgrade: downgrade,
                assume_yes: yes,
                dry_run,
            };
            orchestration::run_bump_version(&args).map(|_| ())
        }
        Command::Lint { project_dir } => orchestration::run_lint(&project_dir).map(|_| ()),
        Command::Info { handle } => orchestration::run_info(handle.as_deref()),
        Command::List => orchestration::run_list(),
        Command::SyncCheck { project_dir } => {
            orchestration::run_sync_check(&project_dir).map(|_| ())
        }
        Command::External(args) => rerun_corrected(cli.verbose, &args),
    }
}

/// Handle an unknown subcommand: rerun with the corrected name when there is
/// a single close match, otherwise report what it might have meant.
fn rerun_corrected(verbose: bool, args: &[String]) -> Result<()> {
    let Some((typed, rest)) = args.split_first() else {
        return Err(anyhow!("No command given"));
    };

    let suggestion = suggest::suggest(typed, COMMANDS);
    match (suggestion.action, suggestion.unique()) {
        (SuggestAction::Use, Some(command)) => {
            ui::display_status(&format!(
                "Unknown command '{}'. Running '{}' instead.",
                typed, command
            ));
            let corrected = corrected_args(verbose, command, rest);
            let cli = Cli::try_parse_from(corrected)?;
            if let Command::External(_) = cli.command {
                return Err(anyhow!("Unknown command '{}'", typed));
            }
            dispatch(cli)
        }
        (SuggestAction::None, _) => Err(anyhow!(
            "Unknown command '{}'. Run 'templet --help' for usage.",
            typed
        )),
        _ => Err(anyhow!(ui::format_suggestion("command", typed, &suggestion))),
    }
}

fn corrected_args(verbose: bool, command: &str, rest: &[String]) -> Vec<String> {
    let mut corrected = vec!["templet".to_string()];
    if verbose {
        corrected.push("--verbose".to_string());
    }
    corrected.push(command.to_string());
    corrected.extend(rest.iter().cloned());
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_commands_match_subcommands() {
        let cmd = Cli::command();
        let names: Vec<&str> = cmd.get_subcommands().map(|c| c.get_name()).collect();
        for command in COMMANDS {
            assert!(names.contains(&command), "missing subcommand {}", command);
        }
    }

    #[test]
    fn test_parse_bump_version() {
        let cli = Cli::try_parse_from(["templet", "bump-version", "1.2.0", "proj", "--dry-run"]).unwrap();
        match cli.command {
            Command::BumpVersion {
                new_version,
                project_dir,
                downgrade,
                dry_run,
                ..
            } => {
                assert_eq!(new_version.as_deref(), Some("1.2.0"));
                assert_eq!(project_dir, PathBuf::from("proj"));
                assert!(!downgrade);
                assert!(dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_captured() {
        let cli = Cli::try_parse_from(["templet", "lnt", "somewhere"]).unwrap();
        match cli.command {
            Command::External(args) => assert_eq!(args, vec!["lnt", "somewhere"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_corrected_args() {
        let rest = vec![".".to_string()];
        assert_eq!(
            corrected_args(true, "lint", &rest),
            vec!["templet", "--verbose", "lint", "."]
        );
    }

    #[test]
    fn test_parse_project_version_flag() {
        let cli = Cli::try_parse_from(["templet", "bump-version", "--project-version"]).unwrap();
        match cli.command {
            Command::BumpVersion {
                new_version,
                project_version,
                ..
            } => {
                assert_eq!(new_version, None);
                assert!(project_version);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["templet", "bump-version"]).is_err());
        assert!(Cli::try_parse_from(["templet", "bump-version", "1.0.0", "--project-version"]).is_err());
    }
}

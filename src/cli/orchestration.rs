//! Command workflows.
//!
//! Each function runs one subcommand end to end: load what it needs, call
//! into the library and report through `ui`. Argument parsing stays in
//! `cli`, so these can be driven programmatically as well.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::debug;

use crate::bump::{self, BumpOutcome, BumpRequest};
use crate::config;
use crate::domain::Handle;
use crate::guard::{self, BumpKind};
use crate::lint::{self, LintReport};
use crate::registry::Registry;
use crate::suggest::{self, SuggestAction};
use crate::sync::{self, SyncDecision};
use crate::ui;
use crate::warning::TempletWarning;

/// Arguments for the bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    pub project_dir: PathBuf,

    pub new_version: String,

    /// Permit moving to a lower version
    pub allow_downgrade: bool,

    /// Skip confirmation prompts
    pub assume_yes: bool,

    /// Preview mode - show the changes without writing them
    pub dry_run: bool,
}

/// Bump the project version.
///
/// 1. Load `templet.toml`
/// 2. Validate the transition
/// 3. Lint the project and refuse to bump one that fails
/// 4. Ask for confirmation when the step is not a plain major/minor/patch
///    bump, unless downgrading
/// 5. Rewrite tracked files, `current_version` and the changelog
///
/// Returns `Ok(None)` when the user declined.
pub fn run_bump_version(args: &BumpWorkflowArgs) -> Result<Option<BumpOutcome>> {
    let config = config::load_config(&args.project_dir, None)?;
    let current = config.bumpversion.current_version.clone();

    guard::validate_transition(&current, &args.new_version, args.allow_downgrade)?;

    let report = lint::lint_project(&args.project_dir);
    if !report.is_success() {
        ui::display_lint_report(&report);
        return Err(anyhow!(
            "Project failed linting with {} error(s); fix them before bumping",
            report.failed.len()
        ));
    }
    debug!("Lint passed with {} warning(s)", report.warned.len());

    if !args.allow_downgrade {
        let kind = guard::classify_bump_size(&current, &args.new_version);
        debug!("Bump from {} to {} classified as {}", current, args.new_version, kind);
        if kind == BumpKind::Unknown {
            ui::display_warning(&TempletWarning::UnusualBumpSize {
                current: current.clone(),
                proposed: args.new_version.clone(),
            });
            if !args.assume_yes && !args.dry_run && !ui::confirm_action("Bump anyway?")? {
                println!("Version bump cancelled by user.");
                return Ok(None);
            }
        }
    }

    let request = BumpRequest {
        new_version: args.new_version.clone(),
        allow_downgrade: args.allow_downgrade,
        dry_run: args.dry_run,
        date: chrono::Local::now().date_naive(),
    };
    let outcome = bump::bump_project(&args.project_dir, &config, &request)?;

    for warning in &outcome.warnings {
        ui::display_warning(warning);
    }

    ui::display_bump_outcome(&outcome, &args.project_dir, args.dry_run);

    if args.dry_run {
        ui::display_status(&format!(
            "Dry run: version would be bumped from {} to {}",
            outcome.previous_version, outcome.new_version
        ));
    } else {
        ui::display_success(&format!(
            "Bumped version from {} to {}",
            outcome.previous_version, outcome.new_version
        ));
    }

    Ok(Some(outcome))
}

/// Print the current project version
pub fn run_project_version(project_dir: &Path) -> Result<String> {
    let config = config::load_config(project_dir, None)?;
    let version = config.bumpversion.current_version;
    ui::display_status(&format!("Current project version is {}", version));
    Ok(version)
}

/// Lint a project; fails when any check failed
pub fn run_lint(project_dir: &Path) -> Result<LintReport> {
    ui::display_status(&format!("Linting {}", project_dir.display()));
    let report = lint::lint_project(project_dir);
    ui::display_lint_report(&report);

    if report.is_success() {
        Ok(report)
    } else {
        Err(anyhow!("Linting failed with {} error(s)", report.failed.len()))
    }
}

/// Show one template, every template under a partial handle, or the whole
/// catalogue when no handle is given.
///
/// An unknown handle that is one close match away from a known one is
/// shown under the corrected handle.
pub fn run_info(handle: Option<&str>) -> Result<()> {
    let registry = Registry::load()?;
    let Some(handle) = handle else {
        ui::display_templates_by_domain(&registry.by_domain());
        return Ok(());
    };

    let vocabulary = registry.vocabulary();
    let resolved = if vocabulary.contains(handle) {
        handle.to_string()
    } else {
        let suggestion = suggest::suggest(handle, &vocabulary);
        match (suggestion.action, suggestion.unique()) {
            (SuggestAction::Use, Some(candidate)) => {
                ui::display_status(&format!(
                    "Unknown handle '{}'. Showing '{}' instead.",
                    handle, candidate
                ));
                candidate.to_string()
            }
            (SuggestAction::None, _) => {
                return Err(anyhow!("Unknown template handle '{}'", handle));
            }
            _ => return Err(anyhow!(ui::format_suggestion("handle", handle, &suggestion))),
        }
    };

    let prefix = Handle::parse(&resolved)?;
    for info in registry.matching(&prefix) {
        ui::display_template(info);
    }
    Ok(())
}

/// Print the catalogue grouped by domain
pub fn run_list() -> Result<()> {
    let registry = Registry::load()?;
    ui::display_templates_by_domain(&registry.by_domain());
    Ok(())
}

/// Report whether the project should be synced with its template
pub fn run_sync_check(project_dir: &Path) -> Result<SyncDecision> {
    let config = config::load_config(project_dir, None)?;
    let registry = Registry::load()?;

    if !config.sync.enabled {
        ui::display_warning(&TempletWarning::SyncDisabled);
    }

    let decision = sync::check_project(project_dir, &config, &registry)?;
    ui::display_sync_decision(&decision);
    Ok(decision)
}

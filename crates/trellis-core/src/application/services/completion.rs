//! Post-generation hook.
//!
//! Sort the manifest's dependencies, optionally install, optionally lint-fix
//! after a successful install, then summarise. Step failures are recorded in
//! the [`CompletionReport`] and logged; the hook itself never fails because
//! the project is already on disk.

use std::fmt;
use std::path::PathBuf;

use tracing::{error, info, instrument};

use crate::{
    application::ports::{CommandRunner, DependencySorter, Filesystem},
    domain::{AnswerValue, CompletionSettings},
    error::TrellisResult,
};

use super::generate_service::GenerationOutcome;

/// Answer that selects the package manager.
pub const AUTO_INSTALL: &str = "autoInstall";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    /// `npm`/`yarn` select a manager; anything else (including `false`)
    /// means no install.
    pub fn from_answer(value: &AnswerValue) -> Option<Self> {
        match value.as_str()? {
            "npm" => Some(Self::Npm),
            "yarn" => Some(Self::Yarn),
            _ => None,
        }
    }

    pub const fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }

    pub fn install_args(self) -> Vec<String> {
        vec!["install".into()]
    }

    pub fn lint_fix_args(self) -> Vec<String> {
        let args: &[&str] = match self {
            Self::Npm => &["run", "lint", "--", "--fix"],
            Self::Yarn => &["run", "lint", "--fix"],
        };
        args.iter().map(|s| s.to_string()).collect()
    }

    fn command_line(self, args: &[String]) -> String {
        format!("{} {}", self.program(), args.join(" "))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SortDependencies,
    Install,
    LintFix,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SortDependencies => "sort dependencies",
            Self::Install => "install dependencies",
            Self::LintFix => "lint fix",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// What the hook did and what the user should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub project_dir: PathBuf,
    pub steps: Vec<StepReport>,
    /// Shell commands, in order.
    pub next_steps: Vec<String>,
    pub docs_url: Option<String>,
}

impl CompletionReport {
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

pub struct CompletionHook {
    runner: Box<dyn CommandRunner>,
    sorter: Box<dyn DependencySorter>,
    filesystem: Box<dyn Filesystem>,
    skip_install: bool,
}

impl CompletionHook {
    pub fn new(
        runner: Box<dyn CommandRunner>,
        sorter: Box<dyn DependencySorter>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            runner,
            sorter,
            filesystem,
            skip_install: false,
        }
    }

    /// Never run the install (and therefore lint fix) step.
    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    #[instrument(skip_all, fields(root = %outcome.root.display(), run_id = %outcome.run_id))]
    pub fn run(&self, settings: &CompletionSettings, outcome: &GenerationOutcome) -> CompletionReport {
        let answers = &outcome.answers;
        let manager = answers
            .get(AUTO_INSTALL)
            .and_then(PackageManager::from_answer);
        let lint_wanted = settings.wants_lint_fix(answers);

        let sort = self.sort_step(settings, outcome);

        let install = match manager {
            None => StepOutcome::Skipped("not requested".into()),
            Some(_) if self.skip_install => StepOutcome::Skipped("--skip-install".into()),
            Some(pm) => self.command_step(Step::Install, pm, pm.install_args(), outcome),
        };

        let lint = match manager {
            _ if !lint_wanted => StepOutcome::Skipped("no lint style configured".into()),
            Some(pm) if install == StepOutcome::Done => {
                self.command_step(Step::LintFix, pm, pm.lint_fix_args(), outcome)
            }
            _ => StepOutcome::Skipped("dependencies not installed".into()),
        };

        let installed = install == StepOutcome::Done;
        let report = CompletionReport {
            project_dir: outcome.root.clone(),
            next_steps: next_steps(outcome, manager, installed, lint_wanted),
            docs_url: settings.docs_url.clone(),
            steps: vec![
                StepReport {
                    step: Step::SortDependencies,
                    outcome: sort,
                },
                StepReport {
                    step: Step::Install,
                    outcome: install,
                },
                StepReport {
                    step: Step::LintFix,
                    outcome: lint,
                },
            ],
        };

        for failure in report.failures() {
            if let StepOutcome::Failed(reason) = &failure.outcome {
                error!(step = %failure.step, %reason, "Completion step failed");
            }
        }
        report
    }

    fn sort_step(&self, settings: &CompletionSettings, outcome: &GenerationOutcome) -> StepOutcome {
        if !settings.sort_dependencies {
            return StepOutcome::Skipped("disabled".into());
        }
        let path = outcome.root.join(&settings.manifest);
        if !self.filesystem.exists(&path) {
            return StepOutcome::Skipped(format!("no {}", settings.manifest));
        }
        let sorted = || -> TrellisResult<()> {
            let content = self.filesystem.read_file(&path)?;
            let sorted = self.sorter.sort(&path, &content)?;
            self.filesystem.write_file(&path, &sorted)
        };
        match sorted() {
            Ok(()) => {
                info!(manifest = %path.display(), "Dependencies sorted");
                StepOutcome::Done
            }
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }

    fn command_step(
        &self,
        step: Step,
        pm: PackageManager,
        args: Vec<String>,
        outcome: &GenerationOutcome,
    ) -> StepOutcome {
        info!(%step, command = %pm.command_line(&args), "Running");
        match self.runner.run(pm.program(), &args, &outcome.root) {
            Ok(()) => StepOutcome::Done,
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }
}

fn next_steps(
    outcome: &GenerationOutcome,
    manager: Option<PackageManager>,
    installed: bool,
    lint_wanted: bool,
) -> Vec<String> {
    let pm = manager.unwrap_or(PackageManager::Npm);
    let mut steps = Vec::new();
    if !outcome.in_place {
        steps.push(format!("cd {}", outcome.dest_dir_name));
    }
    if !installed {
        steps.push(pm.command_line(&pm.install_args()));
        if lint_wanted {
            steps.push(pm.command_line(&pm.lint_fix_args()));
        }
    }
    steps.push(format!("{pm} run dev"));
    steps
}

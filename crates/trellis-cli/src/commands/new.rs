//! Implementation of `trellis new`.
//!
//! Resolves the destination and blueprint, gathers answers, then either
//! prints the plan (`--dry-run`) or writes the project and runs the
//! completion hook.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use trellis_adapters::{
    DefaultsFrontend, HandlebarsRenderer, InMemoryStore, JsonDependencySorter, LocalFilesystem,
    ProcessRunner, blueprint_loader, git_identity,
};
use trellis_core::{
    application::{
        BlueprintStore, CompletionHook, CompletionReport, GenerateRequest, GenerateService,
        GenerationPlan, PromptFrontend,
        services::{StepOutcome, Verdict},
    },
    domain::{AnswerStore, Blueprint},
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Where the project goes, and whether that is the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    pub in_place: bool,
}

#[instrument(skip_all, fields(dest = %args.destination.display()))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let destination = resolve_destination(&args.destination)?;
    let blueprint = resolve_blueprint(&args, &config)?;
    debug!(blueprint = %blueprint.name(), version = %blueprint.version(), "Blueprint resolved");

    let request = GenerateRequest::new(&destination.path)
        .in_place(destination.in_place)
        .scenario(args.scenario.clone())
        .force(args.force)
        .defaults(contextual_defaults(&destination, &config));

    let service = GenerateService::new(
        Box::new(HandlebarsRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );
    if !args.dry_run {
        service.check_destination(&request)?;
    }

    let plan = {
        let mut frontend = select_frontend(&args);
        service.plan(&blueprint, &request, frontend.as_mut())?
    };

    if args.dry_run {
        return print_plan(&plan, &destination, &output);
    }

    output.header(&format!(
        "Generating '{}' from {} {}",
        request.dest_dir_name(),
        blueprint.name(),
        blueprint.version()
    ))?;
    let outcome = service.generate(&blueprint, &request, &plan)?;
    output.success(&format!(
        "Wrote {} files to {}",
        outcome.written.len(),
        outcome.root.display()
    ))?;

    let hook = CompletionHook::new(
        Box::new(ProcessRunner::new()),
        Box::new(JsonDependencySorter::new()),
        Box::new(LocalFilesystem::new()),
    )
    .skip_install(args.skip_install || config.defaults.skip_install);
    let report = hook.run(&blueprint.completion, &outcome);
    info!(run_id = %outcome.run_id, failures = report.failures().count(), "Generation finished");

    print_report(&report, &global, &output)
}

/// `.` means the current directory, in place; anything else is used as is.
pub fn resolve_destination(arg: &Path) -> CliResult<Destination> {
    if arg == Path::new(".") {
        let cwd = std::env::current_dir()
            .with_cli_context(|| "Failed to read the current directory")?;
        return Ok(Destination {
            path: cwd,
            in_place: true,
        });
    }
    if arg.file_name().is_none() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' does not name a directory", arg.display()),
        });
    }
    Ok(Destination {
        path: arg.to_path_buf(),
        in_place: false,
    })
}

fn resolve_blueprint(args: &NewArgs, config: &AppConfig) -> CliResult<Blueprint> {
    if let Some(dir) = &args.from {
        return Ok(blueprint_loader::load_dir(dir)?);
    }
    let store = InMemoryStore::with_builtin(config.blueprints.local_path.as_deref())?;
    let name = args
        .blueprint
        .as_deref()
        .unwrap_or(&config.defaults.blueprint);
    Ok(store.get(name)?)
}

/// Defaults that depend on the environment rather than the blueprint.
///
/// The walker only uses one when the prompt accepts it.
pub fn contextual_defaults(destination: &Destination, config: &AppConfig) -> AnswerStore {
    let mut defaults = AnswerStore::new();
    if let Some(name) = destination.path.file_name() {
        defaults = defaults.with("name", name.to_string_lossy().into_owned());
    }
    if let Some(author) = git_identity() {
        defaults = defaults.with("author", author);
    }
    if let Some(pm) = &config.defaults.package_manager {
        defaults = defaults.with("autoInstall", pm.as_str());
    }
    defaults
}

/// Dialoguer on a terminal; defaults only for `--yes`, scenarios and pipes.
fn select_frontend(args: &NewArgs) -> Box<dyn PromptFrontend> {
    let interactive = !args.yes && args.scenario.is_none() && std::io::stdin().is_terminal();
    if !interactive {
        debug!("Using defaults-only front-end");
        return Box::new(DefaultsFrontend);
    }

    #[cfg(feature = "interactive")]
    {
        Box::new(crate::prompt::DialoguerFrontend::new())
    }
    #[cfg(not(feature = "interactive"))]
    {
        warn!("Built without the 'interactive' feature; using defaults");
        Box::new(DefaultsFrontend)
    }
}

fn print_plan(plan: &GenerationPlan, destination: &Destination, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: nothing written to {}",
        destination.path.display()
    ))?;

    output.header("Answers:")?;
    for (name, value) in plan.answers.iter() {
        output.detail(&format!("{name} = {value}"))?;
    }

    output.header("Files:")?;
    for decision in &plan.decisions {
        let line = match &decision.verdict {
            Verdict::Unfiltered => format!("+ {} (unfiltered)", decision.path),
            Verdict::Included { globs } => {
                format!("+ {} (included by {})", decision.path, globs.join(", "))
            }
            Verdict::Excluded { glob, predicate } => {
                format!("- {} (excluded by {glob}: {predicate})", decision.path)
            }
        };
        output.print(&format!("  {line}"))?;
    }

    output.print("")?;
    output.print(&format!(
        "{} of {} files would be written",
        plan.included().count(),
        plan.decisions.len()
    ))?;
    Ok(())
}

fn print_report(report: &CompletionReport, global: &GlobalArgs, output: &OutputManager) -> CliResult<()> {
    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Done => output.success(&format!("{} done", step.step))?,
            StepOutcome::Skipped(reason) => {
                if global.verbose > 0 {
                    output.detail(&format!("{} skipped: {reason}", step.step))?;
                }
            }
            StepOutcome::Failed(reason) => {
                warn!(step = %step.step, %reason, "Completion step failed");
                output.warning(&format!("{} failed: {reason}", step.step))?;
            }
        }
    }

    output.print("")?;
    output.header("Next steps:")?;
    for command in &report.next_steps {
        output.print(&format!("  {command}"))?;
    }
    if let Some(url) = &report.docs_url {
        output.print("")?;
        output.info(&format!("Documentation: {url}"))?;
    }
    Ok(())
}

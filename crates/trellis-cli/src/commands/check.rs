//! Implementation of `trellis check`.
//!
//! Loads a blueprint directory and reports what would silently misbehave at
//! generation time. Findings are warnings; only an unloadable blueprint fails.

use trellis_adapters::blueprint_loader;
use trellis_core::domain::{Blueprint, ForwardReference};

use crate::{
    cli::CheckArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One problem found in a loadable blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    ForwardReference(ForwardReference),
    DeadRule { glob: String },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForwardReference(r) if r.declared_later => write!(
                f,
                "prompt '{}' is shown based on '{}', which is asked later",
                r.prompt, r.identifier
            ),
            Self::ForwardReference(r) => write!(
                f,
                "prompt '{}' is shown based on '{}', which is never asked",
                r.prompt, r.identifier
            ),
            Self::DeadRule { glob } => write!(f, "filter '{glob}' matches no template file"),
        }
    }
}

pub fn execute(args: CheckArgs, output: OutputManager) -> CliResult<()> {
    let blueprint =
        blueprint_loader::load_dir(&args.dir).map_err(|source| CliError::InvalidBlueprint {
            path: args.dir.clone(),
            source,
        })?;

    output.header(&format!("{} {}", blueprint.name(), blueprint.version()))?;
    output.detail(&format!(
        "{} prompts, {} filters, {} template files",
        blueprint.schema.len(),
        blueprint.filters.len(),
        blueprint.tree.len()
    ))?;
    let scenarios = blueprint.scenario_names();
    if !scenarios.is_empty() {
        output.detail(&format!("scenarios: {}", scenarios.join(", ")))?;
    }

    let findings = findings(&blueprint);
    for finding in &findings {
        output.warning(&finding.to_string())?;
    }
    if findings.is_empty() {
        output.success("No problems found")?;
    } else {
        output.print(&format!("{} warning(s)", findings.len()))?;
    }
    Ok(())
}

pub fn findings(blueprint: &Blueprint) -> Vec<Finding> {
    let paths = blueprint.tree.paths();
    let forward = blueprint
        .schema
        .forward_references()
        .into_iter()
        .map(Finding::ForwardReference);
    let dead = blueprint
        .filters
        .dead_rules(paths.iter().map(String::as_str))
        .into_iter()
        .map(|rule| Finding::DeadRule {
            glob: rule.glob().to_string(),
        });
    forward.chain(dead).collect()
}

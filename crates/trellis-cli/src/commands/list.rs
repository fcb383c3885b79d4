//! Implementation of `trellis list`.

use serde_json::json;

use trellis_adapters::InMemoryStore;
use trellis_core::{application::BlueprintStore, domain::Blueprint};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = InMemoryStore::with_builtin(config.blueprints.local_path.as_deref())?;
    let blueprints = store.list()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Blueprints:")?;
            let width = blueprints.iter().map(|b| b.name().len()).max().unwrap_or(0);
            for blueprint in &blueprints {
                output.print(&format!(
                    "  {:<width$}  {:<8}  {}",
                    blueprint.name(),
                    blueprint.version(),
                    blueprint.metadata.description,
                ))?;
                let scenarios = blueprint.scenario_names();
                if !scenarios.is_empty() {
                    output.detail(&format!("scenarios: {}", scenarios.join(", ")))?;
                }
            }
        }
        ListFormat::List => {
            for blueprint in &blueprints {
                output.data(blueprint.name())?;
            }
        }
        ListFormat::Json => {
            output.data(&to_json(&blueprints))?;
        }
    }
    Ok(())
}

fn to_json(blueprints: &[Blueprint]) -> String {
    let entries: Vec<_> = blueprints
        .iter()
        .map(|b| {
            json!({
                "name": b.name(),
                "version": b.version(),
                "description": b.metadata.description,
                "prompts": b.schema.len(),
                "files": b.tree.len(),
                "scenarios": b.scenario_names(),
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

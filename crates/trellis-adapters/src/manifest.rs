//! `blueprint.toml` manifest types and their conversion into a [`Blueprint`].
//!
//! ```toml
//! [blueprint]
//! name        = "vue-starter"
//! version     = "1.4.0"
//! description = "Vue.js starter"     # optional
//!
//! [[prompts]]                        # declaration order is walk order
//! name     = "runner"
//! type     = "list"                  # string | confirm | list
//! when     = "isNotTest && unit"     # predicate string or boolean
//! message  = "Pick a test runner"    # defaults to the name
//! default  = "jest"                  # optional
//! required = false                   # optional
//! validate = "package-name"          # optional, string prompts only
//! choices  = [{ name = "Jest", value = "jest", short = "jest" }]
//!
//! [filters]
//! "test/unit/**/*" = "unit"
//!
//! [complete]
//! sort_dependencies = true
//! manifest          = "package.json"
//! lint_styles       = ["standard", "airbnb"]
//! docs_url          = "https://example.com"
//!
//! [scenarios.minimal]
//! name = "minimal"
//! lint = false
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use trellis_core::domain::{
    AnswerStore, AnswerValue, Blueprint, BlueprintMetadata, Choice, CompletionSettings,
    DomainError, FilterRule, FilterTable, Predicate, Prompt, PromptSchema, TemplateFile,
    TemplateTree, ValidationRule,
};

/// Deserialised `blueprint.toml`.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BlueprintManifest {
    pub blueprint: BlueprintSection,
    #[serde(default)]
    pub prompts: Vec<PromptEntry>,
    /// Glob → predicate. Order is irrelevant to the outcome.
    #[serde(default)]
    pub filters: BTreeMap<String, PredicateSource>,
    #[serde(default)]
    pub complete: CompleteSection,
    #[serde(default)]
    pub scenarios: BTreeMap<String, BTreeMap<String, AnswerValue>>,
}

/// `[blueprint]` section.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BlueprintSection {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub description: Option<String>,
}

fn default_version() -> String {
    "0.1.0".into()
}

/// One `[[prompts]]` entry.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PromptEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PromptType,
    pub message: Option<String>,
    pub when: Option<PredicateSource>,
    pub default: Option<AnswerValue>,
    #[serde(default)]
    pub required: bool,
    pub validate: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChoiceEntry>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    String,
    Confirm,
    List,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChoiceEntry {
    pub name: String,
    pub value: AnswerValue,
    pub short: Option<String>,
}

/// A `when`/filter value: `true`, `false` or an expression string.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum PredicateSource {
    Literal(bool),
    Expression(String),
}

impl PredicateSource {
    fn parse(&self) -> Result<Predicate, DomainError> {
        match self {
            Self::Literal(value) => Ok(Predicate::literal(*value)),
            Self::Expression(source) => Predicate::parse(source.as_str()),
        }
    }
}

/// `[complete]` section.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CompleteSection {
    #[serde(default = "yes")]
    pub sort_dependencies: bool,
    pub manifest: Option<String>,
    pub lint_styles: Option<Vec<String>>,
    pub docs_url: Option<String>,
}

fn yes() -> bool {
    true
}

impl Default for CompleteSection {
    fn default() -> Self {
        Self {
            sort_dependencies: true,
            manifest: None,
            lint_styles: None,
            docs_url: None,
        }
    }
}

impl BlueprintManifest {
    /// # Errors
    /// [`DomainError::InvalidBlueprint`] when the TOML does not match the format.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        toml::from_str(raw).map_err(|e| DomainError::InvalidBlueprint(e.to_string()))
    }

    /// Validate everything and attach the template files.
    ///
    /// Predicates and globs are parsed here, so a blueprint that loads never
    /// fails on them later.
    pub fn into_blueprint(self, files: Vec<TemplateFile>) -> Result<Blueprint, DomainError> {
        let schema = PromptSchema::new(
            self.prompts
                .into_iter()
                .map(PromptEntry::into_prompt)
                .collect::<Result<_, _>>()?,
        )?;

        let mut rules = Vec::with_capacity(self.filters.len());
        for (glob, source) in self.filters {
            let predicate = source.parse().map_err(|e| {
                DomainError::InvalidBlueprint(format!("filter '{glob}': {e}"))
            })?;
            rules.push(FilterRule::new(glob, predicate)?);
        }

        let defaults = CompletionSettings::default();
        let completion = CompletionSettings {
            sort_dependencies: self.complete.sort_dependencies,
            manifest: self.complete.manifest.unwrap_or(defaults.manifest),
            lint_styles: self.complete.lint_styles.unwrap_or(defaults.lint_styles),
            docs_url: self.complete.docs_url,
        };

        let metadata = BlueprintMetadata::new(self.blueprint.name)
            .version(self.blueprint.version)
            .description(self.blueprint.description.unwrap_or_default());

        let mut builder = Blueprint::builder(metadata)
            .schema(schema)
            .filters(FilterTable::new(rules))
            .completion(completion)
            .tree(TemplateTree::new(files));
        for (name, answers) in self.scenarios {
            builder = builder.scenario(name, answers.into_iter().collect::<AnswerStore>());
        }
        builder.build()
    }
}

impl PromptEntry {
    fn into_prompt(self) -> Result<Prompt, DomainError> {
        if self.kind != PromptType::List && !self.choices.is_empty() {
            return Err(DomainError::InvalidSchema(format!(
                "prompt '{}' declares choices but is not a list",
                self.name
            )));
        }
        let message = self.message.unwrap_or_else(|| self.name.clone());
        let mut prompt = match self.kind {
            PromptType::String => Prompt::string(&self.name, message),
            PromptType::Confirm => Prompt::confirm(&self.name, message),
            PromptType::List => Prompt::list(
                &self.name,
                message,
                self.choices
                    .into_iter()
                    .map(|c| Choice {
                        label: c.name,
                        value: c.value,
                        short: c.short,
                    })
                    .collect(),
            ),
        };
        if let Some(when) = &self.when {
            let predicate = when.parse().map_err(|e| {
                DomainError::InvalidBlueprint(format!("`when` of prompt '{}': {e}", self.name))
            })?;
            prompt = prompt.when(predicate);
        }
        if let Some(default) = self.default {
            prompt = prompt.default_value(default);
        }
        if self.required {
            prompt = prompt.required();
        }
        if let Some(rule) = &self.validate {
            prompt = prompt.validate(ValidationRule::parse(rule)?);
        }
        Ok(prompt)
    }
}

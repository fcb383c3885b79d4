// ============================================================================
// Blueprint aggregate
// ============================================================================

use std::collections::{BTreeMap, HashSet};

use crate::domain::{
    entities::{
        answers::{AnswerStore, IS_NOT_TEST},
        common::{Permissions, RelativePath},
        filter::{FilterTable, Inclusion},
        schema::PromptSchema,
    },
    error::DomainError,
    value_objects::AnswerValue,
};

/// A complete scaffolding definition: prompts, filters, completion settings,
/// test scenarios and the template tree.
///
/// ## Invariants (enforced by the builder)
///
/// 1. `metadata.name` is non-empty
/// 2. `tree` holds at least one file
/// 3. template paths are unique
///
/// A blueprint is immutable once built. Every generation run borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub metadata: BlueprintMetadata,
    pub schema: PromptSchema,
    pub filters: FilterTable,
    pub completion: CompletionSettings,
    pub scenarios: BTreeMap<String, AnswerStore>,
    pub tree: TemplateTree,
}

impl Blueprint {
    pub fn builder(metadata: BlueprintMetadata) -> BlueprintBuilder {
        BlueprintBuilder {
            metadata,
            schema: PromptSchema::default(),
            filters: FilterTable::default(),
            completion: CompletionSettings::default(),
            scenarios: BTreeMap::new(),
            tree: TemplateTree::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn scenario_names(&self) -> Vec<String> {
        self.scenarios.keys().cloned().collect()
    }

    /// The store a run starts from.
    ///
    /// Without a scenario this is `{isNotTest: true}`. With one, `isNotTest`
    /// is `false` and the scenario's answers are pre-supplied.
    ///
    /// # Errors
    /// [`DomainError::UnknownScenario`] if the name is not declared.
    pub fn seed_answers(&self, scenario: Option<&str>) -> Result<AnswerStore, DomainError> {
        match scenario {
            None => Ok(AnswerStore::new().with(IS_NOT_TEST, true)),
            Some(name) => {
                let preset = self.scenarios.get(name).ok_or_else(|| {
                    DomainError::UnknownScenario {
                        name: name.to_string(),
                        available: self.scenario_names(),
                    }
                })?;
                let mut seed = AnswerStore::new().with(IS_NOT_TEST, false);
                seed.merge_missing(preset);
                Ok(seed)
            }
        }
    }

    /// Filter decision for every template file, in tree order.
    pub fn decide_all<'a>(
        &'a self,
        answers: &AnswerStore,
    ) -> Vec<(&'a TemplateFile, Inclusion<'a>)> {
        self.tree
            .files()
            .map(|file| (file, self.filters.decide(&file.path.to_slash(), answers)))
            .collect()
    }

    /// The template files that survive filtering.
    pub fn surviving_files(&self, answers: &AnswerStore) -> Vec<&TemplateFile> {
        self.decide_all(answers)
            .into_iter()
            .filter(|(_, inclusion)| inclusion.is_included())
            .map(|(file, _)| file)
            .collect()
    }
}

pub struct BlueprintBuilder {
    metadata: BlueprintMetadata,
    schema: PromptSchema,
    filters: FilterTable,
    completion: CompletionSettings,
    scenarios: BTreeMap<String, AnswerStore>,
    tree: TemplateTree,
}

impl BlueprintBuilder {
    pub fn schema(mut self, schema: PromptSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn filters(mut self, filters: FilterTable) -> Self {
        self.filters = filters;
        self
    }

    pub fn completion(mut self, completion: CompletionSettings) -> Self {
        self.completion = completion;
        self
    }

    pub fn scenario(mut self, name: impl Into<String>, answers: AnswerStore) -> Self {
        self.scenarios.insert(name.into(), answers);
        self
    }

    pub fn file(mut self, file: TemplateFile) -> Self {
        self.tree.files.push(file);
        self
    }

    pub fn tree(mut self, tree: TemplateTree) -> Self {
        self.tree = tree;
        self
    }

    /// # Errors
    /// - [`DomainError::InvalidBlueprint`] for an empty name
    /// - [`DomainError::EmptyBlueprint`] for an empty tree
    /// - [`DomainError::DuplicatePath`] for repeated template paths
    pub fn build(self) -> Result<Blueprint, DomainError> {
        if self.metadata.name.trim().is_empty() {
            return Err(DomainError::InvalidBlueprint(
                "blueprint name cannot be empty".into(),
            ));
        }
        if self.tree.is_empty() {
            return Err(DomainError::EmptyBlueprint {
                name: self.metadata.name,
            });
        }
        let mut seen = HashSet::new();
        for file in self.tree.files() {
            let path = file.path.to_slash();
            if !seen.insert(path.clone()) {
                return Err(DomainError::DuplicatePath { path });
            }
        }
        Ok(Blueprint {
            metadata: self.metadata,
            schema: self.schema,
            filters: self.filters,
            completion: self.completion,
            scenarios: self.scenarios,
            tree: self.tree,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintMetadata {
    pub name: String,
    /// Exposed to templates through `template_version`.
    pub version: String,
    pub description: String,
}

impl BlueprintMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".into(),
            description: String::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// How the completion hook behaves for this blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSettings {
    pub sort_dependencies: bool,
    /// Manifest whose dependency maps are sorted.
    pub manifest: String,
    /// `lintConfig` values that get an automatic lint fix after install.
    pub lint_styles: Vec<String>,
    pub docs_url: Option<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            sort_dependencies: true,
            manifest: "package.json".into(),
            lint_styles: vec!["standard".into(), "airbnb".into()],
            docs_url: None,
        }
    }
}

impl CompletionSettings {
    /// `true` if the answers ask for a lint fix after install.
    pub fn wants_lint_fix(&self, answers: &AnswerStore) -> bool {
        answers.is_truthy("lint")
            && answers
                .text("lintConfig")
                .is_some_and(|style| self.lint_styles.iter().any(|s| s == style))
    }
}

/// The files a blueprint can emit, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    files: Vec<TemplateFile>,
}

impl TemplateTree {
    pub fn new(files: Vec<TemplateFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> impl Iterator<Item = &TemplateFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.to_slash()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: RelativePath,
    /// Handlebars source.
    pub content: String,
    pub permissions: Permissions,
}

impl TemplateFile {
    pub fn new(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
            permissions: Permissions::regular(),
        }
    }

    pub fn executable(mut self) -> Self {
        self.permissions = Permissions::executable();
        self
    }
}

/// Values available to every rendered template besides the answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub answers: AnswerStore,
    /// Final path segment of the destination.
    pub dest_dir_name: String,
    pub in_place: bool,
    /// Version stamped by `template_version`.
    pub template_version: String,
}

impl RenderContext {
    pub fn new(answers: AnswerStore, dest_dir_name: impl Into<String>) -> Self {
        Self {
            answers,
            dest_dir_name: dest_dir_name.into(),
            in_place: false,
            template_version: String::new(),
        }
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn template_version(mut self, version: impl Into<String>) -> Self {
        self.template_version = version.into();
        self
    }

    /// `isNotTest` as rendered; missing means a real run.
    pub fn is_not_test(&self) -> bool {
        !self.answers.is_test_run()
    }

    pub fn answer(&self, name: &str) -> Option<&AnswerValue> {
        self.answers.get(name)
    }
}

//! Resolves the prompt schema into an answer store.

use tracing::{debug, instrument, trace, warn};

use crate::{
    application::ports::PromptFrontend,
    domain::{AnswerStore, AnswerValue, DomainError, Prompt, PromptKind, PromptSchema},
    error::TrellisResult,
};

/// Walks a schema in declaration order.
///
/// For each prompt:
/// 1. an answer already in the store (scenario, earlier seed) is checked
///    against the prompt and kept;
/// 2. a prompt whose `when` is false is skipped and stays absent;
/// 3. otherwise the front-end is asked, with the default presented.
///
/// Empty input falls back to the default. A required prompt that still has
/// no value stops the walk with [`DomainError::MissingRequiredAnswer`].
pub struct PromptWalker<'s> {
    schema: &'s PromptSchema,
    /// Contextual defaults from the driver; these win over schema defaults.
    overrides: AnswerStore,
}

impl<'s> PromptWalker<'s> {
    pub fn new(schema: &'s PromptSchema) -> Self {
        Self {
            schema,
            overrides: AnswerStore::new(),
        }
    }

    pub fn with_defaults(mut self, overrides: AnswerStore) -> Self {
        self.overrides = overrides;
        self
    }

    /// The default presented for `prompt`.
    ///
    /// Overrides that the prompt would not accept (a configured package
    /// manager missing from the choices, say) are ignored.
    pub fn default_for(&self, prompt: &Prompt) -> Option<AnswerValue> {
        self.overrides
            .get(&prompt.name)
            .filter(|value| prompt.accepts(value))
            .cloned()
            .or_else(|| prompt.fallback())
    }

    #[instrument(skip_all, fields(prompts = self.schema.len()))]
    pub fn walk(
        &self,
        seed: AnswerStore,
        mut frontend: impl PromptFrontend,
    ) -> TrellisResult<AnswerStore> {
        let mut answers = seed;

        for reference in self.schema.forward_references() {
            warn!(
                prompt = %reference.prompt,
                identifier = %reference.identifier,
                "`when` references a prompt that is not answered yet; it will read as false"
            );
        }

        for prompt in self.schema {
            if let Some(preset) = answers.get(&prompt.name) {
                prompt.accept(preset.clone())?;
                debug!(prompt = %prompt.name, value = %preset, "Using pre-supplied answer");
                continue;
            }

            if !prompt.is_visible(&answers) {
                trace!(prompt = %prompt.name, when = %prompt.when, "Skipped");
                continue;
            }

            let default = self.default_for(prompt);
            let given = frontend
                .ask(prompt, default.as_ref())?
                .filter(|value| !value.is_blank());

            let value = match given.or(default) {
                Some(value) => value,
                None if prompt.required => {
                    return Err(DomainError::MissingRequiredAnswer {
                        prompt: prompt.name.clone(),
                    }
                    .into());
                }
                None if prompt.kind == PromptKind::String => AnswerValue::Text(String::new()),
                None => continue,
            };

            let value = prompt.accept(value)?;
            debug!(prompt = %prompt.name, value = %value, "Answered");
            answers.record(prompt.name.clone(), value)?;
        }

        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::domain::{Choice, IS_NOT_TEST, Predicate, ValidationRule};
    use crate::error::TrellisError;

    /// Answers by prompt name, records what was asked.
    #[derive(Default)]
    struct Script {
        replies: HashMap<String, Option<AnswerValue>>,
        asked: Vec<String>,
        presented: Vec<(String, Option<AnswerValue>)>,
    }

    impl Script {
        fn reply(mut self, name: &str, value: impl Into<AnswerValue>) -> Self {
            self.replies.insert(name.into(), Some(value.into()));
            self
        }
    }

    impl PromptFrontend for Script {
        fn ask(
            &mut self,
            prompt: &Prompt,
            default: Option<&AnswerValue>,
        ) -> TrellisResult<Option<AnswerValue>> {
            self.asked.push(prompt.name.clone());
            self.presented.push((prompt.name.clone(), default.cloned()));
            Ok(self.replies.get(&prompt.name).cloned().flatten())
        }
    }

    fn when(source: &str) -> Predicate {
        Predicate::parse(source).unwrap()
    }

    fn vue_schema() -> PromptSchema {
        PromptSchema::new(vec![
            Prompt::string("name", "Project name")
                .when(when("isNotTest"))
                .required()
                .validate(ValidationRule::PackageName),
            Prompt::string("description", "Project description")
                .when(when("isNotTest"))
                .default_value("A Vue.js project"),
            Prompt::string("author", "Author").when(when("isNotTest")),
            Prompt::confirm("isAuth", "Add the auth module?").when(when("isNotTest")),
            Prompt::confirm("isVuexStore", "Add Vuex?").when(when("isNotTest && !isAuth")),
            Prompt::confirm("unit", "Set up unit tests?")
                .when(when("isNotTest"))
                .default_value(false),
            Prompt::list(
                "runner",
                "Pick a test runner",
                vec![
                    Choice::new("none", "noTest"),
                    Choice::new("Jest", "jest"),
                    Choice::new("Karma and Mocha", "karma"),
                ],
            )
            .when(when("isNotTest && unit")),
        ])
        .unwrap()
    }

    fn real_run() -> AnswerStore {
        AnswerStore::new().with(IS_NOT_TEST, true)
    }

    #[test]
    fn later_prompts_see_earlier_answers() {
        let schema = vue_schema();
        let mut script = Script::default()
            .reply("name", "my-app")
            .reply("isAuth", true)
            .reply("unit", true)
            .reply("runner", "jest");
        let answers = PromptWalker::new(&schema)
            .walk(real_run(), &mut script)
            .unwrap();

        assert!(!script.asked.contains(&"isVuexStore".to_string()));
        assert!(answers.get("isVuexStore").is_none());
        assert_eq!(answers.text("runner"), Some("jest"));
    }

    #[test]
    fn hidden_prompts_contribute_nothing() {
        let schema = vue_schema();
        let mut script = Script::default().reply("name", "my-app");
        let answers = PromptWalker::new(&schema)
            .walk(real_run(), &mut script)
            .unwrap();
        assert!(!answers.contains("runner"));
        assert_eq!(answers.get("unit"), Some(&AnswerValue::Bool(false)));
    }

    #[test]
    fn empty_input_takes_the_default() {
        let schema = vue_schema();
        let mut script = Script::default().reply("name", "my-app").reply("description", "  ");
        let answers = PromptWalker::new(&schema)
            .walk(real_run(), &mut script)
            .unwrap();
        assert_eq!(answers.text("description"), Some("A Vue.js project"));
        assert_eq!(answers.get("isAuth"), Some(&AnswerValue::Bool(true)));
        assert_eq!(answers.text("author"), Some(""));
    }

    #[test]
    fn missing_required_answer_stops_the_walk() {
        let schema = vue_schema();
        let mut script = Script::default();
        let err = PromptWalker::new(&schema)
            .walk(real_run(), &mut script)
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Domain(DomainError::MissingRequiredAnswer { prompt }) if prompt == "name"
        ));
        assert_eq!(script.asked, vec!["name"]);
    }

    #[test]
    fn contextual_default_satisfies_required() {
        let schema = vue_schema();
        let mut script = Script::default();
        let answers = PromptWalker::new(&schema)
            .with_defaults(AnswerStore::new().with("name", "from-dir"))
            .walk(real_run(), &mut script)
            .unwrap();
        assert_eq!(answers.text("name"), Some("from-dir"));
        assert_eq!(
            script.presented[0],
            ("name".to_string(), Some(AnswerValue::from("from-dir")))
        );
    }

    #[test]
    fn unacceptable_override_falls_back() {
        let schema = vue_schema();
        let walker = PromptWalker::new(&schema)
            .with_defaults(AnswerStore::new().with("runner", "mocha"));
        let runner = schema.get("runner").unwrap();
        assert_eq!(walker.default_for(runner), Some(AnswerValue::from("noTest")));
    }

    #[test]
    fn invalid_answer_is_rejected() {
        let schema = vue_schema();
        let mut script = Script::default().reply("name", "Not Valid");
        let err = PromptWalker::new(&schema)
            .walk(real_run(), &mut script)
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Domain(DomainError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_mode_never_asks() {
        let schema = vue_schema();
        let seed = AnswerStore::new()
            .with(IS_NOT_TEST, false)
            .with("name", "test")
            .with("isAuth", true);
        let mut script = Script::default();
        let answers = PromptWalker::new(&schema)
            .walk(seed.clone(), &mut script)
            .unwrap();
        assert!(script.asked.is_empty());
        assert_eq!(answers, seed);
    }

    #[test]
    fn test_mode_is_idempotent() {
        let schema = vue_schema();
        let seed = AnswerStore::new()
            .with(IS_NOT_TEST, false)
            .with("name", "test")
            .with("unit", true)
            .with("runner", "karma");
        let walker = PromptWalker::new(&schema);
        let first = walker.walk(seed.clone(), Script::default()).unwrap();
        let second = walker.walk(seed, Script::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn forward_reference_reads_false_during_the_walk() {
        let schema = PromptSchema::new(vec![
            Prompt::confirm("docs", "Docs?").when(when("wiki")),
            Prompt::confirm("wiki", "Wiki?"),
        ])
        .unwrap();
        assert_eq!(schema.forward_references().len(), 1);

        let mut script = Script::default().reply("docs", true).reply("wiki", true);
        let answers = PromptWalker::new(&schema)
            .walk(real_run(), &mut script)
            .unwrap();
        assert_eq!(script.asked, ["wiki"]);
        assert!(!answers.contains("docs"));
        assert!(answers.is_truthy("wiki"));
    }

    #[test]
    fn bad_preset_is_rejected() {
        let schema = vue_schema();
        let seed = AnswerStore::new()
            .with(IS_NOT_TEST, false)
            .with("runner", "mocha");
        let err = PromptWalker::new(&schema)
            .walk(seed, Script::default())
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Domain(DomainError::InvalidChoice { .. })
        ));
    }
}

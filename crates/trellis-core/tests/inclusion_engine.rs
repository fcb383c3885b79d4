//! End-to-end checks of answers -> prompts -> filters through the public API.

use trellis_core::{
    application::{PromptFrontend, PromptWalker},
    domain::{
        AnswerStore, AnswerValue, Choice, DomainError, FilterRule, FilterTable, IS_NOT_TEST,
        Predicate, Prompt, PromptSchema,
    },
    error::{TrellisError, TrellisResult},
};

struct NoInput;

impl PromptFrontend for NoInput {
    fn ask(&mut self, _: &Prompt, _: Option<&AnswerValue>) -> TrellisResult<Option<AnswerValue>> {
        Ok(None)
    }
}

fn when(source: &str) -> Predicate {
    Predicate::parse(source).unwrap()
}

fn vue_filters() -> Vec<FilterRule> {
    [
        (".eslintrc.js", "lint"),
        (".eslintignore", "lint"),
        ("test/unit/**/*", "unit"),
        ("test/unit/index.js", "unit && runner === 'karma'"),
        ("test/unit/jest.conf.js", "unit && runner === 'jest'"),
        ("test/unit/karma.conf.js", "unit && runner === 'karma'"),
        ("src/modules/auth/**/*", "isAuth"),
        ("src/vuex/**/*", "isAuth || isVuexStore"),
    ]
    .into_iter()
    .map(|(glob, predicate)| FilterRule::new(glob, when(predicate)).unwrap())
    .collect()
}

const PATHS: [&str; 8] = [
    ".eslintrc.js",
    "src/main.js",
    "src/modules/auth/index.js",
    "src/vuex/app/index.js",
    "test/unit/index.js",
    "test/unit/jest.conf.js",
    "test/unit/karma.conf.js",
    "test/unit/specs/Home.spec.js",
];

#[test]
fn auth_alone_keeps_the_store() {
    let table = FilterTable::new(vue_filters());
    let answers = AnswerStore::new()
        .with(IS_NOT_TEST, false)
        .with("isAuth", true);

    assert!(table.includes("src/modules/auth/index.js", &answers));
    assert!(table.includes("src/vuex/app/index.js", &answers));
    assert!(table.includes("src/main.js", &answers));
}

#[test]
fn jest_runner_selects_its_files() {
    let table = FilterTable::new(vue_filters());
    let answers = AnswerStore::new().with("unit", true).with("runner", "jest");

    assert!(table.includes("test/unit/jest.conf.js", &answers));
    assert!(table.includes("test/unit/specs/Home.spec.js", &answers));
    assert!(!table.includes("test/unit/karma.conf.js", &answers));
    assert!(!table.includes("test/unit/index.js", &answers));
}

#[test]
fn lint_off_drops_eslint_files() {
    let table = FilterTable::new(vue_filters());
    let answers = AnswerStore::new().with("lint", false);
    assert!(!table.includes(".eslintrc.js", &answers));
    assert!(!table.includes(".eslintignore", &answers));
}

#[test]
fn rule_order_does_not_change_decisions() {
    let forward = FilterTable::new(vue_filters());
    let mut reversed_rules = vue_filters();
    reversed_rules.reverse();
    let reversed = FilterTable::new(reversed_rules);

    let answer_sets = [
        AnswerStore::new(),
        AnswerStore::new().with("unit", true).with("runner", "karma"),
        AnswerStore::new().with("unit", true).with("runner", "jest").with("lint", true),
        AnswerStore::new().with("isVuexStore", true),
    ];
    for answers in &answer_sets {
        for path in PATHS {
            assert_eq!(
                forward.includes(path, answers),
                reversed.includes(path, answers),
                "{path} with {answers:?}"
            );
        }
    }
}

fn schema() -> PromptSchema {
    PromptSchema::new(vec![
        Prompt::string("name", "Project name")
            .when(when("isNotTest"))
            .required(),
        Prompt::confirm("unit", "Unit tests?").when(when("isNotTest")),
        Prompt::list(
            "runner",
            "Runner",
            vec![Choice::new("Jest", "jest"), Choice::new("Karma", "karma")],
        )
        .when(when("isNotTest && unit")),
    ])
    .unwrap()
}

#[test]
fn walking_twice_gives_the_same_answers() {
    let schema = schema();
    let seed = AnswerStore::new()
        .with(IS_NOT_TEST, true)
        .with("name", "shop");

    let first = PromptWalker::new(&schema).walk(seed.clone(), NoInput).unwrap();
    let second = PromptWalker::new(&schema).walk(seed, NoInput).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.text("runner"), Some("jest"));
    assert!(first.is_truthy("unit"));
}

#[test]
fn test_runs_skip_gated_prompts() {
    let schema = schema();
    let answers = PromptWalker::new(&schema)
        .walk(AnswerStore::new().with(IS_NOT_TEST, false), NoInput)
        .unwrap();
    assert!(answers.is_test_run());
    assert!(!answers.contains("name"));
    assert!(!answers.contains("runner"));
}

#[test]
fn missing_required_answer_stops_the_walk() {
    let schema = schema();
    let err = PromptWalker::new(&schema)
        .walk(AnswerStore::new().with(IS_NOT_TEST, true), NoInput)
        .unwrap_err();
    assert!(matches!(
        err,
        TrellisError::Domain(DomainError::MissingRequiredAnswer { prompt }) if prompt == "name"
    ));
}

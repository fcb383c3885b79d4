//! Generate Service - main application orchestrator.
//!
//! 1. Seed the answer store (real run or named scenario)
//! 2. Walk the prompt schema
//! 3. Apply the filter table
//! 4. Render the surviving files and write them, rolling back on failure
//!
//! The completion hook runs afterwards, see [`super::completion`].

use std::path::{Path, PathBuf};

use tracing::{info, info_span, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, PromptFrontend, TemplateRenderer},
        services::prompt_walker::PromptWalker,
    },
    domain::{AnswerStore, Blueprint, Inclusion, ProjectStructure, RenderContext},
    error::TrellisResult,
};

/// What to generate and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub destination: PathBuf,
    /// Generating into the current directory (`trellis new .`).
    pub in_place: bool,
    pub scenario: Option<String>,
    /// Write into a non-empty destination.
    pub force: bool,
    /// Contextual defaults (`name`, `author`, configured package manager).
    pub defaults: AnswerStore,
}

impl GenerateRequest {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            in_place: false,
            scenario: None,
            force: false,
            defaults: AnswerStore::new(),
        }
    }

    pub fn in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    pub fn scenario(mut self, scenario: Option<String>) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn defaults(mut self, defaults: AnswerStore) -> Self {
        self.defaults = defaults;
        self
    }

    /// Final path segment of the destination.
    pub fn dest_dir_name(&self) -> String {
        self.destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }
}

/// Filter verdict for one template file, detached from the blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Unfiltered,
    Included { globs: Vec<String> },
    Excluded { glob: String, predicate: String },
}

impl Verdict {
    pub fn is_included(&self) -> bool {
        !matches!(self, Self::Excluded { .. })
    }
}

impl From<Inclusion<'_>> for Verdict {
    fn from(inclusion: Inclusion<'_>) -> Self {
        match inclusion {
            Inclusion::Unfiltered => Self::Unfiltered,
            Inclusion::Included { matched } => Self::Included {
                globs: matched.iter().map(|r| r.glob().to_string()).collect(),
            },
            Inclusion::Excluded { rule } => Self::Excluded {
                glob: rule.glob().to_string(),
                predicate: rule.predicate().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDecision {
    pub path: String,
    pub verdict: Verdict,
}

/// Answers plus the per-file decisions they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub answers: AnswerStore,
    pub decisions: Vec<FileDecision>,
}

impl GenerationPlan {
    pub fn included(&self) -> impl Iterator<Item = &FileDecision> {
        self.decisions.iter().filter(|d| d.verdict.is_included())
    }

    pub fn excluded(&self) -> impl Iterator<Item = &FileDecision> {
        self.decisions.iter().filter(|d| !d.verdict.is_included())
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub run_id: Uuid,
    pub root: PathBuf,
    pub dest_dir_name: String,
    pub in_place: bool,
    pub answers: AnswerStore,
    /// Absolute paths of every file written.
    pub written: Vec<PathBuf>,
}

pub struct GenerateService {
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
}

impl GenerateService {
    pub fn new(renderer: Box<dyn TemplateRenderer>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Refuse a non-empty destination unless `force` is set.
    pub fn check_destination(&self, request: &GenerateRequest) -> TrellisResult<()> {
        if request.force || self.filesystem.is_empty_dir(&request.destination)? {
            return Ok(());
        }
        Err(ApplicationError::ProjectExists {
            path: request.destination.clone(),
        }
        .into())
    }

    /// Resolve answers and decide every file, without touching the disk.
    #[instrument(skip_all, fields(blueprint = %blueprint.name(), scenario = ?request.scenario))]
    pub fn plan(
        &self,
        blueprint: &Blueprint,
        request: &GenerateRequest,
        frontend: impl PromptFrontend,
    ) -> TrellisResult<GenerationPlan> {
        let seed = blueprint.seed_answers(request.scenario.as_deref())?;
        let answers = PromptWalker::new(&blueprint.schema)
            .with_defaults(request.defaults.clone())
            .walk(seed, frontend)?;

        let decisions = blueprint
            .decide_all(&answers)
            .into_iter()
            .map(|(file, inclusion)| FileDecision {
                path: file.path.to_slash(),
                verdict: inclusion.into(),
            })
            .collect::<Vec<_>>();

        info!(
            answers = answers.len(),
            included = decisions.iter().filter(|d| d.verdict.is_included()).count(),
            total = decisions.len(),
            "Plan ready"
        );
        Ok(GenerationPlan { answers, decisions })
    }

    /// Render and write the files the plan keeps.
    pub fn generate(
        &self,
        blueprint: &Blueprint,
        request: &GenerateRequest,
        plan: &GenerationPlan,
    ) -> TrellisResult<GenerationOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("generate", %run_id, blueprint = %blueprint.name());
        let _guard = span.enter();

        self.check_destination(request)?;

        let files = blueprint.surviving_files(&plan.answers);
        let context = RenderContext::new(plan.answers.clone(), request.dest_dir_name())
            .in_place(request.in_place)
            .template_version(blueprint.version());

        let structure = self
            .renderer
            .render(&files, &context, &request.destination)?;
        structure.validate()?;

        let written = self.write_structure(&structure)?;
        info!(files = written.len(), root = %request.destination.display(), "Project written");

        Ok(GenerationOutcome {
            run_id,
            root: request.destination.clone(),
            dest_dir_name: request.dest_dir_name(),
            in_place: request.in_place,
            answers: plan.answers.clone(),
            written,
        })
    }

    /// [`plan`](Self::plan) followed by [`generate`](Self::generate).
    pub fn run(
        &self,
        blueprint: &Blueprint,
        request: &GenerateRequest,
        frontend: impl PromptFrontend,
    ) -> TrellisResult<GenerationOutcome> {
        self.check_destination(request)?;
        let plan = self.plan(blueprint, request, frontend)?;
        self.generate(blueprint, request, &plan)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Write with rollback on failure.
    fn write_structure(&self, structure: &ProjectStructure) -> TrellisResult<Vec<PathBuf>> {
        let created_root = !self.filesystem.exists(structure.root());
        let mut written = Vec::new();

        match self.write_all(structure, &mut written) {
            Ok(()) => Ok(written),
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(structure.root(), created_root, &written);
                Err(e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure, written: &mut Vec<PathBuf>) -> TrellisResult<()> {
        self.filesystem.create_dir_all(structure.root())?;

        for file in structure.files() {
            let path = structure.root().join(&file.path);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, &file.content)?;
            written.push(path.clone());

            if file.permissions.is_executable() {
                self.filesystem.set_permissions(&path, true)?;
            }
        }
        Ok(())
    }

    /// Best-effort: remove the root we created, or only our files otherwise.
    fn rollback(&self, root: &Path, created_root: bool, written: &[PathBuf]) {
        let result = if created_root {
            self.filesystem.remove_dir_all(root)
        } else {
            written
                .iter()
                .try_for_each(|path| self.filesystem.remove_file(path))
        };
        match result {
            Ok(()) => info!("Rollback successful"),
            Err(e) => warn!(error = %e, path = %root.display(), "Rollback failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{
        BlueprintMetadata, FilterRule, FilterTable, Permissions, Predicate, Prompt, PromptSchema,
        RelativePath, TemplateFile,
    };
    use crate::error::TrellisError;

    /// Copies template sources verbatim.
    struct Verbatim;

    impl TemplateRenderer for Verbatim {
        fn render(
            &self,
            files: &[&TemplateFile],
            _context: &RenderContext,
            output_root: &Path,
        ) -> TrellisResult<ProjectStructure> {
            let mut structure = ProjectStructure::new(output_root);
            for file in files {
                structure.add_file(file.path.as_path(), file.content.clone(), file.permissions);
            }
            Ok(structure)
        }
    }

    struct NoQuestions;

    impl PromptFrontend for NoQuestions {
        fn ask(
            &mut self,
            prompt: &Prompt,
            _default: Option<&crate::domain::AnswerValue>,
        ) -> TrellisResult<Option<crate::domain::AnswerValue>> {
            panic!("unexpected prompt {}", prompt.name)
        }
    }

    fn blueprint() -> Blueprint {
        let file = |p: &str| TemplateFile::new(RelativePath::try_new(p).unwrap(), p);
        Blueprint::builder(BlueprintMetadata::new("mini"))
            .schema(
                PromptSchema::new(vec![
                    Prompt::confirm("lint", "Lint?").when(Predicate::parse("isNotTest").unwrap()),
                ])
                .unwrap(),
            )
            .filters(FilterTable::new(vec![
                FilterRule::new(".eslintrc.js", Predicate::parse("lint").unwrap()).unwrap(),
            ]))
            .scenario("bare", AnswerStore::new().with("lint", false))
            .file(file("package.json"))
            .file(file(".eslintrc.js"))
            .file(file("build/build.js").executable())
            .build()
            .unwrap()
    }

    #[test]
    fn plan_records_each_decision() {
        let service = GenerateService::new(Box::new(Verbatim), Box::new(MockFilesystem::new()));
        let request = GenerateRequest::new("/out/app").scenario(Some("bare".into()));
        let plan = service.plan(&blueprint(), &request, NoQuestions).unwrap();

        assert_eq!(plan.included().count(), 2);
        let excluded: Vec<_> = plan.excluded().collect();
        assert_eq!(excluded.len(), 1);
        assert_eq!(
            excluded[0].verdict,
            Verdict::Excluded {
                glob: ".eslintrc.js".into(),
                predicate: "lint".into()
            }
        );
    }

    #[test]
    fn existing_destination_is_refused_without_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_empty_dir().returning(|_| Ok(false));
        let service = GenerateService::new(Box::new(Verbatim), Box::new(fs));

        let err = service
            .check_destination(&GenerateRequest::new("/out/app"))
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::ProjectExists { .. })
        ));
        assert!(
            service
                .check_destination(&GenerateRequest::new("/out/app").force(true))
                .is_ok()
        );
    }

    #[test]
    fn writes_surviving_files_and_marks_executables() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_empty_dir().returning(|_| Ok(true));
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/out/app/package.json")), always())
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/out/app/build/build.js")), always())
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_set_permissions()
            .with(eq(Path::new("/out/app/build/build.js")), eq(true))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = GenerateService::new(Box::new(Verbatim), Box::new(fs));
        let request = GenerateRequest::new("/out/app").scenario(Some("bare".into()));
        let outcome = service.run(&blueprint(), &request, NoQuestions).unwrap();

        assert_eq!(outcome.dest_dir_name, "app");
        assert_eq!(outcome.written.len(), 2);
        assert!(outcome.answers.is_test_run());
    }

    #[test]
    fn failed_write_removes_created_root() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_empty_dir().returning(|_| Ok(true));
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all()
            .with(eq(Path::new("/out/app")))
            .times(1)
            .returning(|_| Ok(()));

        let service = GenerateService::new(Box::new(Verbatim), Box::new(fs));
        let request = GenerateRequest::new("/out/app").scenario(Some("bare".into()));
        assert!(service.run(&blueprint(), &request, NoQuestions).is_err());
    }

    #[test]
    fn failed_write_in_existing_dir_removes_only_written_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_empty_dir().returning(|_| Ok(true));
        fs.expect_exists().returning(|_| true);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/work/package.json")), always())
            .returning(|_, _| Ok(()));
        fs.expect_write_file()
            .with(eq(Path::new("/work/build/build.js")), always())
            .returning(|path, _| {
                Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "denied".into(),
                }
                .into())
            });
        fs.expect_remove_file()
            .with(eq(Path::new("/work/package.json")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_remove_dir_all().never();

        let service = GenerateService::new(Box::new(Verbatim), Box::new(fs));
        let request = GenerateRequest::new("/work")
            .in_place(true)
            .scenario(Some("bare".into()));
        assert!(service.run(&blueprint(), &request, NoQuestions).is_err());
    }

    #[test]
    fn permissions_survive_rendering() {
        let bp = blueprint();
        let files = bp.surviving_files(&AnswerStore::new().with("lint", true));
        let ctx = RenderContext::new(AnswerStore::new(), "app");
        let structure = Verbatim.render(&files, &ctx, Path::new("/out")).unwrap();
        let exec: Vec<_> = structure
            .files()
            .filter(|f| f.permissions == Permissions::executable())
            .collect();
        assert_eq!(exec.len(), 1);
    }
}

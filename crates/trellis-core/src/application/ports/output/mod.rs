//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::domain::{Blueprint, ProjectStructure, RenderContext, TemplateFile};
use crate::error::TrellisResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `trellis_adapters::filesystem::LocalFilesystem` (production)
/// - `trellis_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> TrellisResult<()>;

    fn write_file(&self, path: &Path, content: &str) -> TrellisResult<()>;

    fn read_file(&self, path: &Path) -> TrellisResult<String>;

    fn set_permissions(&self, path: &Path, executable: bool) -> TrellisResult<()>;

    fn exists(&self, path: &Path) -> bool;

    /// `true` if `path` is a directory with no entries, or does not exist.
    fn is_empty_dir(&self, path: &Path) -> TrellisResult<bool>;

    fn remove_file(&self, path: &Path) -> TrellisResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> TrellisResult<()>;
}

/// Port for blueprint lookup.
///
/// Implemented by:
/// - `trellis_adapters::blueprint_store::InMemoryStore` (built-in and loaded blueprints)
pub trait BlueprintStore: Send + Sync {
    /// # Errors
    /// `ApplicationError::BlueprintNotFound` if no blueprint has this name.
    fn get(&self, name: &str) -> TrellisResult<Blueprint>;

    /// All blueprints, sorted by name.
    fn list(&self) -> TrellisResult<Vec<Blueprint>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `trellis_adapters::renderer::HandlebarsRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render the surviving files into a project structure rooted at
    /// `output_root`.
    ///
    /// Paths inside the structure stay relative to `output_root`.
    fn render(
        &self,
        files: &[&TemplateFile],
        context: &RenderContext,
        output_root: &Path,
    ) -> TrellisResult<ProjectStructure>;
}

/// Port for running external commands to completion.
///
/// Implemented by:
/// - `trellis_adapters::process::ProcessRunner`
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program args..` in `cwd`, inheriting stdio.
    ///
    /// # Errors
    /// `ApplicationError::CommandFailed` if it cannot start or exits non-zero.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> TrellisResult<()>;
}

/// Port for deterministic manifest output.
///
/// Implemented by:
/// - `trellis_adapters::sorter::JsonDependencySorter`
#[cfg_attr(test, mockall::automock)]
pub trait DependencySorter: Send + Sync {
    /// Return `manifest` with its dependency maps sorted by key.
    ///
    /// `path` names the manifest in errors.
    fn sort(&self, path: &Path, manifest: &str) -> TrellisResult<String>;
}

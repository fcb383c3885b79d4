//! Filesystem-based blueprint loader.
//!
//! # Directory layout expected
//!
//! ```text
//! blueprints/
//! ├── vue-starter/
//! │   ├── blueprint.toml       ← manifest (required)
//! │   └── template/            ← rendered into the project
//! │       ├── package.json
//! │       └── src/
//! │           └── main.js
//! └── another/
//!     ├── blueprint.toml
//!     └── template/
//! ```
//!
//! The manifest format is documented in [`crate::manifest`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use trellis_core::{
    application::ApplicationError,
    domain::{Blueprint, RelativePath, TemplateFile},
    error::TrellisResult,
};

use crate::manifest::BlueprintManifest;

pub const MANIFEST_FILE: &str = "blueprint.toml";
pub const TEMPLATE_DIR: &str = "template";

/// Loads blueprints from directories on disk.
pub struct FilesystemBlueprintLoader {
    root: PathBuf,
}

impl FilesystemBlueprintLoader {
    /// `root` holds one blueprint per subdirectory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every valid blueprint under the root.
    ///
    /// A subdirectory with a missing or invalid manifest is skipped with a
    /// `WARN` log and does not stop the others from loading.
    ///
    /// # Errors
    /// [`ApplicationError::BlueprintLoad`] if the root cannot be read.
    #[instrument(skip(self), fields(dir = %self.root.display()))]
    pub fn load_all(&self) -> TrellisResult<Vec<Blueprint>> {
        let read_dir = fs::read_dir(&self.root).map_err(|e| load_error(&self.root, e))?;

        let mut dirs = Vec::new();
        for entry in read_dir {
            let path = entry.map_err(|e| load_error(&self.root, e))?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut blueprints = Vec::new();
        for dir in dirs {
            match load_dir(&dir) {
                Ok(blueprint) => {
                    debug!(name = %blueprint.name(), version = %blueprint.version(), "loaded blueprint");
                    blueprints.push(blueprint);
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping blueprint directory due to load error");
                }
            }
        }

        debug!(count = blueprints.len(), "finished loading blueprints");
        Ok(blueprints)
    }
}

/// Load one blueprint from `dir` (the directory holding `blueprint.toml`).
///
/// # Errors
/// - [`ApplicationError::BlueprintLoad`] for I/O failures
/// - a `DomainError` for an invalid manifest
#[instrument(fields(dir = %dir.display()))]
pub fn load_dir(dir: &Path) -> TrellisResult<Blueprint> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let raw = fs::read_to_string(&manifest_path).map_err(|e| load_error(dir, e))?;
    let manifest = BlueprintManifest::parse(&raw)?;
    let files = read_template_tree(&dir.join(TEMPLATE_DIR))?;
    Ok(manifest.into_blueprint(files)?)
}

/// Collect every text file below `template_dir`, sorted by path.
fn read_template_tree(template_dir: &Path) -> TrellisResult<Vec<TemplateFile>> {
    if !template_dir.is_dir() {
        return Err(ApplicationError::BlueprintLoad {
            path: template_dir.to_path_buf(),
            reason: format!("missing {TEMPLATE_DIR}/ directory"),
        }
        .into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(template_dir)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ApplicationError::BlueprintLoad {
            path: template_dir.to_path_buf(),
            reason: format!("directory walk error: {e}"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let abs_path = entry.path();
        let rel = abs_path
            .strip_prefix(template_dir)
            .map_err(|e| load_error(abs_path, e))?;
        let path = RelativePath::try_new(rel)?;

        let content = match fs::read_to_string(abs_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(path = %path, "skipping non-UTF-8 template file");
                continue;
            }
            Err(e) => return Err(load_error(abs_path, e)),
        };

        let mut file = TemplateFile::new(path, content);
        if is_executable(abs_path) {
            file = file.executable();
        }
        files.push(file);
    }
    Ok(files)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

fn load_error(path: &Path, e: impl std::fmt::Display) -> trellis_core::error::TrellisError {
    ApplicationError::BlueprintLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

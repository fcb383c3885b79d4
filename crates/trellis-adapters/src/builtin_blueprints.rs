//! Built-in blueprint discovery.
//!
//! [`all_blueprints`] is the single entry point the CLI uses. It returns the
//! blueprints compiled into the binary followed by any found on disk.
//!
//! # Resolution order for on-disk blueprints
//!
//! The first directory that exists and yields at least one valid blueprint
//! wins:
//!
//! 1. the directory passed by the caller (`blueprints.local_path` in config)
//! 2. **`$TRELLIS_BLUEPRINTS_DIR`**
//! 3. **`./blueprints`** relative to the current working directory
//! 4. **`<executable-dir>/blueprints`**
//!
//! An on-disk blueprint with the same name as an embedded one replaces it
//! once both are inserted into the store.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use trellis_core::{
    domain::{Blueprint, DomainError, RelativePath, TemplateFile},
    error::TrellisResult,
};

use crate::{blueprint_loader::FilesystemBlueprintLoader, manifest::BlueprintManifest};

pub const BLUEPRINTS_DIR_ENV: &str = "TRELLIS_BLUEPRINTS_DIR";

macro_rules! embed {
    ($path:literal) => {
        (
            $path,
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/blueprints/vue-starter/template/",
                $path
            )),
        )
    };
}

const VUE_STARTER_MANIFEST: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/blueprints/vue-starter/blueprint.toml"
));

const VUE_STARTER_FILES: &[(&str, &str)] = &[
    embed!(".babelrc"),
    embed!(".eslintignore"),
    embed!(".eslintrc.js"),
    embed!(".gitignore"),
    embed!(".storybook/addons.js"),
    embed!(".storybook/config.js"),
    embed!("README.md"),
    embed!("build/build.js"),
    embed!("build/webpack.base.conf.js"),
    embed!("build/webpack.dev.conf.js"),
    embed!("build/webpack.test.conf.js"),
    embed!("config/dev.env.js"),
    embed!("config/index.js"),
    embed!("config/prod.env.js"),
    embed!("config/test.env.js"),
    embed!("index.html"),
    embed!("package.json"),
    embed!("src/App.vue"),
    embed!("src/assets/fonts/README.md"),
    embed!("src/assets/styles/_variables.scss"),
    embed!("src/assets/styles/main.scss"),
    embed!("src/main.js"),
    embed!("src/modules/auth/auth.service.js"),
    embed!("src/modules/auth/index.js"),
    embed!("src/pages/Home.vue"),
    embed!("src/pages/_layout/layout-account/LayoutAccount.vue"),
    embed!("src/pages/account/Login.vue"),
    embed!("src/router/index.js"),
    embed!("src/vuex/app/actions.js"),
    embed!("src/vuex/app/getters.js"),
    embed!("src/vuex/app/index.js"),
    embed!("src/vuex/app/mutations.js"),
    embed!("src/vuex/app/state.js"),
    embed!("src/vuex/index.js"),
    embed!("test/e2e/nightwatch.conf.js"),
    embed!("test/e2e/runner.js"),
    embed!("test/e2e/specs/test.js"),
    embed!("test/unit/index.js"),
    embed!("test/unit/jest.conf.js"),
    embed!("test/unit/karma.conf.js"),
    embed!("test/unit/setup.js"),
    embed!("test/unit/specs/Home.spec.js"),
    embed!("test/unit/specs/index.js"),
];

/// The Vue.js starter compiled into the binary.
pub fn vue_starter() -> Result<Blueprint, DomainError> {
    let files = VUE_STARTER_FILES
        .iter()
        .map(|(path, content)| Ok(TemplateFile::new(RelativePath::try_new(*path)?, *content)))
        .collect::<Result<Vec<_>, DomainError>>()?;
    BlueprintManifest::parse(VUE_STARTER_MANIFEST)?.into_blueprint(files)
}

/// Embedded blueprints, then the on-disk ones (see module docs).
///
/// # Errors
/// Fails if an embedded blueprint is invalid, or a candidate directory
/// exists but cannot be read. Invalid blueprints inside a readable directory
/// are skipped with a warning.
#[instrument(skip_all)]
pub fn all_blueprints(local_path: Option<&Path>) -> TrellisResult<Vec<Blueprint>> {
    let mut blueprints = vec![vue_starter()?];

    for candidate in candidate_paths(local_path) {
        debug!(path = %candidate.display(), "checking candidate blueprints path");
        if !candidate.is_dir() {
            continue;
        }
        let found = FilesystemBlueprintLoader::new(&candidate).load_all()?;
        if found.is_empty() {
            debug!(path = %candidate.display(), "no blueprints here, trying next");
            continue;
        }
        info!(path = %candidate.display(), count = found.len(), "loaded blueprints from disk");
        blueprints.extend(found);
        break;
    }

    Ok(blueprints)
}

fn candidate_paths(local_path: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = local_path.map(Path::to_path_buf).into_iter().collect();

    if let Ok(dir) = std::env::var(BLUEPRINTS_DIR_ENV) {
        if !dir.is_empty() {
            paths.push(PathBuf::from(dir));
        }
    }

    paths.push(PathBuf::from("blueprints"));

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join("blueprints"));
    }

    paths
}

//! Infrastructure adapters for Trellis.
//!
//! Implements the ports in `trellis_core::application::ports`: blueprint
//! loading (TOML manifest plus template tree), the Handlebars renderer,
//! filesystems, process execution, `package.json` sorting and the
//! non-interactive prompt front-ends. All I/O lives here.

pub mod blueprint_loader;
pub mod blueprint_store;
pub mod builtin_blueprints;
pub mod filesystem;
pub mod frontend;
pub mod manifest;
pub mod process;
pub mod renderer;
pub mod sorter;

pub use blueprint_loader::FilesystemBlueprintLoader;
pub use blueprint_store::InMemoryStore;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use frontend::{DefaultsFrontend, ScriptedFrontend};
pub use process::{ProcessRunner, git_identity};
pub use renderer::HandlebarsRenderer;
pub use sorter::JsonDependencySorter;

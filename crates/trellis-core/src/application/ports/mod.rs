//! Application ports (traits) for external dependencies.
//!
//! - **Driven (output) ports**: called by the services, implemented in
//!   `trellis-adapters`
//!   - `Filesystem`: file operations
//!   - `BlueprintStore`: blueprint lookup
//!   - `TemplateRenderer`: template rendering
//!   - `CommandRunner`: external processes (package managers)
//!   - `DependencySorter`: manifest normalisation
//!
//! - **Driving (input) ports**: the prompt front-end that supplies answers
//!   - `PromptFrontend`: interactive, scripted or defaults-only

pub mod input;
pub mod output;

pub use input::PromptFrontend;
pub use output::{BlueprintStore, CommandRunner, DependencySorter, Filesystem, TemplateRenderer};

#[cfg(test)]
pub use output::{MockCommandRunner, MockDependencySorter, MockFilesystem};

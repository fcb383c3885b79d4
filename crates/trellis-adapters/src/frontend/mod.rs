//! Non-interactive prompt front-ends.
//!
//! The interactive terminal front-end lives in the CLI crate.

mod defaults;
mod scripted;

pub use defaults::DefaultsFrontend;
pub use scripted::ScriptedFrontend;

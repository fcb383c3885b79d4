//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here and nowhere else.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "trellis",
    bin_name = "trellis",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Prompt-driven project scaffolding",
    long_about = "Trellis asks a blueprint's questions, keeps the template files \
                  your answers call for, and writes the project.",
    after_help = "EXAMPLES:\n\
        \x20 trellis new my-app\n\
        \x20 trellis new my-app --scenario full --yes\n\
        \x20 trellis new . --blueprint vue-starter\n\
        \x20 trellis check ./blueprints/vue-starter",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(
        visible_alias = "n",
        about = "Create a new project from a blueprint",
        after_help = "EXAMPLES:\n\
            \x20 trellis new my-app\n\
            \x20 trellis new my-app --yes --skip-install\n\
            \x20 trellis new my-app --scenario minimal --dry-run\n\
            \x20 trellis new my-app --from ./my-blueprint"
    )]
    New(NewArgs),

    #[command(visible_alias = "ls", about = "List available blueprints")]
    List(ListArgs),

    #[command(
        about = "Validate a blueprint directory",
        after_help = "Reports manifest errors, `when` clauses that read prompts \
            asked later, and filter globs that match no template file."
    )]
    Check(CheckArgs),

    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 trellis init           # platform config directory\n\
            \x20 trellis init --local   # .trellis.toml in the current directory"
    )]
    Init(InitArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 trellis completions bash > ~/.local/share/bash-completion/completions/trellis\n\
            \x20 trellis completions zsh  > ~/.zfunc/_trellis"
    )]
    Completions(CompletionsArgs),

    #[command(about = "Inspect configuration", subcommand)]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Destination directory. `.` generates in place.
    #[arg(value_name = "DEST", help = "Destination directory ('.' for in place)")]
    pub destination: PathBuf,

    #[arg(
        short = 'b',
        long = "blueprint",
        value_name = "NAME",
        conflicts_with = "from",
        help = "Built-in blueprint to use [default: from config]"
    )]
    pub blueprint: Option<String>,

    #[arg(
        long = "from",
        value_name = "DIR",
        help = "Load the blueprint from a directory"
    )]
    pub from: Option<PathBuf>,

    /// Pre-supply the named scenario's answers and run in test mode.
    #[arg(
        short = 's',
        long = "scenario",
        value_name = "NAME",
        env = "TRELLIS_SCENARIO",
        help = "Use a named answer scenario (test mode)"
    )]
    pub scenario: Option<String>,

    #[arg(
        short = 'y',
        long = "yes",
        help = "Accept every default without prompting"
    )]
    pub yes: bool,

    #[arg(long = "force", help = "Write into a non-empty directory")]
    pub force: bool,

    #[arg(
        long = "dry-run",
        help = "Show which files would be written, write nothing"
    )]
    pub dry_run: bool,

    #[arg(long = "skip-install", help = "Never run the package manager")]
    pub skip_install: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── check ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory containing `blueprint.toml`.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.trellis.toml` in the current directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.package_manager`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

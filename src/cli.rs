use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use projects_client::{Field, ProjectId};

#[derive(Parser)]
#[command(name = "projects")]
#[command(about = "A CLI for the projects API", version)]
#[command(after_help = "EXAMPLES:
    projects login <token>              Save the API token
    projects list                       List your projects
    projects create -t \"Backend\"        Create a new project
    projects use 4                      Select project 4 as current")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Show debug logs and the full error chain
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects
    #[command(after_help = "EXAMPLES:
    projects list
    projects list --json")]
    List,
    /// Create a new project
    #[command(after_help = "EXAMPLES:
    projects create -t \"Backend\"
    projects create -t \"Backend\" -d \"API and workers\"")]
    Create(CreateArgs),
    /// Select or clear the current project
    #[command(after_help = "EXAMPLES:
    projects use 4
    projects use --clear")]
    Use(UseArgs),
    /// Check a form field without sending anything
    #[command(after_help = "EXAMPLES:
    projects validate title \"Backend\"")]
    Validate {
        /// Field to check
        field: Field,
        /// Value to check
        value: String,
    },
    /// Save the API token
    #[command(after_help = "EXAMPLES:
    projects login eyJhbGciOi...")]
    Login {
        /// Bearer token issued by the server
        token: String,
    },
    /// Forget the API token and the current selection
    Logout,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    projects completions bash > ~/.bash_completion.d/projects
    projects completions zsh > ~/.zfunc/_projects")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Project title (at most 50 characters)
    #[arg(long, short)]
    pub title: String,

    /// Project description
    #[arg(long, short)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct UseArgs {
    /// Project ID to select
    #[arg(required_unless_present = "clear")]
    pub id: Option<ProjectId>,

    /// Clear the current selection
    #[arg(long, conflicts_with = "id")]
    pub clear: bool,
}

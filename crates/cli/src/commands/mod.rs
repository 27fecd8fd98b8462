//! # CLI Commands
//!
//! Implementation of CLI commands for the Sirius tools.

pub mod ancestors;
pub mod check;
pub mod completions;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the Sirius CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a user holds a permission in a team
    Check(CheckArgs),

    /// Print the ancestor chain of a team, immediate parent first
    Ancestors(AncestorsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate(ValidateArgs),
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// User ID or email address
    pub user: String,

    /// Team ID
    pub team: uuid::Uuid,

    /// Permission in `resource:action` form, e.g. `class:create`
    pub permission: String,
}

/// Arguments for the ancestors command
#[derive(Args, Debug)]
pub struct AncestorsArgs {
    /// Team ID
    pub team: uuid::Uuid,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also open a connection and ping the database
    #[arg(long)]
    pub connect: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

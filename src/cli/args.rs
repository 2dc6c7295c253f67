//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Scaffold course websites: menus, categories, pages and access restrictions
#[derive(Parser, Debug)]
#[command(name = "coursesite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug logging, repeat for more detail (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold the site of a course and publish it
    Scaffold {
        /// Course record (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        course_file: PathBuf,
        /// Build and print the site without publishing
        #[arg(long)]
        dry_run: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Print the slug a course's site gets
    Slug {
        /// Course record (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        course_file: PathBuf,
    },

    /// List published sites
    List,

    /// Show a published site document
    Show {
        /// Site slug
        slug: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config path
    Path,

    /// Print config template
    Template,
}

/// How a scaffolded site is printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Menu and page tree
    Tree,
    /// Site document as TOML
    Toml,
}

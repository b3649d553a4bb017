//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SkillsAssess - CV skills assessment against role profiles
#[derive(Parser)]
#[command(
    name = "sa",
    about = "Assess a CV against role skill profiles using an LLM",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long = "log-level", global = true, help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess a CV for a specific role
    Analyze {
        /// Role to assess against (see `sa roles`)
        role: String,

        /// CV as a PDF file
        cv_file: PathBuf,

        /// Save the assessment as JSON; a bare file name goes into the reports directory
        #[arg(short, long)]
        output: Option<String>,

        /// Log the raw LLM response
        #[arg(short, long)]
        logging: bool,
    },

    /// Identify which roles a CV is relevant to
    IdentifyRoles {
        /// CV as a PDF file
        cv_file: PathBuf,

        /// Save the result as JSON; a bare file name goes into the reports directory
        #[arg(short, long)]
        output: Option<String>,

        /// Log the raw LLM response
        #[arg(short, long)]
        logging: bool,
    },

    /// List the roles a CV can be assessed against
    Roles,

    /// Print the template extracted from a markdown prompt document
    Extract {
        /// Prompt document
        prompt_file: PathBuf,
    },

    /// Recover JSON from raw model output (file or stdin)
    Clean {
        /// File holding the raw reply; stdin when omitted
        file: Option<PathBuf>,
    },
}

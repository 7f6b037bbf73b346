use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "repolens")]
#[command(version, about = "Terminal client for a codebase-investigation backend", long_about = None)]
pub struct Args {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(short, long, global = true, env = "REPOLENS_BASE_URL")]
    pub base_url: Option<String>,

    /// Config file path (default: ~/.repolens/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the backend to clone and index a repository
    Ingest {
        /// Repository URL
        url: String,
    },

    /// Print the repository file tree
    Tree,

    /// Print the source summary of the ingested repository
    Source,

    /// List files known to the backend
    Files,

    /// Print one file's content
    Show {
        /// Display name from `files`
        name: String,
    },

    /// Ask a question about the ingested code
    Ask {
        /// Free-text question
        question: String,
    },

    /// Reset the backend's conversation memory
    Reset,

    /// Show version
    Version,
}

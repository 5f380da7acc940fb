// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Course catalog search and prerequisite graphs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the catalog and start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Search a term's courses
    Search {
        /// Two-digit year, e.g. 25
        year: String,

        /// Term name, e.g. fall
        term: String,

        /// Search phrase
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Number of results to skip
        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },

    /// Print a department's prerequisite graph
    Graph {
        year: String,
        term: String,
        department: String,

        /// Completed course code (repeatable)
        #[arg(short, long = "completed")]
        completed: Vec<String>,
    },

    /// List terms and their departments
    Terms,

    /// Rebuild search indexes from the course files
    Reindex {
        /// Only rebuild this year (requires --term)
        #[arg(long, requires = "term")]
        year: Option<String>,

        /// Only rebuild this term (requires --year)
        #[arg(long, requires = "year")]
        term: Option<String>,
    },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for addresslookup-cli
#[derive(Debug, Parser)]
#[command(
    name = "addresslookup",
    version,
    about = "CLI for querying the Postcoder autocomplete service and replaying widget sessions"
)]
pub struct CliArgs {
    /// Postcoder API key
    #[arg(short = 'k', long = "api-key", env = "POSTCODER_API_KEY", global = true)]
    pub api_key: Option<String>,

    /// Widget configuration as JSON (same keys as the browser widget)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Country code to search in (e.g. UK, IE)
    #[arg(long = "country", global = true)]
    pub country: Option<String>,

    /// Override the service base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Show only the summary line of each suggestion
    #[arg(long = "single-summary", global = true)]
    pub single_summary: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up suggestions for a query
    Find {
        /// Free-text query (at least 3 characters)
        query: String,

        /// Narrow the search to within a previous suggestion id
        #[arg(short = 'p', long = "path-filter")]
        path_filter: Option<String>,
    },

    /// Retrieve the full address behind a suggestion id
    Retrieve {
        /// Suggestion id (from `find`)
        id: String,

        /// Query the id was found with
        #[arg(short = 'q', long = "query", default_value = "")]
        query: String,

        /// Number of address lines to fold the address into
        #[arg(short = 'l', long = "lines", default_value_t = 2)]
        lines: u8,
    },

    /// Show the country the service geolocates this machine to
    Locate,

    /// Interactive widget session on stdin
    Session,
}

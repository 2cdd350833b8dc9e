use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "talpa",
    about = "Fuzzy keyword relevance ranking over JSON document collections",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank documents in a JSON collection against a query
    Search {
        /// Path to a JSON array of documents ({"id": ..., <fields>...})
        #[arg(short, long)]
        input: String,

        /// Free-text query
        #[arg(short, long)]
        query: String,

        /// Searchable field names, in declaration order
        #[arg(short, long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Importance weight as field:multiplier (repeatable)
        #[arg(long)]
        importance: Vec<String>,

        /// Candidates to skip before the page
        #[arg(long)]
        skip: Option<usize>,

        /// Page size
        #[arg(long)]
        limit: Option<usize>,

        /// Sort natively by a field instead of by relevance (field or field:desc)
        #[arg(long)]
        sort: Option<String>,

        /// Emit the result page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the derived keyword set for each document
    Keywords {
        /// Path to a JSON array of documents
        #[arg(short, long)]
        input: String,

        /// Searchable field names, in declaration order
        #[arg(short, long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Emit keyword sets as JSON
        #[arg(long)]
        json: bool,
    },
}

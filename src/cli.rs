//! Command-line interface definition.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "zhibi", version, about = "智笔素材 — terminal client for the essay-material library")]
pub struct Cli {
    /// Server base URL (e.g. http://127.0.0.1:8000)
    #[arg(long, env = "ZHIBI_SERVER", global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse the library interactively (default)
    Browse {
        /// Open this document directly
        #[arg(long)]
        id: Option<i64>,
    },
    /// Fetch the document collection once and print it
    List {
        /// Full-text search term
        #[arg(long)]
        query: Option<String>,
        /// Type filter (e.g. 论证段)
        #[arg(long = "type")]
        doc_type: Option<String>,
        /// Theme filter (e.g. 青春奋斗)
        #[arg(long)]
        theme: Option<String>,
    },
    /// Upload a file, raw text, or a link
    Upload {
        /// Path of a file to upload, or text/link to import
        input: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_browse() {
        let cli = Cli::parse_from(["zhibi"]);
        assert!(cli.command.is_none());
        assert!(cli.server.is_none());
    }

    #[test]
    fn test_list_filters_parse() {
        let cli = Cli::parse_from(["zhibi", "list", "--type", "论证段", "--theme", "青春奋斗"]);
        let Some(Commands::List {
            doc_type, theme, ..
        }) = cli.command
        else {
            panic!("expected list command");
        };
        assert_eq!(doc_type.as_deref(), Some("论证段"));
        assert_eq!(theme.as_deref(), Some("青春奋斗"));
    }
}

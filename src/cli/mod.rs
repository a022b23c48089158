//! CLI module for the PDF RAG service
//!
//! - `serve`: ingest the configured PDF and serve the HTTP API (default)
//! - `inspect`: print the chunks a PDF splits into, without embedding

pub mod inspect;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// PDF RAG service - question answering over a bundled document
#[derive(Parser)]
#[command(name = "pdf-rag-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest the configured PDF and serve the HTTP API
    Serve(serve::ServeArgs),

    /// Print the chunks a PDF is split into
    Inspect(inspect::InspectArgs),
}

/// Load layered configuration, falling back to defaults when it cannot be
/// read or fails validation. Problems are returned so they can be logged
/// once tracing is up.
pub(crate) fn load_config() -> (AppConfig, Vec<String>) {
    dotenvy::dotenv().ok();

    let mut problems = Vec::new();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            problems.push(format!("Failed to load configuration, using defaults: {}", e));
            AppConfig::default()
        }
    };

    match config.validate() {
        Ok(()) => (config, problems),
        Err(e) => {
            problems.push(format!("Invalid configuration, using defaults: {}", e));
            (AppConfig::default(), problems)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_args() {
        let cli = Cli::try_parse_from(["pdf-rag-service", "inspect", "--pdf", "doc.pdf"]).unwrap();

        match cli.command {
            Some(Command::Inspect(args)) => {
                assert_eq!(args.pdf.as_deref(), Some(std::path::Path::new("doc.pdf")));
                assert_eq!(args.preview_chars, 80);
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["pdf-rag-service"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_serve_port_override() {
        let cli = Cli::try_parse_from(["pdf-rag-service", "serve", "--port", "9090"]).unwrap();

        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(9090)),
            _ => panic!("expected serve"),
        }
    }
}

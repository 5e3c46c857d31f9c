//! CLI module for tubeqa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// tubeqa - Ask questions about a YouTube video
///
/// Fetches a video's transcript, indexes it, and answers questions with
/// links to the moments the answer came from.
#[derive(Parser, Debug)]
#[command(name = "tubeqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TUBEQA_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Process a video and ask one question about it
    Ask {
        /// YouTube URL or video ID
        url: String,

        /// The question to ask
        question: String,
    },

    /// Print a video's transcript
    Transcript {
        /// YouTube URL or video ID
        url: String,

        /// Show the indexed chunks instead of raw segments
        #[arg(long)]
        chunks: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["tubeqa", "-vv", "ask", "https://youtu.be/dQw4w9WgXcQ", "what?"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask { url, question } => {
                assert_eq!(url, "https://youtu.be/dQw4w9WgXcQ");
                assert_eq!(question, "what?");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["tubeqa", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { host: None, port: None }));

        let cli = Cli::try_parse_from(["tubeqa", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), .. }));
    }
}

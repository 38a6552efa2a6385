use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::TranscriptFormat;

#[derive(Parser)]
#[command(
    name = "transcript-api",
    about = "Transcript API - Fetch YouTube transcripts as timestamped JSON or plain text",
    version,
    long_about = "An HTTP service that turns YouTube URLs into transcripts. Requests the caption track in the preferred language with an English fallback, and reports upstream failures as typed JSON errors."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (defaults to ./config.yaml or the user config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Interface to bind
        #[arg(long, env = "HOST", value_name = "HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PORT", value_name = "PORT")]
        port: Option<u16>,

        /// Enable development logging
        #[arg(
            long,
            env = "TRANSCRIPT_API_DEBUG",
            value_parser = clap::builder::FalseyValueParser::new()
        )]
        debug: bool,
    },

    /// Fetch a transcript and print the API payload
    Fetch {
        /// YouTube URL
        #[arg(value_name = "URL")]
        url: String,

        /// Preferred language code (English is the fallback)
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// List the caption languages of a video
    Languages {
        /// YouTube URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Print the video id extracted from a URL
    VideoId {
        /// YouTube URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show or write the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// JSON with timestamps
    Json,
    /// Plain text
    Text,
}

impl From<OutputFormat> for TranscriptFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => TranscriptFormat::Json,
            OutputFormat::Text => TranscriptFormat::Text,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

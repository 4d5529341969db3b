//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for `verdict ask`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final answer followed by the judge's verdict
    Text,
    /// Only the final answer
    Answer,
    /// JSON output (`{message, judge_data}`)
    Json,
}

impl From<OutputFormat> for verdict_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => verdict_domain::OutputFormat::Text,
            OutputFormat::Answer => verdict_domain::OutputFormat::Answer,
            OutputFormat::Json => verdict_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for verdict
#[derive(Parser, Debug)]
#[command(name = "verdict")]
#[command(author, version, about = "Reviewed conversations - every answer is checked by a judge")]
#[command(long_about = r#"
Verdict keeps one conversation per session and has every answer reviewed
before it is returned:

1. The expert answers your message
2. The judge reviews the answer and returns a verdict (APPROVED, REVISE, REJECTED)
3. If the judge asks for changes, the expert revises its answer once

Configuration files are loaded from (in priority order):
1. VERDICT_* environment variables (API_KEY / GEMINI_API_KEY for the key)
2. --config <path>     Explicit config file
3. ./verdict.toml      Project-level config
4. ~/.config/verdict/config.toml   Global config

Example:
  verdict serve --port 8000
  verdict ask "What is quantum superposition?"
  verdict ask --session lecture-1 --output json "And entanglement?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server (`POST /prompt`, `GET /health`)
    Serve {
        /// Host to bind to (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Ask the expert one question and print the reviewed answer
    Ask {
        /// The message to send
        message: String,

        /// Session id; reuse it to continue a conversation within one process
        #[arg(short, long, value_name = "ID")]
        session: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

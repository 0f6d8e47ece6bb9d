//! ai-chat - terminal chat client for a remote AI endpoint

use std::path::PathBuf;

use ai_chat::runner::{run_tui, AppConfig};
use clap::Parser;

/// Chat with an AI model from the terminal
#[derive(Parser, Debug)]
#[command(name = "ai-chat")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// URL the chat request is POSTed to
    #[arg(long, env = "AI_CHAT_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (0 waits indefinitely)
    #[arg(long, env = "AI_CHAT_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write logs here instead of the XDG state directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            debug: args.debug,
            verbose: args.verbose,
            endpoint: args.endpoint,
            timeout_secs: args.timeout,
            log_file: args.log_file,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    run_tui(args.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_map_to_app_config() {
        let args = Args::parse_from([
            "ai-chat",
            "-d",
            "--endpoint",
            "http://localhost:3000/chat",
            "--timeout",
            "30",
        ]);
        let config = AppConfig::from(args);
        assert!(config.debug);
        assert!(!config.verbose);
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:3000/chat"));
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.log_file.is_none());
    }
}

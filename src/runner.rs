//! Application runner
//!
//! Resolves configuration, sets up logging and drives the TUI on a tokio
//! runtime. Called by the binary entry point.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::{ChatConfig, ConfigOverrides, XdgDirs};

/// Options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Enable debug logging
    pub debug: bool,
    /// Enable verbose (trace-level) logging
    pub verbose: bool,
    /// Chat endpoint override
    pub endpoint: Option<String>,
    /// Request timeout override in seconds
    pub timeout_secs: Option<u64>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
            log_file: self.log_file.clone(),
        }
    }

    fn default_filter(&self) -> &'static str {
        if self.verbose {
            "trace"
        } else if self.debug {
            "debug"
        } else {
            "info,ai_chat=debug"
        }
    }
}

/// Layer the config file and command-line overrides, then validate.
pub fn resolve_config(config: &AppConfig, dirs: &XdgDirs) -> anyhow::Result<ChatConfig> {
    let chat_config = ChatConfig::load(dirs)
        .with_context(|| format!("Loading {}", dirs.config_file().display()))?
        .with_overrides(config.overrides());
    chat_config.endpoint_url()?;
    Ok(chat_config)
}

/// Send tracing output to a file; the terminal belongs to the TUI.
#[cfg(feature = "tui")]
fn init_file_logging(
    config: &AppConfig,
    chat_config: &ChatConfig,
    dirs: &XdgDirs,
) -> anyhow::Result<PathBuf> {
    use std::fs::File;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let path = chat_config.log_file_or(dirs);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Creating log directory {}", parent.display()))?;
    }
    let log_file =
        File::create(&path).with_context(|| format!("Creating log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .init();

    Ok(path)
}

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log file cannot
/// be created or the terminal cannot be set up.
#[cfg(feature = "tui")]
pub fn run_tui(config: AppConfig) -> anyhow::Result<()> {
    let dirs = XdgDirs::new();
    let chat_config = resolve_config(&config, &dirs)?;
    let log_path = init_file_logging(&config, &chat_config, &dirs)?;
    tracing::info!(
        "ai-chat {} starting, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_path.display()
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    runtime.block_on(crate::tui::run(chat_config))
}

#[cfg(not(feature = "tui"))]
pub fn run_tui(config: AppConfig) -> anyhow::Result<()> {
    let dirs = XdgDirs::new();
    resolve_config(&config, &dirs)?;
    anyhow::bail!("TUI feature not enabled. Recompile with --features tui")
}

//! XDG Base Directory support.

use std::path::PathBuf;

const APP_DIR: &str = "ai-chat";

/// XDG directory paths for ai-chat.
#[derive(Debug, Clone)]
pub struct XdgDirs {
    /// Config directory (~/.config/ai-chat or XDG_CONFIG_HOME/ai-chat)
    pub config: PathBuf,
    /// State directory (~/.local/state/ai-chat or XDG_STATE_HOME/ai-chat)
    pub state: PathBuf,
}

impl XdgDirs {
    /// Get XDG directories, respecting environment variables.
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            config: std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| home.join(".config"))
                .join(APP_DIR),
            state: std::env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| home.join(".local/state"))
                .join(APP_DIR),
        }
    }

    /// Location of the optional JSON config file.
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Where the TUI writes its log when no `--log-file` is given.
    pub fn default_log_file(&self) -> PathBuf {
        self.state.join("ai-chat-tui.log")
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

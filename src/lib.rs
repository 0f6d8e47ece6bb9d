//! ai-chat library
//!
//! A chat client for a remote AI endpoint: the conversation core, its
//! configuration and the terminal interface.

pub mod chat;
pub mod config;
pub mod runner;

#[cfg(feature = "tui")]
pub mod tui;

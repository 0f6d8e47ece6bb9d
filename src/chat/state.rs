//! Conversation state container.
//!
//! Holds the append-only turn list and the awaiting-response flag. All
//! mutation goes through `begin_submit` and `finish_exchange`; every
//! mutation bumps a revision number that subscribers can watch.

use tokio::sync::watch;

use super::client::ExchangeError;
use super::turn::Turn;
use super::wire::{ChatReply, ChatRequest};

#[derive(Debug)]
pub struct ChatState {
    turns: Vec<Turn>,
    awaiting: bool,
    revision: watch::Sender<u64>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            turns: Vec::new(),
            awaiting: false,
            revision,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether a request is outstanding.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Current revision; increases on every mutation.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch for mutations.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Text of the most recent model turn.
    pub fn last_model_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| !t.is_user())
            .map(Turn::text)
    }

    /// Start an exchange for `text`.
    ///
    /// Blank text is ignored and yields `None`. Otherwise the request is
    /// built from the turns that precede this one (the new text travels
    /// only in `chat`), the user turn is appended verbatim and the state
    /// starts awaiting.
    ///
    /// Overlapping submits are not rejected here; callers gate on
    /// `is_awaiting`.
    pub fn begin_submit(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() {
            return None;
        }

        let request = ChatRequest {
            chat: text.to_string(),
            history: self.turns.clone(),
        };

        self.turns.push(Turn::user(text));
        self.awaiting = true;
        self.bump();
        Some(request)
    }

    /// Record the outcome of an exchange.
    ///
    /// Appends exactly one model turn (the reply, or the fallback text on
    /// any error) and always clears the awaiting flag.
    pub fn finish_exchange(&mut self, outcome: Result<ChatReply, ExchangeError>) -> &Turn {
        let turn = match outcome {
            Ok(reply) => Turn::model(reply.text),
            Err(_) => Turn::fallback(),
        };
        self.turns.push(turn);
        self.awaiting = false;
        self.bump();
        &self.turns[self.turns.len() - 1]
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

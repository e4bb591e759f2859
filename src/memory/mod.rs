//! Long-term memory for personalising requests.
//!
//! This module provides:
//! - The [`MemoryStore`] seam the orchestrator reads from and writes back to
//! - A Mem0 platform client ([`mem0::Mem0Client`]) and an in-process store
//!   ([`in_memory::InMemoryStore`]) for local runs and tests
//! - Utilities for formatting memory and conversation history for prompts
//!
//! The core only appends records and reads bounded-recency windows. It never
//! mutates or deletes an existing record.

/// In-process memory store.
pub mod in_memory;
/// Mem0 platform client.
pub mod mem0;

use crate::types::{ConversationTurn, MemoryRecord, Metadata, Result};
use async_trait::async_trait;

pub use in_memory::InMemoryStore;
pub use mem0::Mem0Client;

/// Default number of recent conversation turns shown to the router.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Default number of memory records fetched per request.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Maximum number of records rendered into a prompt to avoid token overflow.
pub const MAX_MEMORIES_IN_PROMPT: usize = 20;

/// Append-only, per-user store of short text records.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Persist one record. Either the whole record is stored or an error is returned.
    async fn append(&self, owner: &str, message: &str, metadata: Metadata) -> Result<MemoryRecord>;

    /// Latest `limit` records of `owner`, most recent first.
    async fn retrieve_recent(&self, owner: &str, limit: usize) -> Result<Vec<MemoryRecord>>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Formats memory records into a block suitable for inclusion in prompts.
///
/// Returns an empty string when there is nothing to show, so templates can
/// substitute a placeholder.
///
/// # Example
/// ```ignore
/// let context = format_memories_for_prompt(&records);
/// // "- [2026-03-01] Travel Interest: flights to Tokyo (domain: travel)"
/// ```
pub fn format_memories_for_prompt(records: &[MemoryRecord]) -> String {
    records
        .iter()
        .take(MAX_MEMORIES_IN_PROMPT)
        .map(|r| {
            let domain = r
                .metadata
                .get("domain")
                .map(|d| format!(" (domain: {})", d))
                .unwrap_or_default();
            format!("- [{}] {}{}", r.created_at.format("%Y-%m-%d"), r.message, domain)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the most recent `window` turns as `role: content` lines.
pub fn format_history_for_prompt(history: &[ConversationTurn], window: usize) -> String {
    truncate_history(history, window)
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncates conversation history to a window of recent turns.
pub fn truncate_history(history: &[ConversationTurn], window_size: usize) -> &[ConversationTurn] {
    if history.len() <= window_size {
        history
    } else {
        &history[history.len() - window_size..]
    }
}

/// First `max_chars` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

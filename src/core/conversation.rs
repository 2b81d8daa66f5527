//! Local conversation history for the chat screen.
//!
//! The store owns the working transcript and the list of past conversations.
//! It performs no I/O of its own: [`ConversationStore::submit`] hands back a
//! [`PendingQuery`] for the caller to forward to the query service, and
//! [`ConversationStore::resolve`] folds the reply into the transcript once it
//! arrives. Every mutation is synchronous, so the user message is visible
//! before the network round-trip begins.

use chrono::Utc;

use crate::core::constants::TITLE_PREFIX_CHARS;
use crate::core::message::Message;

/// A titled transcript kept in the sidebar history. The title is derived once
/// from the opening user message and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    pub messages: Vec<Message>,
}

/// Token for an in-flight query.
///
/// Carries the epoch current at submission time, so a reply that outlives a
/// conversation switch can be recognized as stale and dropped instead of
/// landing in whatever transcript happens to be on screen.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    text: String,
    epoch: u64,
}

impl PendingQuery {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Working transcript plus history.
///
/// Two states: *fresh* (no `active_id`, the transcript has not been promoted
/// into history yet) and *attached* (`active_id` names the history entry that
/// mirrors the working transcript after each completed exchange).
#[derive(Debug, Default)]
pub struct ConversationStore {
    active_id: Option<i64>,
    messages: Vec<Message>,
    history: Vec<Conversation>,
    epoch: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Past conversations, most recent first.
    pub fn history(&self) -> &[Conversation] {
        &self.history
    }

    pub fn active_id(&self) -> Option<i64> {
        self.active_id
    }

    pub fn is_attached(&self) -> bool {
        self.active_id.is_some()
    }

    /// Append the user's message and hand back the token for the query call.
    /// Blank input is rejected without touching state or issuing a token.
    pub fn submit(&mut self, text: &str) -> Option<PendingQuery> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages.push(Message::user(text));
        Some(PendingQuery {
            text: text.to_string(),
            epoch: self.epoch,
        })
    }

    /// Fold a reply into the transcript and the history record.
    ///
    /// The first completed exchange of a fresh transcript promotes it into a
    /// new history entry at the front of the list; every later exchange
    /// rewrites the active entry in place and leaves the others untouched.
    /// Returns false for a stale `pending` (the user switched conversations
    /// while the query was in flight); stale replies change nothing.
    pub fn resolve(&mut self, pending: &PendingQuery, reply: impl Into<String>) -> bool {
        if pending.epoch != self.epoch {
            return false;
        }
        self.messages.push(Message::assistant(reply));
        match self.active_id {
            None => {
                let title = self.derive_title(pending);
                let id = self.fresh_id();
                self.history.insert(
                    0,
                    Conversation {
                        id,
                        title,
                        messages: self.messages.clone(),
                    },
                );
                self.active_id = Some(id);
            }
            Some(id) => {
                if let Some(entry) = self.history.iter_mut().find(|c| c.id == id) {
                    entry.messages = self.messages.clone();
                }
            }
        }
        true
    }

    /// Swap the working transcript for a stored conversation. History is not
    /// mutated; pending replies from before the switch become stale.
    pub fn select(&mut self, id: i64) -> bool {
        let Some(entry) = self.history.iter().find(|c| c.id == id) else {
            return false;
        };
        self.messages = entry.messages.clone();
        self.active_id = Some(id);
        self.epoch += 1;
        true
    }

    /// Drop the working transcript and detach from history.
    pub fn start_new(&mut self) {
        self.messages.clear();
        self.active_id = None;
        self.epoch += 1;
    }

    fn derive_title(&self, pending: &PendingQuery) -> String {
        let seed = self
            .messages
            .iter()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
            .unwrap_or_else(|| pending.text());
        conversation_title(seed)
    }

    fn fresh_id(&self) -> i64 {
        // Creation-time ids; nudge forward on the rare same-millisecond clash.
        let mut id = Utc::now().timestamp_millis();
        while self.history.iter().any(|c| c.id == id) {
            id += 1;
        }
        id
    }
}

/// Title rule: the first characters of the opening user message plus an
/// ellipsis marker.
pub fn conversation_title(text: &str) -> String {
    let prefix: String = text.chars().take(TITLE_PREFIX_CHARS).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(store: &mut ConversationStore, text: &str, reply: &str) {
        let pending = store.submit(text).expect("non-blank input");
        assert!(store.resolve(&pending, reply));
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut store = ConversationStore::new();
        assert!(store.submit("").is_none());
        assert!(store.submit("   \t").is_none());
        assert!(store.messages().is_empty());
        assert!(store.history().is_empty());
    }

    #[test]
    fn submit_appends_user_message_before_any_reply() {
        let mut store = ConversationStore::new();
        let pending = store.submit("hello there").unwrap();
        assert_eq!(store.messages().len(), 1);
        assert!(store.messages()[0].is_user());
        assert_eq!(store.messages()[0].content, "hello there");
        // Still fresh until the exchange completes.
        assert!(!store.is_attached());
        assert_eq!(pending.text(), "hello there");
    }

    #[test]
    fn first_exchange_promotes_a_history_entry() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "what is the weather like", "sunny");
        assert!(store.is_attached());
        assert_eq!(store.history().len(), 1);
        let entry = &store.history()[0];
        assert_eq!(entry.messages.len(), 2);
        assert_eq!(entry.title, "what is the wea...");
        assert_eq!(store.active_id(), Some(entry.id));
    }

    #[test]
    fn short_openers_still_get_the_ellipsis() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "hi", "hello");
        assert_eq!(store.history()[0].title, "hi...");
    }

    #[test]
    fn later_exchanges_update_only_the_active_entry() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "first topic", "a");
        store.start_new();
        exchange(&mut store, "second topic", "b");

        let second_id = store.active_id().unwrap();
        exchange(&mut store, "follow-up", "c");

        assert_eq!(store.history().len(), 2);
        // Newest first: the second conversation sits at the front.
        assert_eq!(store.history()[0].id, second_id);
        assert_eq!(store.history()[0].messages.len(), 4);
        assert_eq!(store.history()[1].messages.len(), 2);
        assert_eq!(store.history()[1].title, "first topic...");
    }

    #[test]
    fn titles_are_never_recomputed() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "original opener", "a");
        exchange(&mut store, "a much later message with a different prefix", "b");
        assert_eq!(store.history()[0].title, "original opener...");
    }

    #[test]
    fn select_restores_the_stored_transcript() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "first topic", "a");
        let first_id = store.active_id().unwrap();
        store.start_new();
        exchange(&mut store, "second topic", "b");

        assert!(store.select(first_id));
        assert_eq!(store.active_id(), Some(first_id));
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.messages()[0].content, "first topic");
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn selected_conversations_keep_extending_their_record() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "first topic", "a");
        let first_id = store.active_id().unwrap();
        store.start_new();
        exchange(&mut store, "second topic", "b");

        store.select(first_id);
        exchange(&mut store, "back again", "c");

        assert_eq!(store.history().len(), 2);
        let first = store.history().iter().find(|c| c.id == first_id).unwrap();
        assert_eq!(first.messages.len(), 4);
        assert_eq!(first.messages[2].content, "back again");
    }

    #[test]
    fn select_of_an_unknown_id_is_a_noop() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "topic", "a");
        let before = store.active_id();
        assert!(!store.select(-1));
        assert_eq!(store.active_id(), before);
    }

    #[test]
    fn stale_replies_are_dropped_after_start_new() {
        let mut store = ConversationStore::new();
        let pending = store.submit("going nowhere").unwrap();
        store.start_new();
        assert!(!store.resolve(&pending, "too late"));
        assert!(store.messages().is_empty());
        assert!(store.history().is_empty());
    }

    #[test]
    fn stale_replies_are_dropped_after_select() {
        let mut store = ConversationStore::new();
        exchange(&mut store, "first topic", "a");
        let first_id = store.active_id().unwrap();
        store.start_new();

        let pending = store.submit("in flight").unwrap();
        store.select(first_id);
        assert!(!store.resolve(&pending, "too late"));
        assert_eq!(store.messages().len(), 2);
        assert_eq!(store.history()[0].messages.len(), 2);
    }

    #[test]
    fn replies_within_the_same_conversation_still_land() {
        let mut store = ConversationStore::new();
        let first = store.submit("one").unwrap();
        let second = store.submit("two").unwrap();
        assert!(store.resolve(&first, "reply one"));
        assert!(store.resolve(&second, "reply two"));
        assert_eq!(store.messages().len(), 4);
    }

    #[test]
    fn title_counts_characters_not_bytes() {
        assert_eq!(conversation_title("héllo wörld pâté"), "héllo wörld pât...");
    }
}

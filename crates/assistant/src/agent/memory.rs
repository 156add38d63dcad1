//! Per-session conversation memory.

use fiscal_llm::ChatMessage;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

/// Conversation history keyed by session id.
///
/// Each session keeps at most `max_history` messages (oldest dropped first);
/// 0 keeps everything. At most `max_sessions` sessions are held; recording
/// into a new session beyond that evicts the least recently used one.
#[derive(Debug)]
pub struct SessionMemory {
    sessions: Mutex<LruCache<String, Vec<ChatMessage>>>,
    max_history: usize,
}

impl SessionMemory {
    /// A `max_sessions` of 0 is treated as 1.
    pub fn new(max_history: usize, max_sessions: usize) -> Self {
        let capacity = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            max_history,
        }
    }

    /// Copy of a session's history, empty for unknown sessions.
    pub async fn history(&self, session: &str) -> Vec<ChatMessage> {
        self.sessions
            .lock()
            .await
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    /// Append one exchange to a session.
    pub async fn record(&self, session: &str, input: &str, output: &str) {
        let mut sessions = self.sessions.lock().await;
        if !sessions.contains(session) {
            if let Some((evicted, _)) = sessions.push(session.to_string(), Vec::new()) {
                tracing::debug!("Session limit reached, dropped session {}", evicted);
            }
        }

        if let Some(history) = sessions.get_mut(session) {
            history.push(ChatMessage::user(input));
            history.push(ChatMessage::assistant(output));

            if self.max_history > 0 && history.len() > self.max_history {
                let excess = history.len() - self.max_history;
                history.drain(..excess);
            }
        }
    }

    /// Forget a session.
    pub async fn clear(&self, session: &str) {
        self.sessions.lock().await.pop(session);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_llm::ChatRole;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let memory = SessionMemory::new(20, 100);
        memory.record("a", "Qu'est-ce que la TVA ?", "Une taxe sur la consommation.").await;
        memory.record("b", "Et la patente ?", "Un impôt local.").await;

        let a = memory.history("a").await;
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].role, ChatRole::User);
        assert_eq!(a[1].content, "Une taxe sur la consommation.");
        assert_eq!(memory.history("b").await[0].content, "Et la patente ?");
        assert!(memory.history("c").await.is_empty());
        assert_eq!(memory.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let memory = SessionMemory::new(4, 100);
        for i in 0..5 {
            memory.record("s", &format!("q{}", i), &format!("r{}", i)).await;
        }

        let history = memory.history("s").await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "q3");
        assert_eq!(history[3].content, "r4");
    }

    #[tokio::test]
    async fn test_clear_session() {
        let memory = SessionMemory::new(0, 100);
        memory.record("s", "q", "r").await;
        memory.clear("s").await;
        assert!(memory.history("s").await.is_empty());
    }

    #[tokio::test]
    async fn test_session_count_stays_at_cap() {
        let memory = SessionMemory::new(20, 3);
        for i in 0..50 {
            memory.record(&format!("s{}", i), "q", "r").await;
        }

        assert_eq!(memory.session_count().await, 3);
        assert!(memory.history("s0").await.is_empty());
        assert_eq!(memory.history("s49").await.len(), 2);
    }

    #[tokio::test]
    async fn test_active_session_survives_eviction() {
        let memory = SessionMemory::new(20, 2);
        memory.record("a", "q1", "r1").await;
        memory.record("b", "q1", "r1").await;
        // touching "a" makes "b" the least recently used
        memory.history("a").await;
        memory.record("c", "q1", "r1").await;

        assert_eq!(memory.history("a").await.len(), 2);
        assert!(memory.history("b").await.is_empty());
    }
}

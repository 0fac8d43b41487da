//! Follow-up chat.
//!
//! Replies are canned and local. Nothing here calls the provider.

use std::sync::{Mutex, MutexGuard};
use studybro_core::chat::ChatMessage;
use studybro_core::doubt::Language;

const CANNED_REPLY_EN: &str =
    "Of course! Let me explain that further. What specific part would you like more details on?";
const CANNED_REPLY_BN: &str =
    "অবশ্যই! আমি আরও বিস্তারিতভাবে বোঝাচ্ছি। কোন অংশটি নিয়ে তোমার আরও জানার আছে?";

/// The follow-up conversation of a session.
#[derive(Debug, Default)]
pub struct ChatService {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ChatService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records the student's message and returns the canned reply.
    ///
    /// Blank messages are ignored.
    pub fn send(&self, text: &str, language: Language) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let reply = ChatMessage::model(language.localize(CANNED_REPLY_EN, CANNED_REPLY_BN));
        let mut messages = self.lock();
        messages.push(ChatMessage::user(text));
        messages.push(reply.clone());
        Some(reply)
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybro_core::chat::ChatRole;

    #[test]
    fn test_reply_follows_language() {
        let chat = ChatService::new();

        let reply = chat.send("Why is the sky blue?", Language::English).unwrap();
        assert_eq!(reply.role, ChatRole::Model);
        assert!(reply.text.starts_with("Of course!"));

        let reply = chat.send("আবার বলো", Language::Bengali).unwrap();
        assert!(reply.text.starts_with("অবশ্যই!"));

        let reply = chat.send("abar bolo", Language::Banglish).unwrap();
        assert!(reply.text.starts_with("অবশ্যই!"));
    }

    #[test]
    fn test_conversation_is_recorded_in_order() {
        let chat = ChatService::new();
        chat.send("  first  ", Language::English);
        assert!(chat.send("   ", Language::English).is_none());

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::user("first"));
        assert_eq!(messages[1].role, ChatRole::Model);

        chat.clear();
        assert!(chat.messages().is_empty());
    }
}

//! Chat payloads and the tutor system prompt.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed tutor persona. Always sent first; callers cannot replace it.
pub const SYSTEM_PROMPT: &str = "Sen \"Fizika Lab\" ta'lim platformasining AI yordamchisisan. \
Vazifang: o'quvchilarga fizikani sodda va tushunarli tilda tushuntirish. \
Qoidalar: \
1. Har doim o'zbek tilida javob ber. \
2. Matematik ifodalarni LaTeX ko'rinishida yoz: qator ichida $...$, alohida qatorda $$...$$. \
3. Murakkab mavzularni bosqichma-bosqich tushuntir va hayotiy misollar keltir. \
4. Masala yechganda berilgan, formula, hisoblash va javob qismlarini ajratib ko'rsat. \
5. Javoblarni qisqa va aniq tut; kerak bo'lsa ro'yxatlardan foydalan. \
6. Fizikaga aloqasi bo'lmagan savollarda muloyimlik bilan fizika mavzusiga qaytar.";

/// One conversation turn. `content` and any extra fields are forwarded as the caller sent them,
/// so content-part arrays and per-message options reach the upstream untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Value::String(content.into()),
            extra: Map::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Inbound body: the conversation so far.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Body sent to the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl CompletionRequest {
    /// Prepends [`SYSTEM_PROMPT`] to the caller's history and requests streaming.
    pub fn streaming(model: &str, history: Vec<ChatMessage>) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(history);
        Self {
            model: model.to_string(),
            messages,
            stream: true,
        }
    }
}

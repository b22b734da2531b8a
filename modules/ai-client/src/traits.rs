use async_trait::async_trait;

/// Role of a single turn in a prompt sent to a text-to-JSON model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// A provider-agnostic text-to-JSON model call: one system instruction, one
/// user body, one text response. Retries, circuit-breaking, and JSON
/// leniency are the caller's concern (see the classifier crate) — this
/// trait is deliberately narrow so any OpenAI-compatible backend can stand
/// in behind it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<String>;
}

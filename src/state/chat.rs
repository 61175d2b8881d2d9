//! Chat modes and the append-only conversation transcript

use serde::{Deserialize, Serialize};

/// Assistant mode selecting one of the fixed prompt prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatMode {
    RecipeIdeas,
    CookingTips,
    Substitutes,
}

impl ChatMode {
    /// The fixed prefix prepended to the user's text before it is sent
    /// to the model
    pub fn prompt_prefix(self) -> &'static str {
        match self {
            ChatMode::RecipeIdeas => "Suggest a recipe idea based on:",
            ChatMode::CookingTips => "Give a cooking technique or safety tip about:",
            ChatMode::Substitutes => "Suggest a substitute for:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Append-only chat history for one session
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one user/assistant exchange, in order.
    pub fn record_exchange(&mut self, user_text: &str, reply: &str) {
        self.turns.push(ChatTurn {
            role: Role::User,
            content: user_text.to_string(),
        });
        self.turns.push(ChatTurn {
            role: Role::Assistant,
            content: reply.to_string(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

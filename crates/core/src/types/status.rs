//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Chat transcript role for the conversational agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Role name as used by the Messages API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_role_serialization() {
        let json = serde_json::to_string(&ChatRole::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
        assert_eq!(ChatRole::User.as_str(), "user");
    }
}

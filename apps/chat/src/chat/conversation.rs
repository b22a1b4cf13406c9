use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl FromStr for Role {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(ChatError::invalid_messages()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Caller-supplied turns, ready to follow the system prompt.
///
/// Invariant: never empty, and the last turn is authored by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new(turns: Vec<ConversationTurn>) -> Result<Self, ChatError> {
        let ends_with_user = turns.last().is_some_and(|t| t.role == Role::User);
        if !ends_with_user {
            return Err(ChatError::invalid_messages());
        }
        Ok(Self { turns })
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The question being answered right now.
    pub fn question(&self) -> &str {
        self.turns
            .last()
            .map(|t| t.content.as_str())
            .unwrap_or_default()
    }

    pub fn user_turns(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::User).count()
    }

    pub fn into_turns(self) -> Vec<ConversationTurn> {
        self.turns
    }
}

/// A validated inbound chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub conversation: Conversation,
    pub session_id: Option<String>,
}

/// Parses and normalizes a raw request body.
///
/// Two shapes are accepted:
/// - `{"messages": [{"role": ..., "content": ...}, ...]}` (multi-turn). Turns
///   with a missing or empty role, or missing or blank content, are dropped;
///   content is trimmed.
/// - `{"message": "..."}` (legacy single turn), used only when `messages` is
///   not a non-empty array.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, ChatError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ChatError::invalid_messages())?;
    let Value::Object(fields) = value else {
        return Err(ChatError::invalid_messages());
    };

    let submitted = fields
        .get("messages")
        .and_then(Value::as_array)
        .filter(|turns| !turns.is_empty());

    let turns = match submitted {
        Some(raw_turns) => normalize_turns(raw_turns)?,
        None => fields
            .get("message")
            .and_then(trimmed_str)
            .map(|message| vec![ConversationTurn::new(Role::User, message)])
            .unwrap_or_default(),
    };

    let session_id = fields
        .get("sessionId")
        .and_then(trimmed_str)
        .map(str::to_string);

    Ok(ChatRequest {
        conversation: Conversation::new(turns)?,
        session_id,
    })
}

fn normalize_turns(raw_turns: &[Value]) -> Result<Vec<ConversationTurn>, ChatError> {
    let mut turns = Vec::with_capacity(raw_turns.len());
    for raw in raw_turns {
        let role = raw
            .get("role")
            .and_then(Value::as_str)
            .filter(|r| !r.is_empty());
        let content = raw.get("content").and_then(trimmed_str);
        if let (Some(role), Some(content)) = (role, content) {
            turns.push(ConversationTurn::new(role.parse()?, content));
        }
    }
    Ok(turns)
}

fn trimmed_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<ChatRequest, ChatError> {
        parse_chat_request(body.as_bytes())
    }

    #[test]
    fn test_legacy_message_becomes_single_user_turn() {
        let request = parse(r#"{"message": "  Where do you work?  "}"#).unwrap();
        assert_eq!(
            request.conversation.turns(),
            &[ConversationTurn::new(Role::User, "Where do you work?")]
        );
        assert_eq!(request.session_id, None);
    }

    #[test]
    fn test_multi_turn_is_kept_in_order() {
        let request = parse(
            r#"{"messages": [
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "b"},
                {"role": "user", "content": "c"}
            ], "sessionId": "s-1"}"#,
        )
        .unwrap();
        let roles: Vec<Role> = request.conversation.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(request.conversation.question(), "c");
        assert_eq!(request.conversation.user_turns(), 2);
        assert_eq!(request.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn test_trailing_assistant_turn_is_rejected() {
        let err = parse(
            r#"{"messages": [
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "b"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[test]
    fn test_blank_and_roleless_turns_are_dropped() {
        let request = parse(
            r#"{"messages": [
                {"role": "assistant", "content": "   "},
                {"content": "no role"},
                {"role": "", "content": "empty role"},
                42,
                {"role": "user", "content": " hi "}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            request.conversation.into_turns(),
            vec![ConversationTurn::new(Role::User, "hi")]
        );
    }

    #[test]
    fn test_filtering_to_nothing_is_rejected() {
        // A non-empty `messages` array takes precedence over `message`.
        let err = parse(r#"{"messages": [{"role": "user", "content": ""}], "message": "hi"}"#)
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[test]
    fn test_empty_messages_array_falls_back_to_message() {
        let request = parse(r#"{"messages": [], "message": "hi"}"#).unwrap();
        assert_eq!(request.conversation.question(), "hi");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = parse(r#"{"messages": [{"role": "tool", "content": "x"}, {"role": "user", "content": "y"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[test]
    fn test_missing_or_malformed_body_is_validation_error() {
        for body in ["", "{}", "not json", "[]", "null", r#"{"message": "   "}"#, r#"{"message": 7}"#] {
            assert!(
                matches!(parse(body), Err(ChatError::Validation(_))),
                "body {body:?} should be rejected"
            );
        }
    }
}

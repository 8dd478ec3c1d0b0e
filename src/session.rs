use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::errors::ApiError;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// Synthesized first turn of every fresh conversation.
pub const GREETING: &str = "안녕하세요! AIRA 시스템입니다. \n\nMSA 환경에서 핸드폰 개통 시 발생하는 문제점이나 에러에 대해 질문해주세요.\n\n**예시 질문:**\n- '신규개통 시 본인인증이 안 돼요'\n- 'MSA-001 에러가 발생했어요'\n- '번호이동 중에 오류가 생겼어요'\n- '시스템 상태는 어떤가요?'";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub text: String,
}

/// One session's append-only chat log, owned exclusively by that session.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    fn new(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            turns: vec![ConversationTurn {
                role: ROLE_ASSISTANT.to_string(),
                text: GREETING.to_string(),
            }],
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn latest_assistant_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == ROLE_ASSISTANT)
            .map(|turn| turn.text.as_str())
    }
}

/// In-process registry of live conversations, keyed by session id.
///
/// Each session is mutated only by its own sequential turn flow; the lock
/// just arbitrates between independent sessions sharing the map.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Conversation>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its id plus the synthesized greeting log.
    pub async fn create(&self) -> (String, Vec<ConversationTurn>) {
        let id = uuid::Uuid::new_v4().to_string();
        let conversation = Conversation::new(id.clone());
        let turns = conversation.turns.clone();
        self.sessions
            .write()
            .await
            .insert(id.clone(), conversation);
        (id, turns)
    }

    pub async fn messages(&self, id: &str) -> Result<Vec<ConversationTurn>, ApiError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .map(|c| c.turns.clone())
            .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Append one completed exchange (user turn, then assistant turn).
    pub async fn append_exchange(
        &self,
        id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), ApiError> {
        let mut sessions = self.sessions.write().await;
        let conversation = sessions
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))?;

        conversation.turns.push(ConversationTurn {
            role: ROLE_USER.to_string(),
            text: user_text.to_string(),
        });
        conversation.turns.push(ConversationTurn {
            role: ROLE_ASSISTANT.to_string(),
            text: assistant_text.to_string(),
        });
        Ok(())
    }

    pub async fn latest_assistant_reply(&self, id: &str) -> Result<Option<String>, ApiError> {
        let sessions = self.sessions.read().await;
        let conversation = sessions
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))?;
        Ok(conversation.latest_assistant_reply().map(|s| s.to_string()))
    }

    /// Reset removes the session entirely; a subsequent create starts fresh
    /// with a new greeting.
    pub async fn reset(&self, id: &str) -> Result<(), ApiError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))
    }
}

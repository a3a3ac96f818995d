//! Chat request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SourceCitation;
use crate::infrastructure::services::RagAnswer;

/// POST /chat body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// POST /chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub sources: Vec<String>,
    pub citations: Vec<SourceCitation>,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
}

impl From<RagAnswer> for ChatResponse {
    fn from(answer: RagAnswer) -> Self {
        Self {
            response: answer.answer,
            sources: answer.sources,
            citations: answer.citations,
            conversation_id: answer.conversation_id,
            timestamp: answer.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_is_optional() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"When?"}"#).unwrap();
        assert_eq!(request.message, "When?");
        assert!(request.conversation_id.is_none());
    }

    #[test]
    fn test_response_from_answer() {
        let answer = RagAnswer {
            answer: "In 1815.".to_string(),
            sources: vec!["treaty.pdf (Page 4)".to_string()],
            citations: vec![],
            passages: vec![],
            conversation_id: "abc".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(ChatResponse::from(answer)).unwrap();
        assert_eq!(json["response"], "In 1815.");
        assert_eq!(json["sources"][0], "treaty.pdf (Page 4)");
        assert_eq!(json["conversation_id"], "abc");
        assert!(json.get("passages").is_none());
    }
}

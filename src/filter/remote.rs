use crate::llm::{ChatClient, ChatMessage, LlmResult};
use async_trait::async_trait;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a smart log filtering assistant.";

/// A strategy that proposes log lines topically related to a keyword.
///
/// Implementations return candidate lines only; nothing here verifies that a
/// returned line is verbatim from the document. The merge resolver rejects
/// anything that does not trim-match an original line.
#[async_trait]
pub trait RelevanceFilter: Send + Sync {
    /// Candidate lines related to `keyword`, trimmed, empties dropped.
    async fn find_related(&self, log_text: &str, keyword: &str) -> LlmResult<Vec<String>>;

    /// Strategy name for logs and metrics
    fn name(&self) -> &str;
}

/// Relevance filter backed by a chat-completions deployment.
pub struct LlmRelevanceFilter {
    client: ChatClient,
}

impl LlmRelevanceFilter {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    fn keyword_instruction(keyword: &str) -> String {
        format!(
            "Filter all lines related to or containing \"{keyword}\" from the above logs. \
             Return only exact original lines, unmodified, one per line. \
             Return nothing if no lines qualify."
        )
    }

    /// Split a free-form completion into candidate lines.
    fn parse_response(content: &str) -> Vec<String> {
        content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl RelevanceFilter for LlmRelevanceFilter {
    async fn find_related(&self, log_text: &str, keyword: &str) -> LlmResult<Vec<String>> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(log_text),
            ChatMessage::user(Self::keyword_instruction(keyword)),
        ];

        let content = self.client.chat(messages).await?;
        let candidates = Self::parse_response(&content);

        debug!(
            keyword = %keyword,
            candidates = candidates.len(),
            "Remote relevance response parsed"
        );

        Ok(candidates)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_trims_and_drops_empties() {
        let content = "  WARN disk full  \n\nERROR disk crash\n   \n";
        let parsed = LlmRelevanceFilter::parse_response(content);

        assert_eq!(parsed, vec!["WARN disk full", "ERROR disk crash"]);
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(LlmRelevanceFilter::parse_response("").is_empty());
        assert!(LlmRelevanceFilter::parse_response("\n\n  \n").is_empty());
    }

    #[test]
    fn test_keyword_instruction_names_the_keyword() {
        let instruction = LlmRelevanceFilter::keyword_instruction("disk");
        assert!(instruction.contains("\"disk\""));
        assert!(instruction.contains("exact original lines"));
    }
}

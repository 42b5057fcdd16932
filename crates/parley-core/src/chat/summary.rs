//! Chat summary generation via the model gateway.
//!
//! When a session is rotated out, the model is asked for a very short,
//! title-cased description of the conversation so far. The summary is what
//! chat listings display.

use parley_types::llm::GatewayError;

use crate::llm::box_gateway::BoxModelGateway;
use crate::llm::context::ConversationContext;

/// Instruction appended as a final user turn when asking for a summary.
pub const SUMMARY_PROMPT: &str = "Summarize this conversation in less than 5 words. Don't use emojis or punctuation. Write the summary in title case.";

/// Ask the model to summarize the conversation held in `context`.
///
/// The context is not modified: the summary request and its answer never
/// become part of the conversation.
#[tracing::instrument(
    name = "summarize_conversation",
    skip(gateway, context),
    fields(model = %gateway.model(), turns = context.turns().len())
)]
pub async fn summarize_conversation(
    gateway: &BoxModelGateway,
    context: &ConversationContext,
) -> Result<String, GatewayError> {
    let raw = context.preview(gateway, SUMMARY_PROMPT).await?;
    Ok(clean_summary(&raw))
}

/// Strip whitespace and surrounding quotes from a model-written summary.
pub fn clean_summary(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::ScriptedGateway;
    use parley_types::llm::Message;

    #[test]
    fn test_clean_summary_trailing_newline() {
        assert_eq!(clean_summary("Weekend Trip Planning\n\n"), "Weekend Trip Planning");
    }

    #[test]
    fn test_clean_summary_quotes() {
        assert_eq!(clean_summary("  \"Rust Lifetimes\"  "), "Rust Lifetimes");
        assert_eq!(clean_summary("'Quantum Basics'"), "Quantum Basics");
    }

    #[test]
    fn test_summary_prompt_constraints() {
        assert!(SUMMARY_PROMPT.contains("less than 5 words"));
        assert!(SUMMARY_PROMPT.contains("title case"));
        assert!(SUMMARY_PROMPT.contains("emojis or punctuation"));
    }

    #[tokio::test]
    async fn test_summarize_sends_history_plus_prompt() {
        let scripted = ScriptedGateway::default();
        scripted.reply("Greeting Exchange\n");
        let gateway = BoxModelGateway::new(scripted.clone());
        let context = ConversationContext::new(&[Message::user("hi"), Message::model("hello")]);

        let summary = summarize_conversation(&gateway, &context).await.unwrap();

        assert_eq!(summary, "Greeting Exchange");
        let requests = scripted.requests.lock().unwrap();
        assert_eq!(requests[0].len(), 3);
        assert_eq!(requests[0][2].text(), SUMMARY_PROMPT);
        assert_eq!(context.turns().len(), 2);
    }
}

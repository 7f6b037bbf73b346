use crate::api::ChatReply;
use crate::error::Error;
use crate::ui::TextInput;

/// Chat state. At most one exchange is retained; submitting a new question
/// discards the previous answer and attribution before the response
/// arrives.
#[derive(Debug, Default)]
pub struct AssistantPanel {
    pub input: TextInput,
    question: String,
    answer: String,
    attribution: String,
    loading: bool,
}

impl AssistantPanel {
    /// Begin a chat request. Blank input and an already in-flight question
    /// are both silent no-ops.
    pub fn submit(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        let question = self.input.text().trim().to_string();
        if question.is_empty() {
            return None;
        }
        self.loading = true;
        self.answer.clear();
        self.attribution.clear();
        self.question = question.clone();
        Some(question)
    }

    /// Settle the in-flight question. Loading always clears and the input
    /// is always reset, whatever the outcome.
    pub fn finish(&mut self, result: Result<ChatReply, Error>) {
        match result {
            Ok(reply) => {
                self.answer = reply.answer;
                self.attribution = reply.source;
            }
            Err(err) => {
                self.answer = format!("Error: {}", chat_error_text(&err));
                self.attribution.clear();
            }
        }
        self.loading = false;
        self.input.clear();
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }
}

/// Error text shown in place of an answer. The backend's `detail` message
/// wins; everything else collapses to a generic line.
fn chat_error_text(err: &Error) -> String {
    match err {
        Error::Api {
            detail: Some(detail),
            ..
        } => detail.clone(),
        Error::Api {
            status,
            detail: None,
        } => format!("server error (HTTP {status})"),
        _ => "request failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel_with_question(q: &str) -> AssistantPanel {
        let mut panel = AssistantPanel::default();
        for ch in q.chars() {
            panel.input.insert(ch);
        }
        panel
    }

    #[test]
    fn test_submit_sets_loading_synchronously() {
        let mut panel = panel_with_question("  what does main do?  ");
        let question = panel.submit();
        assert_eq!(question.as_deref(), Some("what does main do?"));
        assert!(panel.loading());
        assert_eq!(panel.question(), "what does main do?");
        assert_eq!(panel.answer(), "");
    }

    #[test]
    fn test_blank_question_is_a_silent_noop() {
        let mut panel = panel_with_question("   ");
        assert_eq!(panel.submit(), None);
        assert!(!panel.loading());
        assert_eq!(panel.input.text(), "   ");
    }

    #[test]
    fn test_in_flight_question_blocks_resubmit() {
        let mut panel = panel_with_question("first");
        assert!(panel.submit().is_some());

        panel.input.clear();
        for ch in "second".chars() {
            panel.input.insert(ch);
        }
        assert_eq!(panel.submit(), None);
    }

    #[test]
    fn test_success_replaces_exchange_and_resets_input() {
        let mut panel = panel_with_question("q");
        panel.submit();
        panel.finish(Ok(ChatReply {
            answer: "x".to_string(),
            source: "y".to_string(),
        }));

        assert_eq!(panel.answer(), "x");
        assert_eq!(panel.attribution(), "y");
        assert!(!panel.loading());
        assert_eq!(panel.input.text(), "");
    }

    #[test]
    fn test_backend_detail_becomes_the_answer() {
        let mut panel = panel_with_question("q");
        panel.submit();
        panel.finish(Err(Error::Api {
            status: 400,
            detail: Some("bad input".to_string()),
        }));

        assert_eq!(panel.answer(), "Error: bad input");
        assert_eq!(panel.attribution(), "");
        assert!(!panel.loading());
        assert_eq!(panel.input.text(), "");
    }

    #[test]
    fn test_detail_free_failure_falls_back_to_generic_message() {
        let mut panel = panel_with_question("q");
        panel.submit();
        panel.finish(Err(Error::Api {
            status: 500,
            detail: None,
        }));
        assert_eq!(panel.answer(), "Error: server error (HTTP 500)");

        let mut panel = panel_with_question("q");
        panel.submit();
        panel.finish(Err(Error::config("connection refused")));
        assert_eq!(panel.answer(), "Error: request failed");
        assert!(!panel.loading());
    }

    #[test]
    fn test_new_submission_discards_previous_exchange() {
        let mut panel = panel_with_question("first");
        panel.submit();
        panel.finish(Ok(ChatReply {
            answer: "old answer".to_string(),
            source: "old source".to_string(),
        }));

        for ch in "second".chars() {
            panel.input.insert(ch);
        }
        panel.submit();
        assert_eq!(panel.answer(), "");
        assert_eq!(panel.attribution(), "");
    }
}

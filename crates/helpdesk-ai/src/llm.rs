//! Generative classification stage.
//!
//! A completion model is asked for one canonical category name. The reply is
//! trusted only if, once trimmed, it is exactly one of the four literals.

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::Category;
use tracing::debug;

use crate::labels::classification_prompt;
use crate::{ClassifyError, Source, Stage};

/// A system/user prompt pair for a chat-style completion model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Returns the model's text reply to a prompt.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ClassifyError>;
}

pub struct LlmStage {
    completer: Arc<dyn Completer>,
}

impl LlmStage {
    pub fn new(completer: Arc<dyn Completer>) -> Self {
        Self { completer }
    }
}

/// Longest reply prefix echoed into logs.
const LOGGED_REPLY_CHARS: usize = 64;

#[async_trait]
impl Stage for LlmStage {
    fn source(&self) -> Source {
        Source::Llm
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn attempt(&self, description: &str) -> Result<Category, ClassifyError> {
        let prompt = classification_prompt(description);
        let reply = self.completer.complete(&prompt).await?;

        reply.trim().parse::<Category>().map_err(|_| {
            let shown: String = reply.chars().take(LOGGED_REPLY_CHARS).collect();
            debug!(reply = %shown, "model reply is not a category");
            ClassifyError::NoConfidentMatch
        })
    }
}

#[cfg(feature = "http")]
pub use http::HttpCompleter;

#[cfg(feature = "http")]
mod http {
    use std::fmt;

    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};

    use super::{Completer, Prompt};
    use crate::{ClassifyError, RemoteModelConfig};

    /// Category names are short; leave headroom for stray whitespace.
    const MAX_TOKENS: u32 = 16;

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: [ChatMessage<'a>; 2],
        temperature: f32,
        max_tokens: u32,
    }

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'static str,
        content: &'a str,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ReplyMessage,
    }

    #[derive(Deserialize)]
    struct ReplyMessage {
        content: Option<String>,
    }

    /// Completer backed by an OpenAI-compatible chat completions endpoint.
    pub struct HttpCompleter {
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        model: String,
    }

    impl fmt::Debug for HttpCompleter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("HttpCompleter")
                .field("endpoint", &self.endpoint)
                .field("model", &self.model)
                .finish()
        }
    }

    impl HttpCompleter {
        pub fn new(config: &RemoteModelConfig) -> Self {
            Self {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }
        }
    }

    #[async_trait]
    impl Completer for HttpCompleter {
        async fn complete(&self, prompt: &Prompt) -> Result<String, ClassifyError> {
            let body = ChatRequest {
                model: &self.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: &prompt.system,
                    },
                    ChatMessage {
                        role: "user",
                        content: &prompt.user,
                    },
                ],
                temperature: 0.0,
                max_tokens: MAX_TOKENS,
            };

            let resp = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ClassifyError::from_status(status.as_u16(), body));
            }

            let parsed: ChatResponse = resp.json().await?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .ok_or_else(|| {
                    ClassifyError::RemoteMalformedResponse("no message content in reply".into())
                })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{body_partial_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn config(server: &MockServer) -> RemoteModelConfig {
            RemoteModelConfig {
                endpoint: format!("{}/v1/chat/completions", server.uri()),
                api_key: "llm-key".into(),
                model: "tiny".into(),
            }
        }

        fn prompt() -> Prompt {
            Prompt {
                system: "sys".into(),
                user: "usr".into(),
            }
        }

        #[tokio::test]
        async fn returns_first_choice_content() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/chat/completions"))
                .and(header("authorization", "Bearer llm-key"))
                .and(body_partial_json(json!({
                    "model": "tiny",
                    "messages": [
                        { "role": "system", "content": "sys" },
                        { "role": "user", "content": "usr" }
                    ]
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "choices": [ { "message": { "role": "assistant", "content": " BillingIssue\n" } } ]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let reply = HttpCompleter::new(&config(&server))
                .complete(&prompt())
                .await
                .unwrap();
            assert_eq!(reply, " BillingIssue\n");
        }

        #[tokio::test]
        async fn empty_choices_is_malformed() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
                .mount(&server)
                .await;

            let err = HttpCompleter::new(&config(&server))
                .complete(&prompt())
                .await
                .unwrap_err();
            assert!(matches!(err, ClassifyError::RemoteMalformedResponse(_)));
        }

        #[tokio::test]
        async fn forbidden_maps_to_auth_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(403))
                .mount(&server)
                .await;

            let err = HttpCompleter::new(&config(&server))
                .complete(&prompt())
                .await
                .unwrap_err();
            assert!(matches!(err, ClassifyError::RemoteAuth(403)));
        }

        #[tokio::test]
        async fn server_error_keeps_body() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
                .mount(&server)
                .await;

            let err = HttpCompleter::new(&config(&server))
                .complete(&prompt())
                .await
                .unwrap_err();
            match err {
                ClassifyError::RemoteStatus { status, body } => {
                    assert_eq!(status, 500);
                    assert_eq!(body, "overloaded");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reply(&'static str);

    #[async_trait]
    impl Completer for Reply {
        async fn complete(&self, prompt: &Prompt) -> Result<String, ClassifyError> {
            assert!(prompt.user.contains("GeneralInquiry"));
            Ok(self.0.to_string())
        }
    }

    async fn run(reply: &'static str) -> Result<Category, ClassifyError> {
        LlmStage::new(Arc::new(Reply(reply)))
            .attempt("the app keeps crashing")
            .await
    }

    #[tokio::test]
    async fn exact_reply_is_accepted() {
        assert_eq!(run("TechnicalIssue").await.unwrap(), Category::TechnicalIssue);
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_trimmed() {
        assert_eq!(run("  AccountIssue\n").await.unwrap(), Category::AccountIssue);
    }

    #[tokio::test]
    async fn free_text_is_a_miss() {
        assert!(run("Not sure").await.unwrap_err().is_miss());
    }

    #[tokio::test]
    async fn wrong_case_is_a_miss() {
        assert!(run("technicalissue").await.unwrap_err().is_miss());
    }

    #[tokio::test]
    async fn human_label_is_a_miss() {
        assert!(run("Billing Issue").await.unwrap_err().is_miss());
    }
}

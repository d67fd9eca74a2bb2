//! HTTP mail relay client.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::{Notification, Notifier, NotifyError};

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts notifications as JSON to a mail relay's send endpoint.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
    api_key: Option<String>,
}

impl fmt::Debug for HttpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMailer")
            .field("endpoint", &self.endpoint)
            .field("from", &self.from)
            .finish()
    }
}

impl HttpMailer {
    /// `endpoint` is the relay's full send URL, e.g. `http://localhost:8025/api/send`.
    pub fn new(endpoint: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            from,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = RelayMessage {
            from: &self.from,
            to: &notification.to,
            subject: &notification.subject,
            text: &notification.body,
        };

        let mut req = self.client.post(&self.endpoint).json(&message);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Relay {
                status: status.as_u16(),
                body,
            });
        }

        info!(to = %notification.to, subject = %notification.subject, "notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification() -> Notification {
        Notification {
            to: "dana@example.com".into(),
            subject: "Ticket Updated".into(),
            body: "Your ticket \"VPN drops\" has been updated. New status: closed.".into(),
        }
    }

    #[tokio::test]
    async fn posts_message_to_relay() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/send"))
            .and(header("authorization", "Bearer relay-key"))
            .and(body_json(json!({
                "from": "helpdesk@example.com",
                "to": "dana@example.com",
                "subject": "Ticket Updated",
                "text": "Your ticket \"VPN drops\" has been updated. New status: closed."
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = HttpMailer::new(
            format!("{}/api/send", server.uri()),
            "helpdesk@example.com".into(),
        )
        .with_api_key("relay-key".into());
        mailer.send(&notification()).await.unwrap();
    }

    #[tokio::test]
    async fn relay_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("mailbox unavailable"))
            .mount(&server)
            .await;

        let mailer = HttpMailer::new(server.uri(), "helpdesk@example.com".into());
        match mailer.send(&notification()).await.unwrap_err() {
            NotifyError::Relay { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "mailbox unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mailer_trims_trailing_slash() {
        let mailer = HttpMailer::new("http://localhost:8025/api/send/".into(), "a@b".into());
        assert_eq!(mailer.endpoint, "http://localhost:8025/api/send");
    }

    #[test]
    fn debug_omits_api_key() {
        let mailer = HttpMailer::new("http://x".into(), "a@b".into()).with_api_key("secret".into());
        assert!(!format!("{mailer:?}").contains("secret"));
    }
}

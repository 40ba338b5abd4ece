//! Transactional mail client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::domain::ports::{MessageTransport, OutboundMessage};
use crate::error::TransportError;

/// Sends one JSON request per message to a transactional-mail API
pub struct HttpMailTransport {
    http: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailTransport {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Map a mail API response status to a send result. 4xx is about this one
/// message; 5xx means the service itself is down.
fn classify(status: StatusCode, message: String) -> Result<(), TransportError> {
    if status.is_success() {
        Ok(())
    } else if status.is_client_error() {
        Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(TransportError::Unavailable(format!(
            "{} - {}",
            status.as_u16(),
            message
        )))
    }
}

fn connect_error(e: reqwest::Error) -> TransportError {
    if e.is_connect() {
        TransportError::Unavailable(e.to_string())
    } else {
        TransportError::Request(e)
    }
}

#[async_trait]
impl MessageTransport for HttpMailTransport {
    async fn ensure_available(&self) -> Result<(), TransportError> {
        // Any HTTP answer means the service is reachable.
        let resp = self
            .http
            .head(&self.api_url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        if resp.status().is_server_error() {
            return Err(TransportError::Unavailable(format!(
                "mail API returned {}",
                resp.status().as_u16()
            )));
        }
        Ok(())
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if !message.to.contains('@') {
            return Err(TransportError::InvalidAddress(message.to.clone()));
        }

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SendMailRequest {
                from: &self.from,
                to: &message.to,
                subject: &message.subject,
                text: &message.body,
            })
            .send()
            .await
            .map_err(connect_error)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        classify(status, body)
    }
}

/// Used when no mail API is configured: logs each message and succeeds
pub struct NoopMessageTransport;

#[async_trait]
impl MessageTransport for NoopMessageTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        tracing::info!(
            recipient = %message.to,
            subject = %message.subject,
            "Mail not configured, skipping send"
        );
        Ok(())
    }
}

/// The transport chosen at startup from configuration
pub enum MailTransport {
    Http(HttpMailTransport),
    Noop(NoopMessageTransport),
}

#[async_trait]
impl MessageTransport for MailTransport {
    async fn ensure_available(&self) -> Result<(), TransportError> {
        match self {
            MailTransport::Http(t) => t.ensure_available().await,
            MailTransport::Noop(t) => t.ensure_available().await,
        }
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        match self {
            MailTransport::Http(t) => t.send(message).await,
            MailTransport::Noop(t) => t.send(message).await,
        }
    }
}

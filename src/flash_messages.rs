//! One-shot notices carried across a redirect in the session.

use ammonia::clean_text;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tower_sessions::Session;

const FLASH_MESSAGES_KEY: &str = "_flash_messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "notice notice-success",
            FlashLevel::Error => "notice notice-error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub content: String,
}

pub struct IncomingFlashMessages(VecDeque<FlashMessage>);

impl IncomingFlashMessages {
    pub fn iter(&self) -> impl Iterator<Item = &FlashMessage> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Escaped markup, one block per message.
    pub fn to_html(&self) -> String {
        self.iter()
            .map(|m| {
                format!(
                    r#"<div class="{}" role="status">{}</div>"#,
                    m.level.css_class(),
                    clean_text(&m.content)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S> FromRequestParts<S> for IncomingFlashMessages
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    /// Reading consumes the messages.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
            .clone();

        let messages = session
            .remove::<VecDeque<FlashMessage>>(FLASH_MESSAGES_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();

        Ok(IncomingFlashMessages(messages))
    }
}

pub struct FlashMessageSender {
    session: Session,
}

impl FlashMessageSender {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    async fn send(&self, message: FlashMessage) -> Result<(), tower_sessions::session::Error> {
        let mut messages: VecDeque<FlashMessage> = self
            .session
            .get(FLASH_MESSAGES_KEY)
            .await?
            .unwrap_or_default();
        messages.push_back(message);
        self.session.insert(FLASH_MESSAGES_KEY, messages).await
    }

    pub async fn error(
        &self,
        content: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        self.send(FlashMessage {
            level: FlashLevel::Error,
            content: content.into(),
        })
        .await
    }

    pub async fn success(
        &self,
        content: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        self.send(FlashMessage {
            level: FlashLevel::Success,
            content: content.into(),
        })
        .await
    }
}

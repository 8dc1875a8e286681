use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MESSAGE_BODY;
use crate::models::UserId;

/// A chat message as delivered by the message channel.
///
/// The channel pushes the full ordered list for a pair on every update, so
/// this type only carries what the watcher inspects: the id used as the
/// cursor, the author, and the content representations the alert body
/// falls back through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    pub id: Option<String>,
    pub sender_id: Option<UserId>,
    pub content: Option<String>,
    pub content_plain: Option<String>,
    pub content_preview: Option<String>,
    pub shared_content_type: Option<String>,
}

impl ChatMessage {
    /// Body text for the alert bubble: first non-empty of plain content,
    /// preview content, raw content, a synthesized `[Shared <type>]`, else
    /// a generic fallback.
    pub fn display_body(&self) -> String {
        for candidate in [&self.content_plain, &self.content_preview, &self.content] {
            if let Some(text) = candidate {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
        if let Some(kind) = &self.shared_content_type {
            if !kind.is_empty() {
                return format!("[Shared {kind}]");
            }
        }
        DEFAULT_MESSAGE_BODY.to_string()
    }
}

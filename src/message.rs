//! Header summary of a staged message, used to label log lines.

use mail_parser::MessageParser;

/// The few headers worth logging next to a staged file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSummary {
    pub message_id: Option<String>,
    pub from: Option<String>,
    pub subject: Option<String>,
}

impl MessageSummary {
    /// Best-effort parse; anything unreadable yields empty fields.
    pub fn parse(raw: &[u8]) -> Self {
        let Some(parsed) = MessageParser::default().parse(raw) else {
            return Self::default();
        };
        Self {
            message_id: parsed.message_id().map(str::to_string),
            from: parsed
                .from()
                .and_then(|addr| addr.first())
                .and_then(|a| a.address())
                .map(|s| s.to_string()),
            subject: parsed.subject().map(str::to_string),
        }
    }

    /// Message-ID for log fields, `-` when absent.
    pub fn id(&self) -> &str {
        self.message_id.as_deref().unwrap_or("-")
    }
}

use std::fmt;

use crate::split::RECORD_SEPARATOR;

/// One structured reply unit extracted from a model's raw reply.
///
/// Metadata is three-valued:  a field that was never declared in the block is `None`, which is
/// distinct from `Some(false)` for `ping` and from any number for `delay`.  Absent fields are
/// omitted when serialized rather than written as `null`.
///
/// # Example
///
/// ```
/// use replyblock::ReplyRecord;
///
/// let record = ReplyRecord::new("on my way")
///     .with_reply_to("abc123")
///     .with_ping(true);
/// assert_eq!(
///     serde_json::to_string(&record).unwrap(),
///     r#"{"replyTo":"abc123","ping":true,"message":"on my way"}"#,
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ReplyRecord {
    /// Identifier of the message being replied to.
    #[serde(rename = "replyTo", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Whether the reply should ping the author of the message it replies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<bool>,
    /// Delay before sending, always finite and strictly positive when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// The trimmed message body.
    pub message: String,
}

impl ReplyRecord {
    /// Create a record that carries only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the message this record replies to.
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Set the ping flag.
    pub fn with_ping(mut self, ping: bool) -> Self {
        self.ping = Some(ping);
        self
    }

    /// Set the delay.
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// True when the record would be dropped from parser output.
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    /// Render this record as a block in the format the parser reads.
    ///
    /// Header lines are written only for the fields that are present, followed by the
    /// `message:` line.  Records produced by [crate::parse] render to blocks that parse back to
    /// an equal record.
    pub fn to_block(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReplyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reply_to) = &self.reply_to {
            writeln!(f, "replyTo: {reply_to}")?;
        }
        if let Some(ping) = self.ping {
            writeln!(f, "ping: {ping}")?;
        }
        if let Some(delay) = self.delay {
            writeln!(f, "delay: {delay}")?;
        }
        write!(f, "message: {}", self.message)
    }
}

/// Render records as one raw reply, blocks separated by [RECORD_SEPARATOR].
pub fn render(records: &[ReplyRecord]) -> String {
    let separator = format!("\n{RECORD_SEPARATOR}\n");
    records
        .iter()
        .map(ReplyRecord::to_block)
        .collect::<Vec<_>>()
        .join(&separator)
}

#![deny(missing_docs)]

//! replyblock: split a model's raw reply into structured reply records.
//!
//! A model asked to answer in several messages writes one block per message.  Each block has an
//! optional header of metadata lines followed by a `message:` line that starts the body:
//!
//! ```text
//! replyTo: 1234
//! ping: true
//! delay: 1.5
//! message: Sure, one second.
//! ␞
//! message: Here is the config:
//! ```
//!
//! Blocks are separated by [RECORD_SEPARATOR] (␞).  Replies from producers that never adopted the
//! separator are split on `---` lines instead, skipping `---` inside fenced code.
//!
//! # Core Concepts
//!
//! - **Block**: a run of the reply that becomes at most one record; see [split].
//! - **Header**: `replyTo:`, `ping:` and `delay:` lines before `message:`; see [block].
//! - **ReplyRecord**: the structured result.  Metadata that was not declared is `None`.
//!
//! Parsing is lenient.  Bad metadata is ignored and blocks without a message are dropped, so
//! [parse] never fails.
//!
//! # Example
//!
//! ```
//! use replyblock::{parse, ReplyRecord};
//!
//! let records = parse("replyTo: abc123\nping: TRUE\nmessage: Hello\nworld\u{241E}message: bye");
//! assert_eq!(
//!     records,
//!     vec![
//!         ReplyRecord::new("Hello\nworld").with_reply_to("abc123").with_ping(true),
//!         ReplyRecord::new("bye"),
//!     ]
//! );
//! ```

pub mod block;
pub mod split;

mod errors;
mod record;

pub use block::parse_block;
pub use errors::InputError;
pub use record::{render, ReplyRecord};
pub use split::{split_blocks, SplitStrategy, RECORD_SEPARATOR};

////////////////////////////////////////////// parse ///////////////////////////////////////////////

/// Parse a raw reply into records, in block order.
///
/// Every returned record has a non-empty, trimmed message.  Metadata never carries over from one
/// block to the next.
pub fn parse(raw: &str) -> Vec<ReplyRecord> {
    split_blocks(raw)
        .into_iter()
        .map(parse_block)
        .filter(|record| {
            if record.is_empty() {
                tracing::debug!(reply_to = ?record.reply_to, "dropping block without a message");
                false
            } else {
                true
            }
        })
        .collect()
}

/// Parse a raw reply that has not been decoded yet.
///
/// # Errors
///
/// Returns [InputError::NotUtf8] when `raw` is not UTF-8.  Empty input, or input with no
/// messages in it, is not an error; it parses to no records.
pub fn parse_bytes(raw: &[u8]) -> Result<Vec<ReplyRecord>, InputError> {
    let raw = std::str::from_utf8(raw)?;
    Ok(parse(raw))
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

//! Parsing one block into a [ReplyRecord].
//!
//! A block is read line by line in one of two sections.  It starts in [Section::Header], where
//! `replyTo:`, `ping:` and `delay:` lines set metadata and every other line is dropped.  The first
//! `message:` line moves it to [Section::Body] for good; from there on, lines are message text
//! even when they look like metadata.

use crate::split::{is_space, trim};
use crate::ReplyRecord;

const REPLY_TO: &str = "replyTo:";
const PING: &str = "ping:";
const DELAY: &str = "delay:";
const MESSAGE: &str = "message:";

////////////////////////////////////////////// Section /////////////////////////////////////////////

/// Which part of a block is being read.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Section {
    /// Before the first `message:` line.
    #[default]
    Header,
    /// After the first `message:` line.  Terminal.
    Body,
}

impl Section {
    /// Classify `line` as read in this section.
    pub fn classify(self, line: &str) -> Line<'_> {
        if let Some(rest) = line.strip_prefix(MESSAGE) {
            return Line::Message(rest);
        }
        match self {
            Section::Body => Line::Text(line),
            Section::Header => {
                if let Some(rest) = line.strip_prefix(REPLY_TO) {
                    Line::ReplyTo(rest)
                } else if let Some(rest) = line.strip_prefix(PING) {
                    Line::Ping(rest)
                } else if let Some(rest) = line.strip_prefix(DELAY) {
                    Line::Delay(rest)
                } else {
                    Line::Ignored(line)
                }
            }
        }
    }

    /// The section the line after `line` is read in.
    pub fn next(self, line: &Line<'_>) -> Section {
        match line {
            Line::Message(_) => Section::Body,
            _ => self,
        }
    }
}

/////////////////////////////////////////////// Line ///////////////////////////////////////////////

/// A classified line.  Prefixed variants carry the text after the prefix, untrimmed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Line<'a> {
    /// `replyTo:` in the header.
    ReplyTo(&'a str),
    /// `ping:` in the header.
    Ping(&'a str),
    /// `delay:` in the header.
    Delay(&'a str),
    /// `message:` in either section.
    Message(&'a str),
    /// Any line of the body without the `message:` prefix.
    Text(&'a str),
    /// An unrecognized header line.
    Ignored(&'a str),
}

/////////////////////////////////////////// parse_block ////////////////////////////////////////////

/// Parse one block.
///
/// The returned record may have an empty message; [crate::parse] drops those.  Nothing here
/// fails:  unrecognized header lines are dropped and a `delay:` that is not a positive number
/// leaves the delay as it was.
pub fn parse_block(block: &str) -> ReplyRecord {
    let mut record = ReplyRecord::default();
    let mut section = Section::Header;
    let mut message = vec![];
    for line in trim(block).split('\n') {
        let classified = section.classify(line);
        match classified {
            Line::ReplyTo(rest) => {
                record.reply_to = Some(trim(rest).to_string());
            }
            Line::Ping(rest) => {
                record.ping = Some(trim(rest).to_lowercase() == "true");
            }
            Line::Delay(rest) => match parse_delay(rest) {
                Some(delay) => record.delay = Some(delay),
                None => tracing::debug!(value = trim(rest), "ignoring delay"),
            },
            Line::Message(rest) => {
                let rest = rest.trim_start_matches(is_space);
                if !rest.is_empty() {
                    message.push(rest);
                }
            }
            Line::Text(text) => {
                message.push(text);
            }
            Line::Ignored(text) => {
                tracing::trace!(line = text, "ignoring header line");
            }
        }
        section = section.next(&classified);
    }
    record.message = trim(&message.join("\n")).to_string();
    record
}

/// A delay is a finite number strictly greater than zero.
///
/// Besides decimal and exponent notation, unsigned `0x`, `0b` and `0o` integer literals are
/// numbers too.
fn parse_delay(value: &str) -> Option<f64> {
    let value = trim(value);
    let delay = match parse_radix_literal(value) {
        Some(delay) => delay,
        None => value.parse::<f64>().ok()?,
    };
    Some(delay).filter(|delay| delay.is_finite() && *delay > 0.0)
}

fn parse_radix_literal(value: &str) -> Option<f64> {
    let prefix = value.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0b" | "0B" => 2,
        "0o" | "0O" => 8,
        _ => return None,
    };
    let digits = &value[2..];
    // from_str_radix takes a sign; a radix literal has none.
    if digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_transitions_once() {
        let section = Section::default();
        assert_eq!(section, Section::Header);
        let line = section.classify("replyTo: x");
        assert_eq!(line, Line::ReplyTo(" x"));
        let section = section.next(&line);
        assert_eq!(section, Section::Header);
        let line = section.classify("message: hi");
        assert_eq!(line, Line::Message(" hi"));
        let section = section.next(&line);
        assert_eq!(section, Section::Body);
        let line = section.classify("replyTo: y");
        assert_eq!(line, Line::Text("replyTo: y"));
        assert_eq!(section.next(&line), Section::Body);
        assert_eq!(section.next(&Line::Message("")), Section::Body);
    }

    #[test]
    fn header_classification() {
        let header = Section::Header;
        assert_eq!(header.classify("ping: true"), Line::Ping(" true"));
        assert_eq!(header.classify("delay:2"), Line::Delay("2"));
        assert_eq!(header.classify("hello"), Line::Ignored("hello"));
        assert_eq!(header.classify(" replyTo: x"), Line::Ignored(" replyTo: x"));
        assert_eq!(header.classify("ReplyTo: x"), Line::Ignored("ReplyTo: x"));
    }

    #[test]
    fn next_line_is_not_whitespace() {
        let record = parse_block("replyTo: a\u{85}\nmessage: x\u{85}");
        assert_eq!(record.reply_to.as_deref(), Some("a\u{85}"));
        assert_eq!(record.message, "x\u{85}");
    }

    #[test]
    fn all_fields() {
        let record = parse_block("replyTo:  abc123 \nping: true\ndelay: 2\nmessage: hello");
        assert_eq!(
            record,
            ReplyRecord::new("hello")
                .with_reply_to("abc123")
                .with_ping(true)
                .with_delay(2.0)
        );
    }

    #[test]
    fn delay_bounds() {
        for value in ["0", "-5", "notanumber", "", "NaN", "inf", "-0.0"] {
            let record = parse_block(&format!("delay: {value}\nmessage: x"));
            assert_eq!(record.delay, None, "delay: {value}");
        }
        let record = parse_block("delay: 3.5\nmessage: x");
        assert_eq!(record.delay, Some(3.5));
        let record = parse_block("delay: 1e3\nmessage: x");
        assert_eq!(record.delay, Some(1000.0));
        for (value, expected) in [("0x10", 16.0), ("0XfF", 255.0), ("0b11", 3.0), ("0o7", 7.0)] {
            let record = parse_block(&format!("delay: {value}\nmessage: x"));
            assert_eq!(record.delay, Some(expected), "delay: {value}");
        }
        for value in ["0x", "0x0", "0x+10", "-0x10", "0b2", "0o8", "0xg"] {
            let record = parse_block(&format!("delay: {value}\nmessage: x"));
            assert_eq!(record.delay, None, "delay: {value}");
        }
    }

    #[test]
    fn invalid_delay_keeps_earlier_valid_delay() {
        let record = parse_block("delay: 4\ndelay: nope\nmessage: x");
        assert_eq!(record.delay, Some(4.0));
        let record = parse_block("delay: nope\ndelay: 4\nmessage: x");
        assert_eq!(record.delay, Some(4.0));
    }

    #[test]
    fn ping_is_case_insensitive() {
        for value in ["TRUE", "True", "  true  "] {
            let record = parse_block(&format!("ping: {value}\nmessage: x"));
            assert_eq!(record.ping, Some(true), "ping: {value}");
        }
        for value in ["yes", "", "1", "false", "truee"] {
            let record = parse_block(&format!("ping: {value}\nmessage: x"));
            assert_eq!(record.ping, Some(false), "ping: {value}");
        }
        assert_eq!(parse_block("message: x").ping, None);
    }

    #[test]
    fn last_header_wins() {
        let record = parse_block("replyTo: a\nreplyTo: b\nping: true\nping: no\nmessage: x");
        assert_eq!(record.reply_to.as_deref(), Some("b"));
        assert_eq!(record.ping, Some(false));
    }

    #[test]
    fn empty_reply_to_is_present() {
        let record = parse_block("replyTo:\nmessage: x");
        assert_eq!(record.reply_to.as_deref(), Some(""));
    }

    #[test]
    fn header_after_body_is_literal() {
        let record = parse_block("message: hi\nreplyTo: ignored\nping: true\ndelay: 5");
        assert_eq!(record.message, "hi\nreplyTo: ignored\nping: true\ndelay: 5");
        assert_eq!(record.reply_to, None);
        assert_eq!(record.ping, None);
        assert_eq!(record.delay, None);
    }

    #[test]
    fn later_message_prefix_is_stripped() {
        let record = parse_block("message: one\nmessage:   two\nmessage:\nthree");
        assert_eq!(record.message, "one\ntwo\nthree");
    }

    #[test]
    fn message_on_following_lines() {
        let record = parse_block("replyTo: m\nmessage:\n  indented\n\nafter blank\n");
        assert_eq!(record.message, "indented\n\nafter blank");
    }

    #[test]
    fn unrecognized_header_lines_are_dropped() {
        let record = parse_block("Sure, here you go!\nmessage: hi");
        assert_eq!(record, ReplyRecord::new("hi"));
    }

    #[test]
    fn header_only_block_is_empty() {
        assert!(parse_block("replyTo: x").is_empty());
        assert!(parse_block("ping: true\nmessage:\n\n   \n").is_empty());
        assert!(parse_block("just some chatter").is_empty());
    }

    #[test]
    fn block_is_trimmed_before_reading() {
        let record = parse_block("\n\n  replyTo: x\n  ping: true\nmessage: y\n\n");
        assert_eq!(record.reply_to.as_deref(), Some("x"));
        assert_eq!(record.ping, None);
        let record = parse_block("\n\nreplyTo: x\nmessage: y  \n\n");
        assert_eq!(record, ReplyRecord::new("y").with_reply_to("x"));
    }

    #[test]
    fn message_keeps_fenced_code() {
        let record = parse_block("message: look\n```yaml\n---\nkey: v\n```");
        assert_eq!(record.message, "look\n```yaml\n---\nkey: v\n```");
    }
}

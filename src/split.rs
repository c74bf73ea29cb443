//! Splitting a raw reply into blocks.
//!
//! A block is a contiguous run of the reply that becomes at most one [crate::ReplyRecord].  Two
//! independent splitters exist and exactly one of them runs for a given reply:
//!
//! - When the reply contains [RECORD_SEPARATOR] anywhere, it is split on that character and
//!   nothing else.  Fenced code is not considered; producers never put the separator in code.
//! - Otherwise the reply is split on `---` lines, skipping those inside fenced code blocks.  This
//!   path exists for producers that predate the separator.

/// The block delimiter: U+241E SYMBOL FOR RECORD SEPARATOR (␞).
///
/// It does not show up in prose, code, or markdown, and unlike the control character it stands
/// for it is visible when the raw reply is printed.
pub const RECORD_SEPARATOR: char = '\u{241E}';

/// Whitespace as seen by the splitter and the block parser.
///
/// This is Unicode whitespace plus the byte order mark, so replies read from files with a BOM
/// still start on a recognized header.  NEXT LINE (U+0085) is not whitespace here.
pub(crate) fn is_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/////////////////////////////////////////// SplitStrategy //////////////////////////////////////////

/// Which splitter handles a given reply.
#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum SplitStrategy {
    /// Split on every [RECORD_SEPARATOR].
    #[serde(rename = "record_separator")]
    RecordSeparator,
    /// Split on `---` lines outside fenced code blocks.
    #[serde(rename = "dashes_outside_fences")]
    DashesOutsideFences,
}

impl SplitStrategy {
    /// Pick the strategy for `raw`.  A single separator anywhere selects [Self::RecordSeparator].
    pub fn detect(raw: &str) -> Self {
        if raw.contains(RECORD_SEPARATOR) {
            SplitStrategy::RecordSeparator
        } else {
            SplitStrategy::DashesOutsideFences
        }
    }

    /// Run this strategy's splitter.  Empty and whitespace-only blocks are kept.
    pub fn split(self, raw: &str) -> Vec<&str> {
        match self {
            SplitStrategy::RecordSeparator => split_on_record_separator(raw),
            SplitStrategy::DashesOutsideFences => split_on_dashes_outside_fences(raw),
        }
    }
}

impl std::fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitStrategy::RecordSeparator => write!(f, "record separator"),
            SplitStrategy::DashesOutsideFences => write!(f, "dashes outside fences"),
        }
    }
}

//////////////////////////////////////////// splitters /////////////////////////////////////////////

/// Split `raw` into the blocks that will be parsed, in order.
///
/// Blocks that are empty or whitespace-only are discarded.
pub fn split_blocks(raw: &str) -> Vec<&str> {
    let strategy = SplitStrategy::detect(raw);
    let blocks = strategy.split(raw);
    let found = blocks.len();
    let blocks: Vec<&str> = blocks
        .into_iter()
        .filter(|block| !trim(block).is_empty())
        .collect();
    tracing::debug!(%strategy, found, kept = blocks.len(), "split reply into blocks");
    blocks
}

/// Split on every [RECORD_SEPARATOR], unconditionally.
pub fn split_on_record_separator(raw: &str) -> Vec<&str> {
    raw.split(RECORD_SEPARATOR).collect()
}

/// Split on lines that are exactly `---` (surrounding whitespace allowed), except inside fenced
/// code blocks.
///
/// Fence lines toggle a single in-fence flag and stay in the block that contains them.  Backtick
/// and tilde fences are interchangeable and a closing fence need not match the opening fence's
/// length.  Boundary lines belong to neither neighbouring block.
///
/// Every block is a slice of `raw`:  lines of a block are joined by the newlines that separated
/// them in the input.
pub fn split_on_dashes_outside_fences(raw: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut in_fence = false;
    // Byte range of the block being accumulated; `end` is None while it has no lines.
    let mut start = 0;
    let mut end: Option<usize> = None;
    let mut offset = 0;
    for line in raw.split('\n') {
        let line_end = offset + line.len();
        offset = line_end + 1;
        if is_fence_line(line) {
            in_fence = !in_fence;
            tracing::trace!(in_fence, line, "fence");
        } else if !in_fence && is_dash_boundary(line) {
            blocks.push(end.map_or("", |end| &raw[start..end]));
            start = offset;
            end = None;
            continue;
        }
        end = Some(line_end);
    }
    if let Some(end) = end {
        blocks.push(&raw[start..end]);
    }
    blocks
}

/// True for a line that opens or closes a fenced code block:  optional leading whitespace, then
/// at least three backticks or at least three tildes.  Anything may follow (e.g. a language tag).
pub fn is_fence_line(line: &str) -> bool {
    let line = line.trim_start_matches(is_space);
    line.starts_with("```") || line.starts_with("~~~")
}

/// True for a line that is exactly three hyphens once surrounding whitespace is removed.
pub fn is_dash_boundary(line: &str) -> bool {
    trim(line) == "---"
}

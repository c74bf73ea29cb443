////////////////////////////////////////////// InputError //////////////////////////////////////////////

/// Errors that can occur before any block splitting happens.
///
/// Lenient parsing means malformed metadata, unknown header lines, and empty blocks are never
/// errors; they only produce fewer records.  The one thing that cannot be parsed at all is input
/// that is not text.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum InputError {
    /// The raw reply was not valid UTF-8.
    NotUtf8 {
        /// Length of the longest valid UTF-8 prefix of the input.
        valid_up_to: usize,
    },
}

impl InputError {
    /// Create a NotUtf8 error from the standard library's decoding error.
    pub fn not_utf8(err: &std::str::Utf8Error) -> Self {
        Self::NotUtf8 {
            valid_up_to: err.valid_up_to(),
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::NotUtf8 { valid_up_to } => {
                write!(f, "reply is not valid UTF-8 (valid up to byte {valid_up_to})\nSuggestion: Decode the upstream text before handing it to the parser")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<std::str::Utf8Error> for InputError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::not_utf8(&err)
    }
}

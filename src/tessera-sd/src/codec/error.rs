use crate::value::Kind;

/// Failure to decode a [`Value`](crate::Value) from binary or text input.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct DecodeError {
    /// The byte offset into the input where decoding diverged.
    pub offset: usize,
    /// What went wrong.
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub(crate) fn new(offset: usize, kind: DecodeErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// The reasons decoding may fail.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The input ended while more bytes were required.
    #[error("unexpected end of input, {need} more bytes needed")]
    UnexpectedEof { need: usize },

    /// A binary type tag was not recognized.
    #[error("unknown type tag {0:#04x}")]
    UnknownTag(u8),

    /// String or key data is not valid UTF-8.
    #[error("invalid UTF-8 in string data")]
    InvalidUtf8,

    /// A binary map entry did not start with the key marker.
    #[error("expected map key marker, found {0:#04x}")]
    ExpectedKey(u8),

    /// A binary container was not closed by its terminator.
    #[error("expected container terminator {expected:#04x}, found {found:#04x}")]
    MissingTerminator { expected: u8, found: u8 },

    /// Containers are nested deeper than the configured limit.
    #[error("recursion limit exceeded")]
    Recursion,

    /// Input continues after the root value.
    #[error("trailing data after root value")]
    TrailingBytes,

    /// Markup in the text form is malformed.
    #[error("malformed markup: {0}")]
    Syntax(&'static str),

    /// An element that cannot appear at this position.
    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),

    /// An end tag does not close the open element.
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Element content cannot be read as its kind.
    #[error("invalid {kind} literal {text:?}")]
    InvalidLiteral { kind: Kind, text: String },

    /// A binary element declares an encoding other than base64.
    #[error("unsupported binary encoding {0:?}")]
    UnsupportedEncoding(String),

    /// An entity reference is not one of the predefined ones.
    #[error("unknown entity reference &{0};")]
    UnknownEntity(String),
}

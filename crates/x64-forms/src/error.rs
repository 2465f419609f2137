//! Error types and source span tracking for diagnostics.

use alloc::string::String;
use core::fmt;

/// Source location of a token within the line or source it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (byte offset within line).
    pub col: u32,
    /// 0-based byte offset from start of source.
    pub offset: usize,
    /// Byte length of the spanned region.
    pub len: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub fn new(line: u32, col: u32, offset: usize, len: usize) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// A span for tokens that did not come from source text.
    #[must_use]
    pub fn dummy() -> Self {
        Self::default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Why a template attempt (and, in the end, a whole statement) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// The mnemonic token did not match.
    InvalidInstruction,
    /// An operand token sequence did not satisfy the expected operand grammar.
    InvalidOperand,
    /// All operands matched but tokens remain.
    ExtraneousTokenAfterInstruction,
}

impl ErrorKind {
    /// Stable numeric code, useful for diagnostics output.
    pub fn code(self) -> usize {
        match self {
            ErrorKind::InvalidInstruction => 3,
            ErrorKind::InvalidOperand => 4,
            ErrorKind::ExtraneousTokenAfterInstruction => 7,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInstruction => write!(f, "invalid instruction"),
            ErrorKind::InvalidOperand => write!(f, "invalid operand"),
            ErrorKind::ExtraneousTokenAfterInstruction => {
                write!(f, "extraneous token after instruction")
            }
        }
    }
}

/// A failed match of one statement: how far matching got, and why it stopped.
///
/// `remaining` is the number of tokens that were not accepted when matching
/// stopped; the token that caused the failure counts as not accepted. Smaller
/// means the attempt got further into the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchError {
    /// Tokens not yet accepted at the point of failure.
    pub remaining: usize,
    /// The failure classification.
    pub kind: ErrorKind,
}

impl MatchError {
    /// Create a new match error.
    #[must_use]
    pub fn new(remaining: usize, kind: ErrorKind) -> Self {
        Self { remaining, kind }
    }

    /// Index of the token the failure points at, for a statement of `len` tokens.
    ///
    /// When matching ran off the end of the statement the last token is blamed.
    #[must_use]
    pub fn offending_index(&self, len: usize) -> usize {
        if self.remaining == 0 {
            len.saturating_sub(1)
        } else {
            len.saturating_sub(self.remaining)
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} token(s) unconsumed)",
            self.kind, self.remaining
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

/// Why the template compiler dropped an ISA table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// The opcode column uses an encoding form that is not modeled (`NP`, `VEX`, ...).
    UnsupportedEncoding(String),
    /// More fields than a mnemonic plus two operands.
    TooManyFields(usize),
    /// The syntax column is empty and no override supplies a mnemonic.
    MissingMnemonic,
    /// An operand type token that is on the skip list or cannot be classified.
    UnsupportedOperand(String),
    /// An opcode-pattern token that could not be parsed.
    MalformedOpcode(String),
    /// Operands and opcode program disagree (e.g. an `imm8` operand without an `ib`).
    InconsistentRow(&'static str),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::UnsupportedEncoding(marker) => {
                write!(f, "unsupported encoding marker '{}'", marker)
            }
            RowRejection::TooManyFields(n) => {
                write!(f, "{} syntax fields (at most 3 are supported)", n)
            }
            RowRejection::MissingMnemonic => write!(f, "row has no mnemonic"),
            RowRejection::UnsupportedOperand(op) => {
                write!(f, "unsupported operand type '{}'", op)
            }
            RowRejection::MalformedOpcode(tok) => {
                write!(f, "malformed opcode pattern token '{}'", tok)
            }
            RowRejection::InconsistentRow(detail) => write!(f, "inconsistent row: {}", detail),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RowRejection {}

/// Error returned by the line and source level API.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// The text could not be tokenized.
    Syntax {
        /// The syntax error message.
        msg: String,
        /// Source location of the syntax error.
        span: Span,
    },

    /// No template matched the statement.
    Encode {
        /// Classification of the deepest-reaching failure.
        kind: ErrorKind,
        /// Text of the token the failure points at.
        token: String,
        /// Source location of that token.
        span: Span,
    },

    /// A configured limit was exceeded.
    ResourceLimitExceeded {
        /// Human-readable name of the resource.
        resource: String,
        /// The configured limit that was exceeded.
        limit: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax { msg, span } => write!(f, "{}: {}", span, msg),
            Error::Encode { kind, token, span } => {
                write!(f, "{}: {} ('{}' here)", span, kind, token)
            }
            Error::ResourceLimitExceeded { resource, limit } => {
                write!(
                    f,
                    "resource limit exceeded: {} (limit: {})",
                    resource, limit
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

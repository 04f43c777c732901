//! OBJ parse errors

use std::fmt;
use std::io;

/// Which raw attribute array a face reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => f.write_str("position"),
            Attribute::TexCoord => f.write_str("texture coordinate"),
            Attribute::Normal => f.write_str("normal"),
        }
    }
}

/// Error type for OBJ parsing. Any of these aborts the whole file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("line {line}: {attribute} index {index} out of range (1..={len} declared so far)")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("failed to read OBJ source: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    /// 1-based source line of the failing record, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedInput { line, .. } | ParseError::IndexOutOfRange { line, .. } => {
                Some(*line)
            }
            ParseError::Io(_) => None,
        }
    }
}

use std::{error::Error, fmt};

/// Failure modes of CharString interpretation.
///
/// Any of these aborts the current top-level glyph parse; no partial path is
/// ever returned. A missing glyph name is *not* an error (the entry surface
/// falls back to an empty path instead).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharStringError {
    /// Truncated number encoding or hint mask.
    MalformedProgram,
    /// The operand stack exceeded its fixed capacity.
    StackOverflow,
    /// An operator popped more operands than were pushed.
    StackUnderflow,
    /// The biased subroutine number falls outside the subroutine table.
    SubroutineOutOfRange { index: i32, table_size: usize },
    /// The targeted subroutine has no bytes.
    EmptySubroutine { index: usize },
    /// An operator byte with no assigned meaning.
    UnhandledOperator { byte: u8, extended: bool },
    /// A Type 2 construct appeared in a Type 1 program.
    InvalidDialect { operation: &'static str },
    /// Subroutine calls nested deeper than the implementation cap.
    RecursionTooDeep,
}

impl Error for CharStringError {}

impl fmt::Display for CharStringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedProgram => write!(f, "malformed glyph outline definition"),
            Self::StackOverflow => write!(f, "operand stack overflow"),
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::SubroutineOutOfRange { index, table_size } => write!(
                f,
                "subroutine index out of range: {} not in 0..{}",
                index, table_size
            ),
            Self::EmptySubroutine { index } => write!(f, "empty subroutine: {}", index),
            Self::UnhandledOperator {
                byte,
                extended: false,
            } => write!(f, "unhandled command: {}", byte),
            Self::UnhandledOperator {
                byte,
                extended: true,
            } => write!(f, "unhandled command: 12 {}", byte),
            Self::InvalidDialect { operation } => {
                write!(f, "{} only valid in Type 2 programs", operation)
            }
            Self::RecursionTooDeep => write!(f, "subroutine calls nested too deeply"),
        }
    }
}

pub type CharStringResult<T> = anyhow::Result<T>;

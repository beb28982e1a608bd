use nom::error::{ErrorKind, ParseError};
use nom::Needed;
use std::io;
use thiserror::Error;

/// Errors raised while reading a nettl capture
///
/// `Eof` and `HeaderNotRecognized` are not failures of the input as such: the first marks a
/// clean end of the stream at a record boundary, the second means the input is not a nettl file
/// and the caller may probe other formats.
#[derive(Debug, Error)]
pub enum NettlError {
    /// Clean end of the stream, at a record boundary
    #[error("end of file")]
    Eof,
    /// More input is required to complete the current record (number of missing bytes, or 0 if
    /// unknown)
    #[error("incomplete record, {0} more bytes needed")]
    Incomplete(usize),

    /// Input does not start with one of the nettl magic numbers
    #[error("header not recognized as a nettl capture")]
    HeaderNotRecognized,
    /// Stream ended in the middle of a record
    #[error("short read: capture ends in the middle of a record")]
    ShortRead,
    /// Record carries a subsystem code without a known layout
    #[error("nettl: subsystem {0} unknown or unsupported")]
    UnsupportedEncapsulation(u8),
    /// Record declares an empty frame
    #[error("record has a zero captured or original length")]
    ZeroLength,
    /// Removing vendor padding from a declared length would make it negative
    #[error("{field} length {length} is smaller than {adjust} bytes of padding")]
    LengthUnderflow {
        field: &'static str,
        length: u32,
        adjust: u32,
    },

    #[error("nom error: {0:?}")]
    NomError(ErrorKind),
    /// Error from the underlying byte source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl NettlError {
    /// Returns true if the error marks a clean end of stream
    pub fn is_eof(&self) -> bool {
        matches!(self, NettlError::Eof)
    }
}

impl<I> ParseError<I> for NettlError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        NettlError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        NettlError::NomError(kind)
    }
}

impl From<nom::Err<NettlError>> for NettlError {
    fn from(e: nom::Err<NettlError>) -> Self {
        match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
            nom::Err::Incomplete(Needed::Size(n)) => NettlError::Incomplete(n.into()),
            nom::Err::Incomplete(Needed::Unknown) => NettlError::Incomplete(0),
        }
    }
}

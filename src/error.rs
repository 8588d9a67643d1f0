//! Error types shared across the tag formats this crate reads and writes.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// An error encountered while parsing a tag or frame.
#[derive(Debug)]
pub enum ParseError {
    /// The stream ran out of data before a structurally-required field could be read.
    NotEnoughData,
    /// The data violated a structural invariant of the format (bad magic, impossible size,
    /// a value outside its valid range).
    MalformedData,
    /// The data is well-formed but uses a feature this crate does not implement (for example,
    /// a frame that depends on decryption).
    Unsupported,
    /// The thing being looked up (a field, a frame) is not present. This is expected API
    /// behavior, not a sign of corruption.
    NotFound,
    /// The underlying reader failed.
    Io(io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParseError::NotEnoughData => write!(f, "not enough data"),
            ParseError::MalformedData => write!(f, "malformed data"),
            ParseError::Unsupported => write!(f, "unsupported"),
            ParseError::NotFound => write!(f, "not found"),
            ParseError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        // Our BufStream reports bounds failures as UnexpectedEof; everything else is a
        // genuine I/O failure from the file layer.
        match err.kind() {
            io::ErrorKind::UnexpectedEof => ParseError::NotEnoughData,
            _ => ParseError::Io(err),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// An error encountered while rendering a tag to bytes.
#[derive(Debug)]
pub enum SaveError {
    /// The underlying writer failed.
    Io(io::Error),
    /// The rendered tag would exceed the maximum size this crate is willing to write.
    TooLarge,
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SaveError::Io(err) => write!(f, "io error: {}", err),
            SaveError::TooLarge => write!(f, "tag too large to render"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SaveError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(err: io::Error) -> Self {
        SaveError::Io(err)
    }
}

pub type SaveResult<T> = Result<T, SaveError>;

/// An error encountered while binding a [`Tag`](crate::id3v2::Tag) to a file on disk.
#[derive(Debug)]
pub enum FileError {
    /// The file could not be found or opened.
    NoFile,
    /// The file is not writable, but a mutating operation was attempted.
    ReadOnly,
    /// The file has no tag data of the kind requested.
    NoData,
    /// A tag was found but could not be parsed.
    BadData,
    /// The underlying I/O failed in a way not covered above.
    Io(io::Error),
}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FileError::NoFile => write!(f, "no such file"),
            FileError::ReadOnly => write!(f, "file is read-only"),
            FileError::NoData => write!(f, "no tag data present"),
            FileError::BadData => write!(f, "tag data is malformed"),
            FileError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl Error for FileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FileError::NoFile,
            io::ErrorKind::PermissionDenied => FileError::ReadOnly,
            _ => FileError::Io(err),
        }
    }
}

impl From<ParseError> for FileError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(err) => FileError::Io(err),
            ParseError::NotFound => FileError::NoData,
            _ => FileError::BadData,
        }
    }
}

impl From<SaveError> for FileError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Io(err) => FileError::Io(err),
            SaveError::TooLarge => FileError::BadData,
        }
    }
}

pub type FileResult<T> = Result<T, FileError>;

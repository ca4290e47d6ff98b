use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `bson-stream` crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// The zero-based position in the input stream of the byte that caused the error, if any.
    pub offset: Option<u64>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(offset) = self.offset {
            write!(f, "Error at stream offset {offset}: ")?;
        }

        write!(f, "{}", self.kind)
    }
}

/// The types of errors that can occur in the `bson-stream` crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value outside of `0..=255` was fed to the decoder.
    #[error("Invalid byte value {value}: expected a value between 0 and 255")]
    #[non_exhaustive]
    InvalidByte { value: i32 },

    /// A length prefix declared a document larger than the configured maximum.
    #[error("BSON document length {length} exceeds the maximum of {max} bytes")]
    #[non_exhaustive]
    DocumentTooLarge { length: u32, max: u32 },

    /// A length prefix declared a document shorter than the prefix itself.
    #[error("BSON document length {length} is smaller than its own 4 byte length prefix")]
    #[non_exhaustive]
    LengthTooSmall { length: u32 },

    /// More bytes were counted for the pending document than its prefix declared.
    #[error("Read {bytes_read} bytes of a document declared as {length} bytes")]
    #[non_exhaustive]
    Overrun { bytes_read: u32, length: u32 },

    /// The decoder previously hit a fatal error and cannot accept more input.
    #[error("The decoder failed earlier and must be replaced")]
    Poisoned,

    /// A [`std::io::Error`] occurred.
    #[error("An IO error occurred: {0}")]
    Io(std::io::Error),
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, offset: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        ErrorKind::Io(value).into()
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value.kind {
            ErrorKind::Io(e) => e,
            _ => std::io::Error::new(std::io::ErrorKind::InvalidData, value),
        }
    }
}

impl Error {
    pub(crate) fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn invalid_byte(value: i32) -> Self {
        ErrorKind::InvalidByte { value }.into()
    }

    pub(crate) fn too_large(length: u32, max: u32) -> Self {
        ErrorKind::DocumentTooLarge { length, max }.into()
    }

    pub(crate) fn too_small(length: u32) -> Self {
        ErrorKind::LengthTooSmall { length }.into()
    }

    pub(crate) fn overrun(bytes_read: u32, length: u32) -> Self {
        ErrorKind::Overrun { bytes_read, length }.into()
    }

    pub(crate) fn poisoned() -> Self {
        ErrorKind::Poisoned.into()
    }

    /// Whether this error was caused by a length prefix that the decoder could not frame, as
    /// opposed to bad caller input or IO.
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::DocumentTooLarge { .. }
                | ErrorKind::LengthTooSmall { .. }
                | ErrorKind::Overrun { .. }
        )
    }

    #[cfg(test)]
    pub(crate) fn is_poisoned(&self) -> bool {
        matches!(self.kind, ErrorKind::Poisoned)
    }
}

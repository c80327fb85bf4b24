use std::io;

// Represents errors that can occur within the presentation layer.
//
// The console backend reports these for unreadable input and failed terminal
// writes. Input errors are shown to the user and the loop continues.
#[derive(Debug)]
pub enum PlatformError {
    /// Reading from or writing to the terminal failed.
    Io(io::Error),
    /// A typed command could not be understood.
    InvalidInput(String),
    /// A row number did not refer to a displayed row.
    InvalidRow(usize),
}

impl From<io::Error> for PlatformError {
    fn from(err: io::Error) -> Self {
        PlatformError::Io(err)
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::Io(e) => write!(f, "Terminal I/O error: {e}"),
            PlatformError::InvalidInput(s) => write!(f, "Invalid input: {s}"),
            PlatformError::InvalidRow(row) => write!(f, "No row number {row} is displayed"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized `Result` type for platform layer operations.
pub type Result<T> = std::result::Result<T, PlatformError>;

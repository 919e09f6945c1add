use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    SourceMissing(PathBuf),
    ArchiveMissing,
    TargetExists(PathBuf),
    InvalidArchive(serde_json::Error),
    UnsafePath(String),
    NonUtf8Path(PathBuf),
    Cancelled,
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SourceMissing(path) => write!(f, "Directory {} does not exist.", path.display()),
            Error::ArchiveMissing => write!(f, "Import file does not exist."),
            Error::TargetExists(path) => {
                write!(f, "Directory {} already exists.", path.display())
            }
            Error::InvalidArchive(_) => write!(f, "Import data not found or not valid json."),
            Error::UnsafePath(path) => {
                write!(f, "Archive path {:?} escapes the output directory.", path)
            }
            Error::NonUtf8Path(path) => {
                write!(f, "File path {:?} is not valid UTF-8.", path)
            }
            Error::Cancelled => write!(f, "Operation was cancelled."),
            Error::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidArchive(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidArchive(e)
    }
}

//! Error and Result types.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single transport exchange.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("http error `{0}`")]
    HttpError(String),
    #[error("unsupported protocol in `{0}`")]
    UnsupportedProtocol(String),
    #[error("server answered resume request with status {0}")]
    RangeNotSupported(u16),
    #[error("write error: {0}")]
    WriteError(#[from] SinkError),
}

/// Rejection of a chunk by a write sink. Aborts the transfer.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("unexpected response status {0}, expected 206")]
    UnexpectedStatus(u16),
    #[error("chunk of {len} bytes at offset {position} overflows buffer of {capacity} bytes")]
    Overflow {
        position: usize,
        len: usize,
        capacity: usize,
    },
    #[error("cancelled by progress callback")]
    Cancelled,
    #[error("file write failed: {0}")]
    Io(#[from] io::Error),
}

/// Terminal failure of a fetch call.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("invalid parameter: {0}")]
    Param(&'static str),
    #[error("transport init failed: {0}")]
    Init(#[source] HttpError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("file error on `{}`: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cancelled by user")]
    UserCancel,
}

impl DownloadError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DownloadError::File {
            path: path.into(),
            source,
        }
    }

    /// Result code classifying this error.
    pub fn code(&self) -> DownloadResult {
        match self {
            DownloadError::Param(_) => DownloadResult::ParamError,
            DownloadError::Init(_) => DownloadResult::InitError,
            DownloadError::Http(_) => DownloadResult::HttpError,
            DownloadError::File { .. } => DownloadResult::FileError,
            DownloadError::UserCancel => DownloadResult::UserCancel,
        }
    }
}

/// Flat classification of a fetch call, for callers that only need the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadResult {
    Ok,
    ParamError,
    InitError,
    HttpError,
    FileError,
    UserCancel,
}

impl<T> From<&Result<T>> for DownloadResult {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => DownloadResult::Ok,
            Err(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;

use crate::config::SessionConfig;
use crate::error::{HttpError, SinkError};
use std::io::{ErrorKind, Read};

const CHUNK_SIZE: usize = 16 * 1024;

/// Receiver of the response body, chunk by chunk.
pub trait WriteSink {
    /// Consume one chunk of a response with the given status.
    ///
    /// Returning an error aborts the transfer with [`HttpError::WriteError`].
    fn write(&mut self, status: u16, chunk: &[u8]) -> Result<(), SinkError>;
}

/// One blocking GET exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub url: &'a str,
    /// Byte range without unit, e.g. `0-99`
    pub range: Option<&'a str>,
    /// Offset to continue a partial download from
    pub resume_from: u64,
}

impl<'a> Request<'a> {
    pub fn range(url: &'a str, range: &'a str) -> Self {
        Request {
            url,
            range: Some(range),
            resume_from: 0,
        }
    }

    pub fn resume(url: &'a str, resume_from: u64) -> Self {
        Request {
            url,
            range: None,
            resume_from,
        }
    }

    /// Value of the `Range` header, if any.
    pub fn range_header(&self) -> Option<String> {
        match self.range {
            Some(range) => Some(format!("bytes={}", range)),
            None if self.resume_from > 0 => Some(format!("bytes={}-", self.resume_from)),
            None => None,
        }
    }
}

/// Sync HTTP session executing one request at a time
pub trait TransportSession {
    /// Send a GET request and deliver the body to `sink`
    fn perform(&mut self, request: &Request<'_>, sink: &mut dyn WriteSink)
        -> Result<(), HttpError>;
}

/// Process-wide transport context sessions are opened from
pub trait Transport {
    type Session: TransportSession;
    /// Create a session carrying the context's connection policy
    fn open_session(&self) -> Result<Self::Session, HttpError>;
}

/// Check `request` against the protocol policy before anything goes on the wire.
pub(crate) fn check_request(config: &SessionConfig, request: &Request<'_>) -> Result<(), HttpError> {
    let url = url::Url::parse(request.url).map_err(|e| HttpError::HttpError(e.to_string()))?;
    check_url(config, &url)
}

/// Check a request or redirect target against the protocol policy.
pub(crate) fn check_url(config: &SessionConfig, url: &url::Url) -> Result<(), HttpError> {
    if config.allows(url) {
        Ok(())
    } else {
        Err(HttpError::UnsupportedProtocol(url.to_string()))
    }
}

/// Resolve the `Location` of a redirect against the url it came from.
#[cfg(any(feature = "ureq-sync", test))]
pub(crate) fn redirect_target(
    config: &SessionConfig,
    from: &url::Url,
    location: &str,
) -> Result<url::Url, HttpError> {
    let target = from
        .join(location)
        .map_err(|e| HttpError::HttpError(format!("bad redirect location `{}`: {}", location, e)))?;
    check_url(config, &target)?;
    Ok(target)
}

/// Check the response status the way every backend must.
pub(crate) fn check_status(request: &Request<'_>, status: u16) -> Result<(), HttpError> {
    if status >= 400 {
        return Err(HttpError::HttpStatus(status));
    }
    // A 200 to a resume request carries the body from offset 0
    if request.resume_from > 0 && status != 206 {
        return Err(HttpError::RangeNotSupported(status));
    }
    Ok(())
}

/// Pump `body` into `sink` until end of stream.
pub(crate) fn stream_body<R: Read>(
    mut body: R,
    status: u16,
    sink: &mut dyn WriteSink,
) -> Result<u64, HttpError> {
    let mut chunk = vec![0; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match body.read(&mut chunk) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(HttpError::HttpError(e.to_string())),
        };
        sink.write(status, &chunk[..n])?;
        total += n as u64;
    }
}

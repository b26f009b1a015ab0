use crate::error::{DownloadError, DownloadResult, Result};
use crate::retry::{with_retries, RetryBudget};
use crate::sink::MemoryWriteSink;
use crate::transport::{Request, Transport, TransportSession};
use std::ops::ControlFlow;

/// Fetches one byte range of a resource into a caller-owned buffer
pub struct RangeFetcher<'t, T: Transport> {
    transport: &'t T,
    retries: RetryBudget,
}

impl<'t, T: Transport> RangeFetcher<'t, T> {
    pub fn new(transport: &'t T) -> Self {
        RangeFetcher {
            transport,
            retries: RetryBudget::default(),
        }
    }

    /// Set the number of additional attempts after a failed one.
    pub fn retries(&mut self, retries: u32) -> &mut Self {
        self.retries = RetryBudget(retries);
        self
    }

    /// Fetch `range` (e.g. `0-99`) of `url` into `buf`.
    ///
    /// Only a `206 Partial Content` body that fits into `buf` is accepted.
    /// Returns the number of bytes written. On error the buffer content is undefined.
    pub fn fetch(&self, url: &str, range: &str, buf: &mut [u8]) -> Result<usize> {
        info!("fetch range {} of {}", range, url);
        if url.is_empty() {
            return Err(DownloadError::Param("empty url"));
        }
        if buf.is_empty() {
            return Err(DownloadError::Param("empty buffer"));
        }
        let mut session = self.transport.open_session()?;
        let request = Request::range(url, range);
        let result = with_retries(self.retries, |attempt| {
            debug!("range attempt #{}: {} into {} bytes", attempt, range, buf.len());
            let mut sink = MemoryWriteSink::new(&mut *buf);
            match session.perform(&request, &mut sink) {
                Ok(()) => ControlFlow::Break(Ok(sink.position())),
                Err(e) => ControlFlow::Continue(e.into()),
            }
        });
        info!("fetch range end {:?}", DownloadResult::from(&result));
        result
    }
}

//! Write sinks used by the fetchers.
use crate::error::SinkError;
use crate::transport::WriteSink;
use std::fs::File;
use std::io::Write;

/// Decision returned by a progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Cancel,
}

/// Bounds-checked append-only writer over a caller-owned buffer.
///
/// Only accepts the body of a `206 Partial Content` response.
pub struct MemoryWriteSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> MemoryWriteSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        MemoryWriteSink { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl WriteSink for MemoryWriteSink<'_> {
    fn write(&mut self, status: u16, chunk: &[u8]) -> Result<(), SinkError> {
        // A server ignoring the range answers 200 with the full body
        if status != 206 {
            return Err(SinkError::UnexpectedStatus(status));
        }
        let end = self
            .pos
            .checked_add(chunk.len())
            .filter(|end| *end <= self.buf.len())
            .ok_or(SinkError::Overflow {
                position: self.pos,
                len: chunk.len(),
                capacity: self.buf.len(),
            })?;
        self.buf[self.pos..end].copy_from_slice(chunk);
        self.pos = end;
        Ok(())
    }
}

/// Appends the body to the staging file and reports progress after each chunk.
pub struct FileWriteSink<'a> {
    url: &'a str,
    /// Byte count at attempt start
    bytes: u64,
    file: File,
    cancelled: bool,
    progress: Option<&'a mut dyn FnMut(&str, u64) -> Progress>,
    written: u64,
}

impl<'a> FileWriteSink<'a> {
    pub fn new(
        url: &'a str,
        bytes: u64,
        file: File,
        progress: Option<&'a mut dyn FnMut(&str, u64) -> Progress>,
    ) -> Self {
        FileWriteSink {
            url,
            bytes,
            file,
            cancelled: false,
            progress,
            written: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Bytes appended during this attempt.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl WriteSink for FileWriteSink<'_> {
    fn write(&mut self, _status: u16, chunk: &[u8]) -> Result<(), SinkError> {
        if self.cancelled {
            return Err(SinkError::Cancelled);
        }
        self.file.write_all(chunk)?;
        self.written += chunk.len() as u64;
        if let Some(progress) = self.progress.as_mut() {
            // Reports the count taken at attempt start, not the running total
            if progress(self.url, self.bytes) == Progress::Cancel {
                self.cancelled = true;
                return Err(SinkError::Cancelled);
            }
        }
        Ok(())
    }
}

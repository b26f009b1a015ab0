use crate::error::{DownloadError, DownloadResult, HttpError, Result, SinkError};
use crate::retry::{with_retries, RetryBudget};
use crate::sink::{FileWriteSink, Progress};
use crate::transport::{Request, Transport, TransportSession};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Suffix appended to the destination path while the download is incomplete
pub const STAGING_SUFFIX: &str = ".curl";

/// Downloads a resource to disk through a staging file.
///
/// Bytes accumulate in `<dest><suffix>`. Every attempt, including the first one
/// of a later call, resumes from the current size of that file. A completed
/// transfer is published to `dest` with a rename.
pub struct ResumableDownloader<'t, T: Transport> {
    transport: &'t T,
    retries: RetryBudget,
    suffix: String,
}

impl<'t, T: Transport> ResumableDownloader<'t, T> {
    pub fn new(transport: &'t T) -> Self {
        ResumableDownloader {
            transport,
            retries: RetryBudget::default(),
            suffix: STAGING_SUFFIX.to_string(),
        }
    }

    /// Set the number of additional attempts after a failed one.
    pub fn retries(&mut self, retries: u32) -> &mut Self {
        self.retries = RetryBudget(retries);
        self
    }

    /// Set the staging file suffix (default `.curl`).
    pub fn staging_suffix(&mut self, suffix: &str) -> &mut Self {
        self.suffix = suffix.to_string();
        self
    }

    /// Path of the staging file used for `dest`.
    pub fn staging_path(&self, dest: &Path) -> PathBuf {
        let mut path = OsString::from(dest.as_os_str());
        path.push(&self.suffix);
        PathBuf::from(path)
    }

    /// Download `url` to `dest`.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self.download(url, dest, None)
    }

    /// Download `url` to `dest`, calling `progress` after every chunk written.
    ///
    /// `progress` receives the url and the byte count the current attempt started
    /// from. Returning [`Progress::Cancel`] stops the download for good; bytes
    /// already on disk stay in the staging file.
    pub fn fetch_with_progress<F>(&self, url: &str, dest: &Path, mut progress: F) -> Result<()>
    where
        F: FnMut(&str, u64) -> Progress,
    {
        self.download(url, dest, Some(&mut progress))
    }

    fn download(
        &self,
        url: &str,
        dest: &Path,
        mut progress: Option<&mut dyn FnMut(&str, u64) -> Progress>,
    ) -> Result<()> {
        info!("fetch file {} to {}", url, dest.display());
        if url.is_empty() {
            return Err(DownloadError::Param("empty url"));
        }
        if dest.as_os_str().is_empty() {
            return Err(DownloadError::Param("empty destination path"));
        }
        let mut session = self
            .transport
            .open_session()
            .map_err(DownloadError::Init)?;
        let staging = self.staging_path(dest);

        let result = with_retries(self.retries, |attempt| {
            let resume_from = staged_len(&staging);
            debug!("file attempt #{}: resume from {}", attempt, resume_from);
            let file = match OpenOptions::new().create(true).append(true).open(&staging) {
                Ok(file) => file,
                Err(e) => return ControlFlow::Break(Err(DownloadError::file(&staging, e))),
            };
            let progress: Option<&mut dyn FnMut(&str, u64) -> Progress> = match progress {
                Some(ref mut p) => Some(&mut **p),
                None => None,
            };
            let mut sink = FileWriteSink::new(url, resume_from, file, progress);
            let outcome = session.perform(&Request::resume(url, resume_from), &mut sink);
            let cancelled = sink.is_cancelled();
            debug!("file attempt #{}: {} bytes written", attempt, sink.written());
            // Closes the staging file
            drop(sink);

            match outcome {
                Ok(()) => ControlFlow::Break(publish(&staging, dest)),
                Err(HttpError::WriteError(_)) if cancelled => {
                    info!("user cancel");
                    ControlFlow::Break(Err(DownloadError::UserCancel))
                }
                Err(HttpError::WriteError(e)) => {
                    ControlFlow::Continue(DownloadError::file(&staging, into_io(e)))
                }
                Err(e) => ControlFlow::Continue(DownloadError::Http(e)),
            }
        });
        info!("fetch file end {:?}", DownloadResult::from(&result));
        result
    }
}

/// Size of the staging file, 0 when absent.
fn staged_len(staging: &Path) -> u64 {
    fs::metadata(staging).map(|m| m.len()).unwrap_or(0)
}

fn publish(staging: &Path, dest: &Path) -> Result<()> {
    fs::rename(staging, dest).map_err(|e| {
        error!(
            "error rename from {} to {}: {}",
            staging.display(),
            dest.display(),
            e
        );
        DownloadError::file(staging, e)
    })
}

fn into_io(e: SinkError) -> io::Error {
    match e {
        SinkError::Io(e) => e,
        other => io::Error::other(other),
    }
}

//! Blocking HTTP client for exact byte-range fetches and resumable file downloads.

//! ## Usage example
//!
//! ```no_run
//! use http_resume_client::*;
//! use std::path::Path;
//!
//! # #[cfg(feature = "reqwest-sync")]
//! # fn get() -> Result<()> {
//! let context = ReqwestContext::init(SessionConfig::default())?;
//!
//! // Exact range into a fixed buffer
//! let mut header = [0u8; 100];
//! RangeFetcher::new(&context)
//!     .retries(2)
//!     .fetch("http://example.com/data.bin", "0-99", &mut header)?;
//!
//! // Whole file, resumed from `data.bin.curl` when interrupted
//! ResumableDownloader::new(&context)
//!     .retries(3)
//!     .fetch_with_progress("http://example.com/data.bin", Path::new("data.bin"), |url, bytes| {
//!         println!("{}: {} bytes", url, bytes);
//!         Progress::Continue
//!     })?;
//!
//! context.cleanup();
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

mod config;
mod downloader;
mod error;
mod range_fetcher;
#[cfg(feature = "reqwest-sync")]
mod reqwest_client;
mod retry;
mod sink;
#[cfg(test)]
mod testing;
mod transport;
#[cfg(feature = "ureq-sync")]
mod ureq_client;

pub use config::SessionConfig;
pub use downloader::{ResumableDownloader, STAGING_SUFFIX};
pub use error::*;
pub use range_fetcher::RangeFetcher;
pub use retry::RetryBudget;
pub use sink::{FileWriteSink, MemoryWriteSink, Progress};
pub use transport::{Request, Transport, TransportSession, WriteSink};

#[cfg(feature = "reqwest-sync")]
pub use crate::reqwest_client::{ReqwestContext, ReqwestSession};
#[cfg(feature = "ureq-sync")]
pub use crate::ureq_client::{UreqContext, UreqSession};

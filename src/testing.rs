//! Scripted transport for unit tests.
use crate::error::HttpError;
use crate::transport::{check_status, Request, Transport, TransportSession, WriteSink};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Outcome of one scripted exchange.
pub(crate) enum Reply {
    /// Deliver `chunks` with `status`, then finish normally
    Body { status: u16, chunks: Vec<Vec<u8>> },
    /// Deliver `chunks`, then fail as a timed out transfer
    Timeout { status: u16, chunks: Vec<Vec<u8>> },
    /// Fail before any byte arrives
    Refused,
}

impl Reply {
    pub(crate) fn partial(body: &[u8]) -> Self {
        Reply::Body {
            status: 206,
            chunks: vec![body.to_vec()],
        }
    }

    pub(crate) fn full(body: &[u8]) -> Self {
        Reply::Body {
            status: 200,
            chunks: vec![body.to_vec()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Seen {
    pub url: String,
    pub range: Option<String>,
    pub resume_from: u64,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    seen: Vec<Seen>,
    sessions: usize,
}

#[derive(Default, Clone)]
pub(crate) struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
    fail_open: bool,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        ScriptedTransport {
            script: Rc::new(RefCell::new(Script {
                replies: replies.into_iter().collect(),
                ..Default::default()
            })),
            fail_open: false,
        }
    }

    pub(crate) fn failing_open() -> Self {
        ScriptedTransport {
            fail_open: true,
            ..Self::new([])
        }
    }

    pub(crate) fn seen(&self) -> Vec<Seen> {
        self.script.borrow().seen.clone()
    }

    pub(crate) fn sessions(&self) -> usize {
        self.script.borrow().sessions
    }
}

pub(crate) struct ScriptedSession {
    script: Rc<RefCell<Script>>,
}

impl Transport for ScriptedTransport {
    type Session = ScriptedSession;

    fn open_session(&self) -> Result<ScriptedSession, HttpError> {
        if self.fail_open {
            return Err(HttpError::HttpError("no session".to_string()));
        }
        self.script.borrow_mut().sessions += 1;
        Ok(ScriptedSession {
            script: Rc::clone(&self.script),
        })
    }
}

impl TransportSession for ScriptedSession {
    fn perform(
        &mut self,
        request: &Request<'_>,
        sink: &mut dyn WriteSink,
    ) -> Result<(), HttpError> {
        let reply = {
            let mut script = self.script.borrow_mut();
            script.seen.push(Seen {
                url: request.url.to_string(),
                range: request.range_header(),
                resume_from: request.resume_from,
            });
            script.replies.pop_front()
        };
        let (status, chunks, timeout) = match reply {
            Some(Reply::Body { status, chunks }) => (status, chunks, false),
            Some(Reply::Timeout { status, chunks }) => (status, chunks, true),
            Some(Reply::Refused) | None => {
                return Err(HttpError::HttpError("connection refused".to_string()))
            }
        };
        check_status(request, status)?;
        for chunk in &chunks {
            sink.write(status, chunk)?;
        }
        if timeout {
            return Err(HttpError::HttpError("operation timed out".to_string()));
        }
        Ok(())
    }
}

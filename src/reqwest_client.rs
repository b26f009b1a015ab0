use crate::config::SessionConfig;
use crate::error::{DownloadError, HttpError, Result};
use crate::transport::{
    check_request, check_status, check_url, stream_body, Request, Transport, TransportSession,
    WriteSink,
};
use reqwest::blocking::Client;
use reqwest::header::RANGE;
use reqwest::redirect::Policy;
use std::error::Error;

/// Transport context backed by the blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestContext {
    config: SessionConfig,
}

impl ReqwestContext {
    /// Set up the transport. Fails when no client can be built with `config`.
    pub fn init(config: SessionConfig) -> Result<Self> {
        let context = ReqwestContext { config };
        context.open_session().map_err(DownloadError::Init)?;
        debug!("reqwest transport ready: {:?}", context.config);
        Ok(context)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Release the transport. All fetches must have returned.
    pub fn cleanup(self) {
        debug!("reqwest transport released");
    }
}

/// Blocking reqwest session with the context's connection policy
pub struct ReqwestSession {
    client: Client,
    config: SessionConfig,
}

impl Transport for ReqwestContext {
    type Session = ReqwestSession;

    fn open_session(&self) -> std::result::Result<ReqwestSession, HttpError> {
        let client = Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.timeout)
            .redirect(redirect_policy(&self.config))
            .referer(true)
            .build()?;
        Ok(ReqwestSession {
            client,
            config: self.config.clone(),
        })
    }
}

fn redirect_policy(config: &SessionConfig) -> Policy {
    let config = config.clone();
    Policy::custom(move |attempt| {
        if attempt.previous().len() > config.max_redirects {
            attempt.error("too many redirects")
        } else if let Err(e) = check_url(&config, attempt.url()) {
            attempt.error(e)
        } else {
            attempt.follow()
        }
    })
}

impl TransportSession for ReqwestSession {
    fn perform(
        &mut self,
        request: &Request<'_>,
        sink: &mut dyn WriteSink,
    ) -> std::result::Result<(), HttpError> {
        check_request(&self.config, request)?;
        let mut builder = self.client.get(request.url);
        if let Some(range) = request.range_header() {
            builder = builder.header(RANGE, range);
        }
        let response = builder.send()?;
        let status = response.status().as_u16();
        debug!("GET {} -> {}", request.url, status);
        check_status(request, status)?;
        stream_body(response, status, sink).map(|_| ())
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        // Surface a redirect refused by the protocol policy like a refused request url
        if error.is_redirect() {
            let mut source = error.source();
            while let Some(e) = source {
                if let Some(HttpError::UnsupportedProtocol(url)) = e.downcast_ref::<HttpError>() {
                    return HttpError::UnsupportedProtocol(url.clone());
                }
                source = e.source();
            }
        }
        match error.status() {
            Some(status) => HttpError::HttpStatus(status.as_u16()),
            None => HttpError::HttpError(error.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn init_and_cleanup() {
        let context = ReqwestContext::init(SessionConfig::default()).unwrap();
        assert_eq!(context.config().max_redirects, 5);
        assert!(context.open_session().is_ok());
        context.cleanup();
    }

    #[test]
    fn https_is_refused_before_connecting() {
        let context = ReqwestContext::init(SessionConfig::default()).unwrap();
        let mut session = context.open_session().unwrap();
        let mut buf = [0u8; 4];
        let mut sink = crate::sink::MemoryWriteSink::new(&mut buf);
        let res = session.perform(&Request::range("https://127.0.0.1:1/f", "0-3"), &mut sink);
        assert!(matches!(res, Err(HttpError::UnsupportedProtocol(_))));
    }
}

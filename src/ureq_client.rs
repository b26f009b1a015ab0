use crate::config::SessionConfig;
use crate::error::{DownloadError, HttpError, Result};
use crate::transport::{
    check_status, check_url, redirect_target, stream_body, Request, Transport, TransportSession,
    WriteSink,
};

/// Transport context backed by a ureq agent.
#[derive(Debug, Clone)]
pub struct UreqContext {
    config: SessionConfig,
}

impl UreqContext {
    pub fn init(config: SessionConfig) -> Result<Self> {
        let context = UreqContext { config };
        context.open_session().map_err(DownloadError::Init)?;
        debug!("ureq transport ready: {:?}", context.config);
        Ok(context)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn cleanup(self) {
        debug!("ureq transport released");
    }
}

pub struct UreqSession {
    agent: ureq::Agent,
    config: SessionConfig,
}

impl Transport for UreqContext {
    type Session = UreqSession;

    fn open_session(&self) -> std::result::Result<UreqSession, HttpError> {
        // Redirects are followed by `UreqSession::send`, one protocol check per hop
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(self.config.connect_timeout)
            .timeout(self.config.timeout)
            .redirects(0)
            .build();
        Ok(UreqSession {
            agent,
            config: self.config.clone(),
        })
    }
}

impl UreqSession {
    /// Send the request, following up to `max_redirects` redirects.
    fn send(&self, request: &Request<'_>) -> std::result::Result<ureq::Response, HttpError> {
        let mut url =
            url::Url::parse(request.url).map_err(|e| HttpError::HttpError(e.to_string()))?;
        check_url(&self.config, &url)?;
        let range = request.range_header();
        let mut referer: Option<String> = None;
        let mut redirects = 0;
        loop {
            let mut req = self.agent.get(url.as_str());
            if let Some(range) = &range {
                req = req.set("Range", range);
            }
            if let Some(referer) = &referer {
                req = req.set("Referer", referer);
            }
            let response = req.call()?;
            let location = match response.status() {
                301 | 302 | 303 | 307 | 308 => response.header("location").map(str::to_string),
                _ => None,
            };
            let Some(location) = location else {
                return Ok(response);
            };
            if redirects >= self.config.max_redirects {
                return Err(HttpError::HttpError(format!(
                    "too many redirects ({})",
                    redirects
                )));
            }
            let target = redirect_target(&self.config, &url, &location)?;
            debug!("redirect {} -> {}", url, target);
            referer = Some(url.to_string());
            url = target;
            redirects += 1;
        }
    }
}

impl TransportSession for UreqSession {
    fn perform(
        &mut self,
        request: &Request<'_>,
        sink: &mut dyn WriteSink,
    ) -> std::result::Result<(), HttpError> {
        let response = self.send(request)?;
        let status = response.status();
        debug!("GET {} -> {}", request.url, status);
        check_status(request, status)?;
        stream_body(response.into_reader(), status, sink).map(|_| ())
    }
}

impl From<ureq::Error> for HttpError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, _resp) => HttpError::HttpStatus(status),
            ureq::Error::Transport(e) => HttpError::HttpError(e.to_string()),
        }
    }
}

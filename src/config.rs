use std::time::Duration;

/// Connection policy applied to every session opened from a transport context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum time to establish the connection
    pub connect_timeout: Duration,
    /// Maximum time for the whole exchange, body included
    pub timeout: Duration,
    /// Redirects followed before failing
    pub max_redirects: usize,
    /// Reject any scheme other than `http`
    pub http_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            connect_timeout: Duration::from_secs(20),
            timeout: Duration::from_secs(20),
            max_redirects: 5,
            http_only: true,
        }
    }
}

impl SessionConfig {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Whether `url` may be requested under this policy.
    pub(crate) fn allows(&self, url: &url::Url) -> bool {
        match url.scheme() {
            "http" => true,
            "https" => !self.http_only,
            _ => false,
        }
    }
}

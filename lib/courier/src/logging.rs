//! Request/response logging for the transports.

use std::time::Instant;

use courier_core::{Error, Method};
use tracing::{debug, info, warn};

/// One exchange in flight, logged when it starts and when the head arrives.
#[derive(Debug)]
pub(crate) struct RequestLog {
    method: Method,
    url: String,
    start: Instant,
}

impl RequestLog {
    pub(crate) fn start(method: Method, url: impl Into<String>) -> Self {
        let url = url.into();
        info!(method = %method, url = %url, "sending request");
        Self {
            method,
            url,
            start: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub(crate) fn completed(&self, status: u16) {
        let elapsed_ms = self.elapsed_ms();
        if (200..300).contains(&status) {
            info!(method = %self.method, url = %self.url, status, elapsed_ms, "request completed");
        } else {
            warn!(method = %self.method, url = %self.url, status, elapsed_ms, "request failed with HTTP error");
        }
    }

    pub(crate) fn failed(&self, err: &Error) {
        let elapsed_ms = self.elapsed_ms();
        warn!(method = %self.method, url = %self.url, error = %err, elapsed_ms, "request failed");
    }
}

/// Logs the size of a loaded body.
pub(crate) fn body_loaded(url: &str, len: usize) {
    debug!(url, len, "response body loaded");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_request_identity() {
        let log = RequestLog::start(Method::Post, "http://localhost/rpc");
        assert_eq!(log.method, Method::Post);
        assert_eq!(log.url, "http://localhost/rpc");
        log.completed(200);
        log.failed(&Error::Timeout);
        assert!(log.elapsed_ms() < 60_000);
    }
}

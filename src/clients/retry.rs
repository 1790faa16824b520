use std::future::Future;
use std::io;
use std::time::Duration;

use log::warn;
use rspotify::ClientError;
use rspotify::http::HttpError;

use crate::clients::errors::{Error, Result};

/// Total attempts per outbound call, including the first one.
pub const MAX_ATTEMPTS: u32 = 3;

/// Per-attempt deadline. A hung call blocks the whole program, so each
/// attempt is cut off here and counted against the retry budget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed pause between attempts. No behavior depends on timing precision,
/// so there is no backoff schedule.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// How an outbound-call failure should be treated by the retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network hiccup, timeout, 429 or 5xx. Worth retrying.
    Transient,
    /// Credential rejection. Fatal, never retried.
    Auth,
    /// Anything else (malformed request, 4xx, parse failure). Not retried.
    Permanent,
}

// Sort an API error into the class the retry policy acts on
pub fn classify(err: &ClientError) -> ErrorClass {
    match err {
        ClientError::Http(http) => match http.as_ref() {
            HttpError::Client(err) if err.is_timeout() || err.is_connect() => {
                ErrorClass::Transient
            }
            HttpError::Client(_) => ErrorClass::Permanent,
            HttpError::StatusCode(response) => classify_status(response.status()),
        },
        ClientError::Io(err) => classify_io(err.kind()),
        _ => ErrorClass::Permanent,
    }
}

fn classify_status(status: reqwest::StatusCode) -> ErrorClass {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ErrorClass::Auth
    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ErrorClass::Transient
    } else {
        ErrorClass::Permanent
    }
}

fn classify_io(kind: io::ErrorKind) -> ErrorClass {
    match kind {
        io::ErrorKind::TimedOut
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::ConnectionRefused
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => ErrorClass::Transient,
        _ => ErrorClass::Permanent,
    }
}

/// Whether another attempt should be made after a failure of `class`
/// on attempt number `attempt` (1-based).
pub fn should_retry(attempt: u32, class: ErrorClass) -> bool {
    class == ErrorClass::Transient && attempt < MAX_ATTEMPTS
}

/// Run an outbound call under the retry policy.
///
/// `call` is invoked once per attempt. Transient failures and per-attempt
/// timeouts are retried up to [`MAX_ATTEMPTS`] total attempts with a fixed
/// [`RETRY_DELAY`] in between; auth and permanent failures surface
/// immediately. After exhaustion the terminal error carries the attempt
/// count and the underlying cause.
pub async fn call_with_retry<T, F, Fut>(label: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, ClientError>>,
{
    let mut attempt = 1;
    loop {
        match tokio::time::timeout(REQUEST_TIMEOUT, call()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                let class = classify(&err);
                if should_retry(attempt, class) {
                    warn!("{label} failed on attempt {attempt}/{MAX_ATTEMPTS}: {err}, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                    continue;
                }
                return Err(match class {
                    ErrorClass::Auth => Error::Authentication(err.to_string()),
                    ErrorClass::Transient => Error::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    },
                    ErrorClass::Permanent => Error::Spotify(err),
                });
            }
            Err(_) => {
                if attempt < MAX_ATTEMPTS {
                    warn!("{label} timed out on attempt {attempt}/{MAX_ATTEMPTS}, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                    continue;
                }
                return Err(Error::Timeout { attempts: attempt });
            }
        }
    }
}

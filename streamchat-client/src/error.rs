//! Internal error helpers for mapping HTTP/reqwest errors to [`StreamError`].

use streamchat_core::StreamError;

/// Map a non-2xx status and whatever body could be read to a [`StreamError`].
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> StreamError {
    StreamError::HttpStatus {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Map a [`reqwest::Error`] to a [`StreamError`].
///
/// Body read failures surface here too; a body that arrives but is not
/// valid text is reported by the decoder instead.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> StreamError {
    if err.is_timeout() {
        StreamError::Timeout
    } else if let Some(status) = err.status() {
        map_http_status(status, "")
    } else {
        StreamError::Network(Box::new(err))
    }
}

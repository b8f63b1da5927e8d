//! Successful response wrapper

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// Status, headers and decoded body of a successful call.
///
/// `result` is `None` when the service answered with an empty body.
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub result: Option<T>,
}

impl<T> DetailedResponse<T> {
    pub fn new(status: StatusCode, headers: HeaderMap, result: Option<T>) -> Self {
        Self {
            status,
            headers,
            result,
        }
    }

    /// Borrow the decoded body
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the decoded body, dropping status and headers
    pub fn into_result(self) -> Option<T> {
        self.result
    }

    pub fn map<U, F>(self, f: F) -> DetailedResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        DetailedResponse {
            status: self.status,
            headers: self.headers,
            result: self.result.map(f),
        }
    }

    pub fn try_map<U, E, F>(self, f: F) -> Result<DetailedResponse<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        Ok(DetailedResponse {
            status: self.status,
            headers: self.headers,
            result: self.result.map(f).transpose()?,
        })
    }
}

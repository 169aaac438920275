use serde::{Deserialize, Serialize};

/// State of an API request as seen by a consumer.
///
/// Exactly one variant is active. `Error` may still carry the data that was
/// cached before the failing request, so callers can keep showing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum NetworkResult<T> {
    /// The request is in flight
    Loading,
    /// The request completed with fresh data
    Success(T),
    /// The request failed; `data` holds stale cached data if any
    Error { message: String, data: Option<T> },
}

impl<T> Default for NetworkResult<T> {
    fn default() -> Self {
        NetworkResult::Loading
    }
}

impl<T> NetworkResult<T> {
    /// An error without any attached data
    pub fn error(message: impl Into<String>) -> Self {
        NetworkResult::Error {
            message: message.into(),
            data: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NetworkResult::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NetworkResult::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, NetworkResult::Error { .. })
    }

    /// Fresh data on success, stale data on error, nothing while loading
    pub fn data(&self) -> Option<&T> {
        match self {
            NetworkResult::Loading => None,
            NetworkResult::Success(data) => Some(data),
            NetworkResult::Error { data, .. } => data.as_ref(),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            NetworkResult::Loading => None,
            NetworkResult::Success(data) => Some(data),
            NetworkResult::Error { data, .. } => data,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            NetworkResult::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Attach cached data to an error. Other variants pass through.
    ///
    /// The cache always replaces whatever data the error held: it is the
    /// most recent successful response.
    pub fn with_cached(self, cached: Option<T>) -> Self {
        match self {
            NetworkResult::Error { message, .. } => NetworkResult::Error {
                message,
                data: cached,
            },
            other => other,
        }
    }

    pub fn map<U, F>(self, f: F) -> NetworkResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            NetworkResult::Loading => NetworkResult::Loading,
            NetworkResult::Success(data) => NetworkResult::Success(f(data)),
            NetworkResult::Error { message, data } => NetworkResult::Error {
                message,
                data: data.map(f),
            },
        }
    }
}

use crate::error::SiteError;
use std::future::Future;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Plain same-origin GET returning the textual body.
pub trait Fetch {
    fn get(&self, url: &str) -> impl Future<Output = Result<FetchResponse, SiteError>>;
}

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> f64;
    fn current_year(&self) -> i32;
}

/// Appends a timestamp query parameter so the browser cache is bypassed.
pub fn cache_busted(path: &str, now_millis: f64) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}t={}", now_millis.trunc() as u64)
}

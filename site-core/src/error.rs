use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("request for {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("request for {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed team data: {0}")]
    TeamData(#[from] serde_json::Error),

    #[error("dom operation failed: {0}")]
    Dom(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// An overlay with the modal id exists but has no image element inside it.
    #[error("photo modal '#{0}' has no image element")]
    ModalMarkup(String),
}

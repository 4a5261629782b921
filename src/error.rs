/// All errors that can occur while talking to the content source.
#[derive(thiserror::Error, Debug)]
pub enum CmsError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response (or a document inside it) did not have the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        context: &'static str,
        source: serde_json::Error,
    },

    /// The client is not configured well enough to issue queries.
    #[error("content source is not configured: {0}")]
    Config(String),
}

/// Errors surfaced by the contact form flow.
#[derive(thiserror::Error, Debug)]
pub enum ContactError {
    /// The submitted payload is incomplete or malformed.
    #[error("{0}")]
    Validation(&'static str),

    /// The email provider could not be reached or rejected the message.
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// Errors that stop the server binary.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CmsError>;
